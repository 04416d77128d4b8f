use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::model::{Account, AccountProfile, User, UserUpdate};

/// identity service: credentials and the display profile attached to them
#[async_trait]
pub trait AccountRepo: Sync + Send + Debug {
    /// create account, the email must not be taken
    async fn create_account(&self, account: Account) -> Result<Account>;

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn update_profile(&self, id: &str, profile: AccountProfile) -> Result<Account>;
}

/// profile documents
#[async_trait]
pub trait UserRepo: Sync + Send + Debug {
    async fn create_user(&self, user: User) -> Result<User>;

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// every profile, oldest first
    async fn list_users(&self) -> Result<Vec<User>>;

    /// exact equality on email
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>>;

    /// exact equality on name
    async fn find_by_name(&self, name: &str) -> Result<Vec<User>>;

    /// `None` fields are left untouched
    async fn update_user(&self, user: UserUpdate) -> Result<User>;
}
