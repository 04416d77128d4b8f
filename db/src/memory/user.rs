use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use abi::errors::{Error, Result};
use abi::model::{Account, AccountProfile, User, UserUpdate};
use abi::utils::now_millis;

use crate::user::{AccountRepo, UserRepo};

/// accounts keyed by email, which is what makes it unique
#[derive(Debug, Default)]
pub struct MemoryAccount {
    accounts: DashMap<String, Account>,
}

impl MemoryAccount {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepo for MemoryAccount {
    async fn create_account(&self, account: Account) -> Result<Account> {
        match self.accounts.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(Error::conflict(format!(
                "email {} is already in use",
                account.email
            ))),
            Entry::Vacant(entry) => Ok(entry.insert(account).clone()),
        }
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.accounts.get(email).map(|a| a.value().clone()))
    }

    async fn update_profile(&self, id: &str, profile: AccountProfile) -> Result<Account> {
        let mut account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found_with_details(format!("account {id}")))?;
        account.display_name = profile.display_name;
        account.photo_url = profile.photo_url;
        Ok(account.value().clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUser {
    users: DashMap<String, User>,
}

impl MemoryUser {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect<F>(&self, pred: F) -> Vec<User>
    where
        F: Fn(&User) -> bool,
    {
        let mut list: Vec<User> = self
            .users
            .iter()
            .filter(|u| pred(u.value()))
            .map(|u| u.value().clone())
            .collect();
        list.sort_by(|a, b| {
            a.create_time
                .cmp(&b.create_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }
}

#[async_trait]
impl UserRepo for MemoryUser {
    async fn create_user(&self, user: User) -> Result<User> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.collect(|_| true))
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>> {
        Ok(self.collect(|u| u.email == email))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<User>> {
        Ok(self.collect(|u| u.name == name))
    }

    async fn update_user(&self, update: UserUpdate) -> Result<User> {
        let mut user = self
            .users
            .get_mut(&update.id)
            .ok_or_else(|| Error::not_found_with_details(format!("user {}", update.id)))?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        user.update_time = now_millis();
        Ok(user.value().clone())
    }
}
