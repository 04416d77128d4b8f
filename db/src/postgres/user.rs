use async_trait::async_trait;
use sqlx::PgPool;

use abi::errors::{Error, Result};
use abi::model::{Account, AccountProfile, User, UserUpdate};
use abi::utils::now_millis;

use crate::user::{AccountRepo, UserRepo};

#[derive(Debug)]
pub struct PostgresAccount {
    pool: PgPool,
}

impl PostgresAccount {
    pub fn new(pool: PgPool) -> Self {
        PostgresAccount { pool }
    }
}

#[async_trait]
impl AccountRepo for PostgresAccount {
    async fn create_account(&self, account: Account) -> Result<Account> {
        let result = sqlx::query_as(
            "INSERT INTO accounts (id, email, password, display_name, photo_url, create_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&account.id)
        .bind(&account.email)
        .bind(&account.password)
        .bind(&account.display_name)
        .bind(&account.photo_url)
        .bind(account.create_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return Error::conflict(format!("email {} is already in use", account.email));
                }
            }
            Error::from(err)
        })?;
        Ok(result)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn update_profile(&self, id: &str, profile: AccountProfile) -> Result<Account> {
        let account = sqlx::query_as(
            "UPDATE accounts SET display_name = $2, photo_url = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&profile.display_name)
        .bind(&profile.photo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(account)
    }
}

#[derive(Debug)]
pub struct PostgresUser {
    pool: PgPool,
}

impl PostgresUser {
    pub fn new(pool: PgPool) -> Self {
        PostgresUser { pool }
    }
}

#[async_trait]
impl UserRepo for PostgresUser {
    async fn create_user(&self, user: User) -> Result<User> {
        let result = sqlx::query_as(
            "INSERT INTO users (id, name, email, avatar, create_time, update_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.avatar)
        .bind(user.create_time)
        .bind(user.update_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(result)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as("SELECT * FROM users ORDER BY create_time, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as("SELECT * FROM users WHERE email = $1 ORDER BY create_time, id")
            .bind(email)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as("SELECT * FROM users WHERE name = $1 ORDER BY create_time, id")
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_user(&self, user: UserUpdate) -> Result<User> {
        let user = sqlx::query_as(
            "UPDATE users SET
            name = COALESCE($2, name),
            avatar = COALESCE($3, avatar),
            update_time = $4
            WHERE id = $1
            RETURNING *",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
