use serde::{Deserialize, Serialize};

/// profile document, what the directory shows
#[derive(Clone, Serialize, Default, Deserialize, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// public url of the avatar, empty when the user has none
    pub avatar: String,
    pub create_time: i64,
    pub update_time: i64,
}

/// identity record, owns the credentials
#[derive(Clone, Serialize, Default, Deserialize, Debug, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub display_name: String,
    pub photo_url: String,
    pub create_time: i64,
}

#[derive(Clone, Default, Deserialize, Serialize, Debug)]
pub struct AccountProfile {
    pub display_name: String,
    pub photo_url: String,
}

#[derive(Clone, Default, Deserialize, Serialize, Debug)]
pub struct UserUpdate {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl From<&Account> for User {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.display_name.clone(),
            email: account.email.clone(),
            avatar: account.photo_url.clone(),
            create_time: account.create_time,
            update_time: account.create_time,
        }
    }
}

/// the authenticated caller, handed to every flow explicitly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}
