use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use abi::errors::Error;
use abi::model::User;

mod user_handlers;

pub use user_handlers::*;

#[derive(Serialize, Deserialize)]
pub struct Token {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

pub const REFRESH_EXPIRES: i64 = 24 * 60 * 60;

/// only access tokens open the api, refresh tokens only buy new tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub typ: TokenKind,
}

const EXPIRES: i64 = 60 * 60 * 4;

impl Claims {
    pub fn new(sub: String, typ: TokenKind) -> Self {
        let now = chrono::Utc::now().timestamp();
        let mut exp = now + EXPIRES;
        if typ == TokenKind::Refresh {
            exp += REFRESH_EXPIRES;
        }
        Self {
            sub,
            exp,
            iat: now,
            typ,
        }
    }

    pub fn encode(&self, jwt_secret: &str) -> Result<String, Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(jwt_secret.as_bytes()),
        )
        .map_err(Error::internal)
    }
}

/// access token and a longer lived refresh token, both signed with `jwt_secret`
pub fn gen_token(jwt_secret: &str, user: User) -> Result<Token, Error> {
    let token = Claims::new(user.id.clone(), TokenKind::Access).encode(jwt_secret)?;
    let refresh_token = Claims::new(user.id.clone(), TokenKind::Refresh).encode(jwt_secret)?;
    debug!("token issued for {}", user.id);

    Ok(Token {
        user,
        token,
        refresh_token,
    })
}
