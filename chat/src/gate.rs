use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use abi::errors::Error;
use cache::Cache;

/// the view a visitor should be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landing {
    Directory,
    Login,
}

/// routes on the cached logged-in flag alone.
/// the token is never looked at here, so this is no security boundary;
/// every authenticated endpoint checks the token itself
#[derive(Debug, Clone)]
pub struct SessionGate {
    cache: Arc<dyn Cache>,
}

impl SessionGate {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub async fn resolve(&self, user_id: Option<&str>) -> Result<Landing, Error> {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            return Ok(Landing::Login);
        };
        let landing = if self.cache.is_logged_in(user_id).await? {
            Landing::Directory
        } else {
            Landing::Login
        };
        debug!("gate resolved {} to {:?}", user_id, landing);
        Ok(landing)
    }

    pub async fn enter(&self, user_id: &str) -> Result<(), Error> {
        self.cache.user_login(user_id).await
    }

    pub async fn leave(&self, user_id: &str) -> Result<(), Error> {
        self.cache.user_logout(user_id).await
    }
}
