use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use abi::config::Config;
use abi::errors::Error;

mod memory;
mod redis;

pub use crate::memory::MemoryCache;
pub use crate::redis::RedisCache;

/// the logged-in presence flag, read when deciding where a user lands
#[async_trait]
pub trait Cache: Sync + Send + Debug {
    /// user login
    async fn user_login(&self, user_id: &str) -> Result<(), Error>;

    /// user logout
    async fn user_logout(&self, user_id: &str) -> Result<(), Error>;

    async fn is_logged_in(&self, user_id: &str) -> Result<bool, Error>;
}

pub fn cache(config: &Config) -> Result<Arc<dyn Cache>, Error> {
    match &config.redis {
        Some(redis) => Ok(Arc::new(RedisCache::from_url(&redis.url())?)),
        None => {
            info!("no redis configured, session flags stay in memory");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}
