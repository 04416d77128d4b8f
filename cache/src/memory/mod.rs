use async_trait::async_trait;
use dashmap::DashSet;

use abi::errors::Error;

use crate::Cache;

#[derive(Debug, Default)]
pub struct MemoryCache {
    online: DashSet<String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn user_login(&self, user_id: &str) -> Result<(), Error> {
        self.online.insert(user_id.to_string());
        Ok(())
    }

    async fn user_logout(&self, user_id: &str) -> Result<(), Error> {
        self.online.remove(user_id);
        Ok(())
    }

    async fn is_logged_in(&self, user_id: &str) -> Result<bool, Error> {
        Ok(self.online.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_flag_should_toggle() {
        let cache = MemoryCache::new();
        assert!(!cache.is_logged_in("a").await.unwrap());
        cache.user_login("a").await.unwrap();
        cache.user_login("a").await.unwrap();
        assert!(cache.is_logged_in("a").await.unwrap());
        assert!(!cache.is_logged_in("b").await.unwrap());
        cache.user_logout("a").await.unwrap();
        assert!(!cache.is_logged_in("a").await.unwrap());
        // logging out twice is harmless
        cache.user_logout("a").await.unwrap();
    }
}
