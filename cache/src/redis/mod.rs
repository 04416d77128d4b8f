use crate::Cache;
use abi::errors::Error;
use async_trait::async_trait;
use redis::AsyncCommands;

const USER_ONLINE_SET: &str = "user_online_set";

#[derive(Debug)]
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn from_url(url: &str) -> Result<Self, Error> {
        let client = redis::Client::open(url)?;
        Ok(RedisCache { client })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn user_login(&self, user_id: &str) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.sadd(USER_ONLINE_SET, user_id).await?;
        Ok(())
    }

    async fn user_logout(&self, user_id: &str) -> Result<(), Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.srem(USER_ONLINE_SET, user_id).await?;
        Ok(())
    }

    async fn is_logged_in(&self, user_id: &str) -> Result<bool, Error> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: bool = conn.sismember(USER_ONLINE_SET, user_id).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::config::Config;
    use std::ops::Deref;
    use std::thread;
    use tokio::runtime::Runtime;

    struct TestRedis {
        client: redis::Client,
        cache: RedisCache,
    }

    impl Deref for TestRedis {
        type Target = RedisCache;
        fn deref(&self) -> &Self::Target {
            &self.cache
        }
    }

    impl Drop for TestRedis {
        fn drop(&mut self) {
            let client = self.client.clone();
            thread::spawn(move || {
                Runtime::new().unwrap().block_on(async {
                    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
                    let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await.unwrap();
                })
            })
            .join()
            .unwrap();
        }
    }

    impl TestRedis {
        // tests run in parallel, each one flushes its own database on drop
        fn from_db(db: u8) -> Self {
            let config = Config::load("../abi/fixtures/chat.yml").unwrap();
            let url = format!("{}/{}", config.redis.unwrap().url(), db);
            let client = redis::Client::open(url).unwrap();
            let cache = RedisCache::new(client.clone());
            TestRedis { client, cache }
        }
    }

    #[tokio::test]
    #[ignore = "needs a running redis"]
    async fn test_login_logout() {
        let cache = TestRedis::from_db(9);
        cache.user_login("test").await.unwrap();
        assert!(cache.is_logged_in("test").await.unwrap());
        cache.user_logout("test").await.unwrap();
        assert!(!cache.is_logged_in("test").await.unwrap());
    }
}
