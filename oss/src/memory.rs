use abi::errors::Error;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use crate::Oss;

#[derive(Debug)]
pub struct MemoryOss {
    base_url: String,
    objects: DashMap<String, Bytes>,
}

impl MemoryOss {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }
}

#[async_trait]
impl Oss for MemoryOss {
    async fn upload_avatar(&self, key: &str, content: Vec<u8>) -> Result<(), Error> {
        self.objects.insert(key.to_string(), Bytes::from(content));
        Ok(())
    }

    async fn download_avatar(&self, key: &str) -> Result<Bytes, Error> {
        self.objects
            .get(key)
            .map(|b| b.value().clone())
            .ok_or_else(|| Error::not_found_with_details(format!("avatar {key}")))
    }

    async fn delete_avatar(&self, key: &str) -> Result<(), Error> {
        self.objects.remove(key);
        Ok(())
    }

    fn avatar_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}
