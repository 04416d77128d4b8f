use abi::config::Config;
use abi::errors::Error;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

mod client;
mod memory;

pub use memory::MemoryOss;

/// path the api serves avatars under when they live in process memory
pub const LOCAL_AVATAR_BASE: &str = "/file/avatar";

/// blob storage for avatar images
#[async_trait]
pub trait Oss: Debug + Send + Sync {
    async fn upload_avatar(&self, key: &str, content: Vec<u8>) -> Result<(), Error>;
    async fn download_avatar(&self, key: &str) -> Result<Bytes, Error>;
    async fn delete_avatar(&self, key: &str) -> Result<(), Error>;

    /// where a browser can fetch the object stored under `key`
    fn avatar_url(&self, key: &str) -> String;

    /// the key behind a url this store handed out, `None` for foreign urls
    fn avatar_key_of(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.avatar_url(""))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}

pub async fn oss(config: &Config) -> Result<Arc<dyn Oss>, Error> {
    match &config.oss {
        Some(oss) => Ok(Arc::new(client::S3Client::new(oss).await?)),
        None => {
            info!("no oss configured, avatars stay in memory");
            Ok(Arc::new(MemoryOss::new(LOCAL_AVATAR_BASE)))
        }
    }
}

/// object key of an uploaded avatar, unique per upload
pub fn avatar_key(user_id: &str, filename: &str) -> String {
    let filename: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("avatars/{}/{}-{}", user_id, abi::utils::gen_id(), filename)
}
