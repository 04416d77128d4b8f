use crate::Oss;
use abi::config::OssConfig;
use abi::errors::Error;
use async_trait::async_trait;
use aws_sdk_s3::config::{Builder, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub(crate) struct S3Client {
    avatar_bucket: String,
    public_base: String,
    client: Client,
}

impl S3Client {
    pub async fn new(config: &OssConfig) -> Result<Self, Error> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "MinioCredentials",
        );

        let s3_config = Builder::new()
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.endpoint)
            // minio serves buckets as paths, not subdomains
            .force_path_style(true)
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .build();

        let self_ = Self {
            client: Client::from_conf(s3_config),
            avatar_bucket: config.avatar_bucket.clone(),
            public_base: config.public_base(),
        };

        self_.create_bucket().await?;
        Ok(self_)
    }

    async fn check_bucket_exists(&self) -> Result<bool, Error> {
        match self
            .client
            .head_bucket()
            .bucket(&self.avatar_bucket)
            .send()
            .await
        {
            Ok(_response) => Ok(true),
            Err(SdkError::ServiceError(e)) if e.raw().status().as_u16() == 404 => Ok(false),
            Err(e) => {
                error!("check avatar_bucket exists error: {:?}", e);
                Err(Error::oss(e.to_string()))
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), Error> {
        if self.check_bucket_exists().await? {
            return Ok(());
        }
        info!("creating bucket {}", self.avatar_bucket);
        self.client
            .create_bucket()
            .bucket(&self.avatar_bucket)
            .send()
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Oss for S3Client {
    async fn upload_avatar(&self, key: &str, content: Vec<u8>) -> Result<(), Error> {
        self.client
            .put_object()
            .bucket(&self.avatar_bucket)
            .key(key)
            .body(content.into())
            .send()
            .await?;
        Ok(())
    }

    async fn download_avatar(&self, key: &str) -> Result<Bytes, Error> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.avatar_bucket)
            .key(key)
            .send()
            .await?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| Error::oss(e.to_string()))?;

        Ok(data.into_bytes())
    }

    async fn delete_avatar(&self, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(&self.avatar_bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }

    fn avatar_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}
