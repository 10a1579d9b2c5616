//! Object store client backed by the AWS S3 SDK

use crate::config::UploadConfig;
use crate::error::Result;
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use tracing::debug;

/// Destination for uploaded objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` at `key` in `bucket`
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// S3-compatible store (AWS S3, Cloudflare R2, ...)
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a new S3 client from resolved configuration
    pub async fn new(config: &UploadConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "s3up",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint_url)
            .load()
            .await;

        debug!(endpoint = %config.endpoint_url, region = %config.region, "S3 client configured");

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await?;

        Ok(())
    }
}
