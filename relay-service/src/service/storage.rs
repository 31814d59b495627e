//! Invoice image upload to S3-compatible object storage (Cloudflare R2).
//!
//! The client is constructed once at startup and injected; nothing here
//! is lazily initialized. A deployment without a `[storage]` block gets
//! a no-op store that reports "not configured" instead of failing the
//! surrounding notification.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use log::{debug, info};
use rand::distr::Alphanumeric;
use rand::Rng;
use relay_core::config::StorageConfig;
use relay_core::RelayError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Upload seam: PNG bytes in, public URL out.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn upload_png(&self, bytes: Vec<u8>) -> Result<String, RelayError>;
}

pub struct R2InvoiceStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl R2InvoiceStore {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "relay-static",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(config.endpoint_url())
            .credentials_provider(credentials)
            .build();
        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn unique_key() -> String {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
        let suffix: String =
            rand::rng().sample_iter(&Alphanumeric).take(8).map(char::from).collect();
        format!("invoices/invoice_{}_{}.png", millis, suffix.to_lowercase())
    }
}

#[async_trait]
impl InvoiceStore for R2InvoiceStore {
    async fn upload_png(&self, bytes: Vec<u8>) -> Result<String, RelayError> {
        let key = Self::unique_key();
        debug!("uploading invoice image bucket={} key={} bytes={}", self.bucket, key, bytes.len());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type("image/png")
            .send()
            .await
            .map_err(|err| RelayError::StorageError(err.to_string()))?;

        let url = format!("{}/{}", self.public_base_url, key);
        info!("invoice image uploaded url={}", url);
        Ok(url)
    }
}

/// Stand-in when no `[storage]` block is configured.
pub struct UnconfiguredStore;

#[async_trait]
impl InvoiceStore for UnconfiguredStore {
    async fn upload_png(&self, _bytes: Vec<u8>) -> Result<String, RelayError> {
        Err(RelayError::StorageNotConfigured)
    }
}
