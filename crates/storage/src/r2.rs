//! Cloudflare R2 client over the S3 API.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;

use crate::{ObjectStore, PutOptions, StorageConfig, StorageError, DELETE_BATCH_SIZE};

/// R2 ignores regions but the SDK requires one.
const R2_REGION: &str = "auto";

/// [`ObjectStore`] backed by an S3-compatible endpoint.
#[derive(Clone)]
pub struct R2Store {
    client: S3Client,
}

impl R2Store {
    /// Build a client for the configured endpoint with static credentials.
    pub async fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "studio-r2",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(R2_REGION))
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = S3ConfigBuilder::from(&sdk_config)
            .endpoint_url(&config.endpoint)
            .force_path_style(true)
            .build();

        tracing::info!(
            endpoint = %config.endpoint,
            originals = %config.originals_bucket,
            variants = %config.variants_bucket,
            "Object store client initialized"
        );

        Self {
            client: S3Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl ObjectStore for R2Store {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: PutOptions<'_>,
    ) -> Result<(), StorageError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(options.content_type)
            .set_cache_control(options.cache_control.map(str::to_string))
            .send()
            .await
            .map_err(|e| StorageError::request("PutObject", DisplayErrorContext(e)))?;

        tracing::debug!(bucket, key, size, "Uploaded object");
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::request("DeleteObject", DisplayErrorContext(e)))?;
        Ok(())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StorageError::request("ListObjectsV2", DisplayErrorContext(e)))?;

            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            let objects = batch
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StorageError::InvalidRequest {
                    operation: "DeleteObjects",
                    message: e.to_string(),
                })?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| StorageError::InvalidRequest {
                    operation: "DeleteObjects",
                    message: e.to_string(),
                })?;

            self.client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| StorageError::request("DeleteObjects", DisplayErrorContext(e)))?;

            tracing::debug!(bucket, count = batch.len(), "Deleted object batch");
        }
        Ok(())
    }
}
