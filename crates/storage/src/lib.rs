//! Object storage for photo originals and variants.
//!
//! Production talks to Cloudflare R2 through its S3-compatible API
//! ([`R2Store`]). Handlers only see the narrow [`ObjectStore`] trait so tests
//! can swap in [`MemoryStore`].

pub mod config;
pub mod memory;
pub mod r2;

use async_trait::async_trait;

pub use config::StorageConfig;
pub use memory::MemoryStore;
pub use r2::R2Store;

/// Maximum number of keys accepted by a single `DeleteObjects` call.
pub const DELETE_BATCH_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object store rejected or failed a request.
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    /// A request could not be built from the given arguments.
    #[error("Invalid {operation} request: {message}")]
    InvalidRequest {
        operation: &'static str,
        message: String,
    },
}

impl StorageError {
    pub(crate) fn request(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Request {
            operation,
            message: err.to_string(),
        }
    }
}

/// Headers stored with an uploaded object.
#[derive(Debug, Clone, Copy)]
pub struct PutOptions<'a> {
    pub content_type: &'a str,
    pub cache_control: Option<&'a str>,
}

/// The object store operations the upload and delete flows need.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        options: PutOptions<'_>,
    ) -> Result<(), StorageError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    /// List every key under `prefix`, following pagination to the end.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Delete many keys, batched by [`DELETE_BATCH_SIZE`].
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError>;
}

/// Delete every object under `prefix`. Returns the number of keys removed.
pub async fn delete_prefix(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<usize, StorageError> {
    let keys = store.list_keys(bucket, prefix).await?;
    if !keys.is_empty() {
        store.delete_objects(bucket, &keys).await?;
    }
    Ok(keys.len())
}

/// Join a public base URL and an object key.
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_with_single_slash() {
        assert_eq!(
            public_url("https://cdn.example.com/", "/variants/a.webp"),
            "https://cdn.example.com/variants/a.webp"
        );
        assert_eq!(
            public_url("https://cdn.example.com", "variants/a.webp"),
            "https://cdn.example.com/variants/a.webp"
        );
    }

    #[tokio::test]
    async fn delete_prefix_only_touches_matching_keys() {
        let store = MemoryStore::new();
        let opts = PutOptions {
            content_type: "image/webp",
            cache_control: None,
        };
        store.put_object("v", "variants/a/1.webp", vec![1], opts).await.unwrap();
        store.put_object("v", "variants/a/2.webp", vec![2], opts).await.unwrap();
        store.put_object("v", "variants/b/1.webp", vec![3], opts).await.unwrap();

        let removed = delete_prefix(&store, "v", "variants/a/").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.keys("v"), vec!["variants/b/1.webp".to_string()]);
    }
}
