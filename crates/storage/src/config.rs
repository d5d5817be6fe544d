/// Object store settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint, e.g. `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Private bucket holding re-encoded originals.
    pub originals_bucket: String,
    /// Public bucket holding variants.
    pub variants_bucket: String,
    /// Public base URL that serves the variants bucket.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                | Required |
    /// |------------------------|----------|
    /// | `R2_ENDPOINT`          | **yes**  |
    /// | `R2_ACCESS_KEY_ID`     | **yes**  |
    /// | `R2_SECRET_ACCESS_KEY` | **yes**  |
    /// | `R2_BUCKET_ORIGINALS`  | **yes**  |
    /// | `R2_BUCKET_VARIANTS`   | **yes**  |
    /// | `R2_PUBLIC_BASE_URL`   | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if any variable is missing or empty.
    pub fn from_env() -> Self {
        Self {
            endpoint: required("R2_ENDPOINT"),
            access_key_id: required("R2_ACCESS_KEY_ID"),
            secret_access_key: required("R2_SECRET_ACCESS_KEY"),
            originals_bucket: required("R2_BUCKET_ORIGINALS"),
            variants_bucket: required("R2_BUCKET_VARIANTS"),
            public_base_url: required("R2_PUBLIC_BASE_URL"),
        }
    }
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
    assert!(!value.trim().is_empty(), "{name} must not be empty");
    value
}
