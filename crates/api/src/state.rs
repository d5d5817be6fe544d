use std::sync::Arc;

use studio_core::imaging::Watermark;
use studio_lightroom::{LightroomClient, TokenStore};
use studio_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: studio_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object store holding originals and variants.
    pub store: Arc<dyn ObjectStore>,
    /// Decoded watermark, if one is configured.
    pub watermark: Option<Arc<Watermark>>,
    /// Adobe tokens (memory cache over `oauth_tokens`).
    pub tokens: Arc<TokenStore>,
    pub lightroom: Arc<LightroomClient>,
}
