use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::{photo, upload};
use crate::state::AppState;

/// ```text
/// POST   /upload         -> upload::upload
/// DELETE /photos/{id}    -> photo::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload::upload))
        .route("/photos/{id}", delete(photo::delete))
}
