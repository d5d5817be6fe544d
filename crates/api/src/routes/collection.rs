//! Route definitions for collections and their photo membership.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::collection;
use crate::state::AppState;

/// Routes mounted at `/collections`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// POST   /add-photo                -> add_photo
/// GET    /{id}                     -> get_by_id
/// PATCH  /{id}/reorder             -> reorder
/// DELETE /{id}/photos/{photo_id}   -> remove_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::list).post(collection::create))
        .route("/add-photo", post(collection::add_photo))
        .route("/{id}", get(collection::get_by_id))
        .route("/{id}/reorder", patch(collection::reorder))
        .route("/{id}/photos/{photo_id}", delete(collection::remove_photo))
}
