pub mod auth;
pub mod collection;
pub mod health;
pub mod lightroom;
pub mod photo;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /collections                            list, create
/// /collections/add-photo                  link a photo by collection slug (POST)
/// /collections/{id}                       detail
/// /collections/{id}/reorder               set sort indexes (PATCH)
/// /collections/{id}/photos/{photo_id}     unlink a photo (DELETE)
///
/// /upload                                 multipart photo upload (POST)
/// /photos/{id}                            delete photo and its objects
///
/// /auth/adobe/connect                     redirect to Adobe IMS
/// /auth/adobe/callback                    OAuth code exchange
/// /auth/admin-sign-out                    clear admin session cookies
///
/// /lightroom/photos                       list assets in the Lightroom catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/collections", collection::router())
        .merge(photo::router())
        .nest("/auth", auth::router())
        .nest("/lightroom", lightroom::router())
}
