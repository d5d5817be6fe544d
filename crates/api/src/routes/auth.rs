use axum::routing::get;
use axum::Router;

use crate::handlers::{adobe_auth, session};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /adobe/connect?secret=     -> adobe_auth::connect
/// GET /adobe/callback            -> adobe_auth::callback
/// GET /admin-sign-out            -> session::admin_sign_out
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adobe/connect", get(adobe_auth::connect))
        .route("/adobe/callback", get(adobe_auth::callback))
        .route("/admin-sign-out", get(session::admin_sign_out))
}
