use axum::routing::get;
use axum::Router;

use crate::handlers::lightroom;
use crate::state::AppState;

/// Routes mounted at `/lightroom`.
pub fn router() -> Router<AppState> {
    Router::new().route("/photos", get(lightroom::list_photos))
}
