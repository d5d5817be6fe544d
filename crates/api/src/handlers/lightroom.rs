use axum::extract::State;
use axum::Json;
use studio_lightroom::LightroomPhotos;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/lightroom/photos
///
/// First page of assets in the connected user's catalog. 503 until an admin
/// has connected Adobe.
pub async fn list_photos(State(state): State<AppState>) -> AppResult<Json<LightroomPhotos>> {
    let access_token = state.tokens.get_access_token().await?;
    let photos = state.lightroom.list_photos(&access_token).await?;
    Ok(Json(photos))
}
