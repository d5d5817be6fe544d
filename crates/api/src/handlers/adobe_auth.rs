//! Adobe IMS OAuth connect flow.
//!
//! An admin opens `/connect?secret=...`, is redirected to Adobe, and Adobe
//! sends the browser back to `/callback` with an authorization code.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use studio_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const CONNECTED_MESSAGE: &str =
    "Lightroom has been connected successfully. You can close this tab.";

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/adobe/connect?secret=
pub async fn connect(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
) -> AppResult<Redirect> {
    if !state
        .config
        .adobe
        .connect_secret_matches(params.secret.as_deref())
    {
        tracing::warn!("Rejected Adobe connect attempt");
        return Err(AppError::Core(CoreError::Unauthorized("Unauthorized".into())));
    }

    let url = state.tokens.ims().authorize_url()?;
    Ok(Redirect::temporary(&url))
}

/// GET /api/auth/adobe/callback?code=&error=
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<&'static str> {
    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!("Adobe error: {error}")));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing code".into()))?;

    let response = state.tokens.ims().exchange_code(&code).await?;
    state.tokens.store_response(&response).await?;

    tracing::info!(
        has_refresh_token = response.refresh_token.is_some(),
        expires_in = response.expires_in,
        "Adobe connected"
    );
    Ok(CONNECTED_MESSAGE)
}
