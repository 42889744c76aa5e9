use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};

use super::dispatch;
use crate::commands::{GET_CURRENT_URL, NAVIGATE_TO};
use crate::server::response::WebDriverResult;
use crate::server::AppState;

/// POST `/session/{session_id}/url` - Navigate to URL
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, NAVIGATE_TO, &body).await
}

/// GET `/session/{session_id}/url` - Get current URL
pub async fn get_url(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    dispatch(&state, &session_id, GET_CURRENT_URL, &[]).await
}
