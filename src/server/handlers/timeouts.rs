use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};

use super::dispatch;
use crate::commands::{GET_TIMEOUTS, SET_TIMEOUTS};
use crate::server::response::WebDriverResult;
use crate::server::AppState;

/// GET `/session/{session_id}/timeouts` - Get session timeouts
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    dispatch(&state, &session_id, GET_TIMEOUTS, &[]).await
}

/// POST `/session/{session_id}/timeouts` - Set session timeouts
pub async fn set(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, SET_TIMEOUTS, &body).await
}
