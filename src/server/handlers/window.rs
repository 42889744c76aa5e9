use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};

use super::dispatch;
use crate::commands::{CLOSE_WINDOW, GET_WINDOW_HANDLE, GET_WINDOW_HANDLES, SWITCH_TO_WINDOW};
use crate::server::response::WebDriverResult;
use crate::server::AppState;

/// GET /session/{session_id}/window - Get current window handle
pub async fn get_window_handle(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    dispatch(&state, &session_id, GET_WINDOW_HANDLE, &[]).await
}

/// GET /session/{session_id}/window/handles - Get all window handles
pub async fn get_window_handles(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    dispatch(&state, &session_id, GET_WINDOW_HANDLES, &[]).await
}

/// POST /session/{session_id}/window - Switch to window
pub async fn switch_to_window(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, SWITCH_TO_WINDOW, &body).await
}

/// DELETE /session/{session_id}/window - Close current window
pub async fn close_window(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    dispatch(&state, &session_id, CLOSE_WINDOW, &[]).await
}
