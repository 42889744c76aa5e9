use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};

use super::dispatch;
use crate::commands::{SWITCH_TO_FRAME, SWITCH_TO_PARENT_FRAME};
use crate::server::response::WebDriverResult;
use crate::server::AppState;

/// POST `/session/{session_id}/frame` - Switch to frame
pub async fn switch_to_frame(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, SWITCH_TO_FRAME, &body).await
}

/// POST `/session/{session_id}/frame/parent` - Switch to parent frame
pub async fn switch_to_parent_frame(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, SWITCH_TO_PARENT_FRAME, &body).await
}
