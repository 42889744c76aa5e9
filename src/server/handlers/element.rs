use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};

use super::dispatch;
use crate::commands::FIND_ELEMENT;
use crate::server::response::WebDriverResult;
use crate::server::AppState;

/// POST `/session/{session_id}/element` - Find element
pub async fn find(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> WebDriverResult {
    dispatch(&state, &session_id, FIND_ELEMENT, &body).await
}
