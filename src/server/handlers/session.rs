use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{json, Value};

use crate::server::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub capabilities: Value,
}

/// POST /session - Claim the driver's session
///
/// The driver owns exactly one session; requested capabilities are not negotiated.
pub async fn create(State(state): State<Arc<AppState>>) -> WebDriverResult {
    if !state.claim() {
        return Err(WebDriverErrorResponse::session_not_created(
            "A session is already active",
        ));
    }

    let session = state.driver.session();
    let timeouts = session.timeouts();
    tracing::info!(session = %session.id(), "session claimed");

    let response = SessionResponse {
        session_id: session.id().to_string(),
        capabilities: json!({
            "browserName": "webdriver-dispatch",
            "browserVersion": env!("CARGO_PKG_VERSION"),
            "platformName": std::env::consts::OS,
            "timeouts": {
                "implicit": timeouts.implicit_ms,
                "pageLoad": timeouts.page_load_ms,
                "script": timeouts.script_ms
            }
        }),
    };

    Ok(WebDriverResponse::success(response))
}

/// DELETE /session/{session_id} - Release the session
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> WebDriverResult {
    state.check_session(&session_id)?;
    state.release();
    tracing::info!(session = %session_id, "session released");
    Ok(WebDriverResponse::null())
}
