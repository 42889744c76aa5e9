use std::sync::Arc;

use axum::extract::State;
use serde_json::{json, Value};

use super::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use super::AppState;
use crate::webdriver::Command;

pub mod element;
pub mod frame;
pub mod navigation;
pub mod session;
pub mod timeouts;
pub mod window;

/// GET /status - WebDriver server status
pub async fn status(State(state): State<Arc<AppState>>) -> WebDriverResult {
    let ready = !state.driver.is_busy();
    let message = if ready {
        "webdriver-dispatch is ready"
    } else {
        "automation thread is busy"
    };
    Ok(WebDriverResponse::success(json!({
        "ready": ready,
        "message": message
    })))
}

/// Run `name` for `session_id`, passing the JSON body through as its parameters.
///
/// An empty body is a command without parameters.
pub(crate) async fn dispatch(
    state: &AppState,
    session_id: &str,
    name: &str,
    body: &[u8],
) -> WebDriverResult {
    state.check_session(session_id)?;

    let body = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(body).map_err(|err| {
            WebDriverErrorResponse::invalid_argument(&format!("Malformed request body: {err}"))
        })?
    };

    let command = Command::from_value(name, body)?;
    state.driver.execute(command).await
}
