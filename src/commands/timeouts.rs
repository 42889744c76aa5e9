use serde::Deserialize;
use serde_json::{json, Value};

use crate::dispatch::{CommandContext, CommandHandler};
use crate::server::response::{WebDriverErrorResponse, WebDriverResponse, WebDriverResult};
use crate::webdriver::Parameters;

#[derive(Debug, Deserialize)]
struct TimeoutsRequest {
    #[serde(default)]
    implicit: Option<u64>,
    #[serde(rename = "pageLoad", default)]
    page_load: Option<u64>,
    #[serde(default)]
    script: Option<u64>,
}

pub struct GetTimeouts;

impl CommandHandler for GetTimeouts {
    fn requires_window(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        let timeouts = ctx.session().timeouts();
        Ok(WebDriverResponse::success(json!({
            "implicit": timeouts.implicit_ms,
            "pageLoad": timeouts.page_load_ms,
            "script": timeouts.script_ms
        })))
    }
}

/// Update any subset of the session timeouts; omitted keys keep their value
pub struct SetTimeouts;

impl CommandHandler for SetTimeouts {
    fn requires_window(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult {
        let request: TimeoutsRequest = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|err| {
                WebDriverErrorResponse::invalid_argument(&format!("Invalid timeouts: {err}"))
            })?;

        let session = ctx.session();
        let mut timeouts = session.timeouts();
        if let Some(implicit) = request.implicit {
            timeouts.implicit_ms = implicit;
        }
        if let Some(page_load) = request.page_load {
            timeouts.page_load_ms = page_load;
        }
        if let Some(script) = request.script {
            timeouts.script_ms = script;
        }
        session.set_timeouts(timeouts);

        Ok(WebDriverResponse::null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::Harness;
    use crate::platform::testing::FakeDocument;
    use crate::server::response::ErrorStatus;

    #[test]
    fn test_set_then_get() {
        let harness = Harness::new(FakeDocument::new());
        harness
            .run(&SetTimeouts, json!({"implicit": 250, "script": 1000}))
            .expect("valid timeouts");

        let value = harness.run(&GetTimeouts, json!({})).expect("timeouts").value;
        assert_eq!(
            value,
            json!({"implicit": 250, "pageLoad": 300_000, "script": 1000})
        );
    }

    #[test]
    fn test_rejects_negative() {
        let harness = Harness::new(FakeDocument::new());
        let err = harness.run(&SetTimeouts, json!({"implicit": -1})).unwrap_err();
        assert_eq!(err.status, ErrorStatus::InvalidArgument);
        assert_eq!(harness.session.timeouts().implicit_ms, 0);
    }
}
