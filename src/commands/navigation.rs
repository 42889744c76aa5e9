use crate::dispatch::{CommandContext, CommandHandler};
use crate::server::response::{WebDriverResponse, WebDriverResult};
use crate::webdriver::command::required_str;
use crate::webdriver::Parameters;

/// Load a new top-level document in the current window
pub struct NavigateTo;

impl CommandHandler for NavigateTo {
    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult {
        let url = required_str(params, "url")?;
        let browser = ctx.browser()?;
        browser.with_window(|window| window.navigate(url))?;
        browser.on_navigation();
        tracing::debug!(window = %browser.id(), %url, "navigated");
        Ok(WebDriverResponse::null())
    }
}

pub struct GetCurrentUrl;

impl CommandHandler for GetCurrentUrl {
    fn execute(&self, ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
        let url = ctx.browser()?.with_window(|window| window.url())?;
        Ok(WebDriverResponse::success(url))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commands::test_support::Harness;
    use crate::commands::{FindElement, SwitchToFrame};
    use crate::platform::testing::FakeDocument;
    use crate::server::response::ErrorStatus;
    use crate::webdriver::ELEMENT_KEY;

    #[test]
    fn test_navigation_resets_frame_and_invalidates_elements() {
        let harness = Harness::new(
            FakeDocument::new().with_frame("outer", FakeDocument::new().with_element("#a", "p")),
        );
        harness.run(&SwitchToFrame, json!({"id": "outer"})).expect("outer");
        let found = harness
            .run(&FindElement, json!({"using": "css selector", "value": "#a"}))
            .expect("inside outer")
            .value;
        let element_id = found[ELEMENT_KEY].as_str().expect("reference").to_string();
        let generation = harness.browser.generation();

        harness
            .run(&NavigateTo, json!({"url": "https://example.test/next"}))
            .expect("navigates");

        assert!(harness.browser.frame_context().is_root());
        assert!(harness.browser.generation() > generation);
        assert!(harness.window.focused_path().is_empty());
        let err = harness
            .session
            .resolve_element(&harness.browser, &element_id)
            .unwrap_err();
        assert_eq!(err.status, ErrorStatus::StaleElementReference);

        let url = harness.run(&GetCurrentUrl, json!({})).expect("url").value;
        assert_eq!(url, "https://example.test/next");
    }

    #[test]
    fn test_navigate_requires_url() {
        let harness = Harness::new(FakeDocument::new());
        let err = harness.run(&NavigateTo, json!({})).unwrap_err();
        assert_eq!(err.status, ErrorStatus::InvalidArgument);
        assert_eq!(
            harness.run(&GetCurrentUrl, json!({})).expect("url").value,
            "about:blank"
        );
    }
}
