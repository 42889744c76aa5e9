//! Concrete command handlers and the standard name table.

mod element;
mod frame;
mod navigation;
mod timeouts;
mod window;

pub use element::FindElement;
pub use frame::{FrameTarget, SwitchToFrame, SwitchToParentFrame};
pub use navigation::{GetCurrentUrl, NavigateTo};
pub use timeouts::{GetTimeouts, SetTimeouts};
pub use window::{CloseWindow, GetWindowHandle, GetWindowHandles, SwitchToWindow};

use crate::dispatch::HandlerTable;

pub const SWITCH_TO_FRAME: &str = "switchToFrame";
pub const SWITCH_TO_PARENT_FRAME: &str = "switchToParentFrame";
pub const FIND_ELEMENT: &str = "findElement";
pub const NAVIGATE_TO: &str = "navigateTo";
pub const GET_CURRENT_URL: &str = "getCurrentUrl";
pub const GET_WINDOW_HANDLE: &str = "getWindowHandle";
pub const GET_WINDOW_HANDLES: &str = "getWindowHandles";
pub const SWITCH_TO_WINDOW: &str = "switchToWindow";
pub const CLOSE_WINDOW: &str = "closeWindow";
pub const GET_TIMEOUTS: &str = "getTimeouts";
pub const SET_TIMEOUTS: &str = "setTimeouts";

/// Every built-in handler under its command name
pub fn standard_handlers() -> HandlerTable {
    HandlerTable::new()
        .with(SWITCH_TO_FRAME, SwitchToFrame)
        .with(SWITCH_TO_PARENT_FRAME, SwitchToParentFrame)
        .with(FIND_ELEMENT, FindElement)
        .with(NAVIGATE_TO, NavigateTo)
        .with(GET_CURRENT_URL, GetCurrentUrl)
        .with(GET_WINDOW_HANDLE, GetWindowHandle)
        .with(GET_WINDOW_HANDLES, GetWindowHandles)
        .with(SWITCH_TO_WINDOW, SwitchToWindow)
        .with(CLOSE_WINDOW, CloseWindow)
        .with(GET_TIMEOUTS, GetTimeouts)
        .with(SET_TIMEOUTS, SetTimeouts)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use serde_json::Value;

    use crate::dispatch::{CommandContext, CommandHandler};
    use crate::platform::testing::{FakeDocument, FakeWindow};
    use crate::server::response::WebDriverResult;
    use crate::webdriver::{BrowserHandle, Parameters, Session};

    /// A session with one current fake window
    pub(crate) struct Harness {
        pub session: Session,
        pub browser: Arc<BrowserHandle>,
        pub window: FakeWindow,
    }

    impl Harness {
        pub(crate) fn new(document: FakeDocument) -> Self {
            let window = FakeWindow::new(document);
            let session = Session::new(Default::default());
            let browser = session.registry().register_browser(window.boxed());
            session.set_current_window(Some(browser.id().to_string()));
            Self {
                session,
                browser,
                window,
            }
        }

        pub(crate) fn run(&self, handler: &dyn CommandHandler, params: Value) -> WebDriverResult {
            let params: Parameters = match params {
                Value::Object(map) => map,
                _ => Parameters::new(),
            };
            let browser = self.session.current_browser().ok();
            let ctx = CommandContext::new(&self.session, browser);
            handler.execute(&ctx, &params)
        }
    }
}
