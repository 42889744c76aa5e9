use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::server::response::{WebDriverErrorResponse, WebDriverResult};
use crate::webdriver::{BrowserHandle, ElementHandle, Parameters, Session};

/// What a handler sees while it runs on the automation thread
pub struct CommandContext<'a> {
    session: &'a Session,
    browser: Option<Arc<BrowserHandle>>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(session: &'a Session, browser: Option<Arc<BrowserHandle>>) -> Self {
        Self { session, browser }
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// The window the command targets
    pub fn browser(&self) -> Result<&Arc<BrowserHandle>, WebDriverErrorResponse> {
        self.browser
            .as_ref()
            .ok_or_else(WebDriverErrorResponse::no_such_window)
    }

    /// Resolve an element ID against the targeted window's focused frame
    pub fn element(&self, element_id: &str) -> Result<Arc<ElementHandle>, WebDriverErrorResponse> {
        self.session.resolve_element(self.browser()?, element_id)
    }
}

/// One automation operation.
///
/// Handlers run on the automation thread and report failures as values; a
/// panic is caught by the engine and reported as an unknown error.
pub trait CommandHandler: Send + Sync {
    /// Whether the command needs a current window. When true and the session has
    /// none, the engine fails with no such window without running the handler.
    fn requires_window(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &CommandContext<'_>, params: &Parameters) -> WebDriverResult;
}

/// Command name to handler lookup
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerTable").field("commands", &names).finish()
    }
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the handler for `name`
    #[must_use]
    pub fn with(mut self, name: &str, handler: impl CommandHandler + 'static) -> Self {
        self.register(name, handler);
        self
    }

    pub fn register(&mut self, name: &str, handler: impl CommandHandler + 'static) {
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::response::WebDriverResponse;

    struct Ping;

    impl CommandHandler for Ping {
        fn requires_window(&self) -> bool {
            false
        }

        fn execute(&self, _ctx: &CommandContext<'_>, _params: &Parameters) -> WebDriverResult {
            Ok(WebDriverResponse::success("pong"))
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let table = HandlerTable::new().with("ping", Ping);
        assert!(table.contains("ping"));
        assert!(table.get("ping").is_some());
        assert!(table.get("pong").is_none());
    }

    #[test]
    fn test_context_without_window() {
        let session = Session::new(Default::default());
        let ctx = CommandContext::new(&session, None);
        assert!(ctx.browser().is_err());
        let handler = Ping;
        let response = handler.execute(&ctx, &Parameters::new()).expect("ping succeeds");
        assert_eq!(response.value, "pong");
    }
}
