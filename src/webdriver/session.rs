use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::browser::BrowserHandle;
use super::element::ElementHandle;
use super::registry::{HandleRegistry, LookupError};
use crate::server::response::WebDriverErrorResponse;

/// Session timeouts configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_field_names)]
pub struct Timeouts {
    /// Implicit wait timeout in milliseconds
    pub implicit_ms: u64,
    /// Page load timeout in milliseconds
    pub page_load_ms: u64,
    /// Script execution timeout in milliseconds
    pub script_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            implicit_ms: 0,
            page_load_ms: 300_000,
            script_ms: 30_000,
        }
    }
}

/// Process-wide driver state.
///
/// Exactly one exists per driver; it is created by
/// [`Driver::spawn`](crate::dispatch::Driver::spawn) and lives until the
/// last driver handle is dropped. The current window and the registry contents
/// are only changed from the automation thread.
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier
    id: String,
    registry: HandleRegistry,
    /// Window commands target, if any
    current_window: RwLock<Option<String>>,
    timeouts: RwLock<Timeouts>,
}

impl Session {
    pub fn new(timeouts: Timeouts) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            registry: HandleRegistry::new(),
            current_window: RwLock::new(None),
            timeouts: RwLock::new(timeouts),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn current_window_id(&self) -> Option<String> {
        self.current_window
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The window commands currently target
    pub fn current_browser(&self) -> Result<Arc<BrowserHandle>, WebDriverErrorResponse> {
        let id = self
            .current_window_id()
            .ok_or_else(WebDriverErrorResponse::no_such_window)?;
        self.registry
            .browser(&id)
            .map_err(|_| WebDriverErrorResponse::no_such_window())
    }

    pub(crate) fn set_current_window(&self, id: Option<String>) {
        *self
            .current_window
            .write()
            .unwrap_or_else(PoisonError::into_inner) = id;
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_timeouts(&self, timeouts: Timeouts) {
        *self.timeouts.write().unwrap_or_else(PoisonError::into_inner) = timeouts;
    }

    /// Resolve an element ID for use against `browser`'s focused frame.
    ///
    /// Fails with stale element reference when the element was torn down or
    /// belongs to another window or frame generation.
    pub fn resolve_element(
        &self,
        browser: &BrowserHandle,
        element_id: &str,
    ) -> Result<Arc<ElementHandle>, WebDriverErrorResponse> {
        let element = self.registry.element(element_id).map_err(|err| match err {
            LookupError::Unknown => WebDriverErrorResponse::no_such_element(),
            LookupError::Stale => WebDriverErrorResponse::stale_element_reference(),
        })?;
        if element.browser_id() != browser.id() || element.generation() != browser.generation() {
            return Err(WebDriverErrorResponse::stale_element_reference());
        }
        Ok(element)
    }
}
