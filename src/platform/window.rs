use std::fmt;

use thiserror::Error;

use crate::server::response::WebDriverErrorResponse;
use crate::webdriver::locator::LocatorStrategy;

/// Opaque reference to a DOM node owned by the automation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef(String);

impl NodeRef {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frame the window currently focuses, as reported by the automation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusedContext {
    TopLevel,
    Frame(NodeRef),
}

/// Reasons the automation layer refuses a frame switch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("no such frame")]
    NoSuchFrame,
    #[error("element is not a frame or iframe")]
    NotAFrame,
    #[error("frame element is detached from the document")]
    Detached,
    #[error("{0}")]
    Other(String),
}

/// Failures of window-level automation calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window has been closed")]
    Closed,
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("{0}")]
    Other(String),
}

impl From<FrameError> for WebDriverErrorResponse {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::NoSuchFrame | FrameError::NotAFrame | FrameError::Detached => {
                tracing::debug!(reason = %err, "frame switch refused");
                Self::no_such_frame()
            }
            FrameError::Other(message) => Self::unknown_error(&message),
        }
    }
}

impl From<WindowError> for WebDriverErrorResponse {
    fn from(err: WindowError) -> Self {
        match err {
            WindowError::Closed => Self::no_such_window(),
            other => Self::unknown_error(&other.to_string()),
        }
    }
}

/// Automation surface of one top-level browser window.
///
/// Implementations wrap the browser's native automation objects. They are only
/// ever called from the automation thread; `Send` is required so the window can
/// be handed to that thread when it is discovered.
pub trait BrowserWindow: Send {
    // =========================================================================
    // Frames
    // =========================================================================

    /// Frame the window's automation context points at right now
    fn current_focused_frame(&self) -> FocusedContext;

    /// Point the automation context back at the top-level document
    fn set_focused_frame_to_root(&mut self);

    /// Enter the frame hosted by `node`, a child of the focused document
    fn set_focused_frame_by_element(&mut self, node: &NodeRef) -> Result<(), FrameError>;

    /// Enter the child frame whose name or id attribute equals `name`
    fn set_focused_frame_by_name(&mut self, name: &str) -> Result<(), FrameError>;

    /// Enter the child frame at zero-based position `index`
    fn set_focused_frame_by_index(&mut self, index: usize) -> Result<(), FrameError>;

    // =========================================================================
    // Elements
    // =========================================================================

    /// Find the first node matching the locator inside the focused frame
    fn find_element(
        &mut self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Option<NodeRef>, WindowError>;

    // =========================================================================
    // Navigation & lifecycle
    // =========================================================================

    fn navigate(&mut self, url: &str) -> Result<(), WindowError>;

    fn url(&self) -> Result<String, WindowError>;

    fn close(&mut self) -> Result<(), WindowError>;
}
