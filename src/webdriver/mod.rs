pub mod browser;
pub mod command;
pub mod element;
pub mod frame;
pub mod locator;
pub mod registry;
pub mod session;

pub use browser::BrowserHandle;
pub use command::{Command, Parameters};
pub use element::{ElementHandle, ELEMENT_KEY, LEGACY_ELEMENT_KEY};
pub use frame::{FocusedFrame, FrameContext, FrameSelector};
pub use registry::{HandleRegistry, LookupError};
pub use session::{Session, Timeouts};
