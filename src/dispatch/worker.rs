//! The automation thread.
//!
//! Owns every call into the browser's automation surface. Jobs arrive on a
//! bounded queue and run strictly one at a time in arrival order.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};

use super::handler::{CommandContext, CommandHandler};
use crate::platform::BrowserWindow;
use crate::server::response::{WebDriverErrorResponse, WebDriverResult};
use crate::webdriver::{BrowserHandle, Command, FrameContext, Session};

pub(crate) const THREAD_NAME: &str = "webdriver-automation";

/// Window lifecycle notifications from the browser layer
pub enum WindowEvent {
    /// A new top-level window appeared
    Opened(Box<dyn BrowserWindow>),
    /// The window with this handle went away
    Closed(String),
    /// The window with this handle loaded a new top-level document
    Navigated(String),
}

/// Result of processing a [`WindowEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Handle assigned to an opened window
    Registered(String),
    /// A closed or navigated window was known and has been updated
    Applied,
    /// The event named a window that is not registered
    UnknownWindow,
}

pub(crate) enum Job {
    Command {
        command: Command,
        handler: Arc<dyn CommandHandler>,
        respond_to: oneshot::Sender<WebDriverResult>,
    },
    Event {
        event: WindowEvent,
        respond_to: oneshot::Sender<EventOutcome>,
    },
}

pub(crate) fn spawn(
    session: Arc<Session>,
    mut queue: mpsc::Receiver<Job>,
    busy: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || {
            tracing::debug!("automation thread started");
            while let Some(job) = queue.blocking_recv() {
                match job {
                    Job::Command {
                        command,
                        handler,
                        respond_to,
                    } => {
                        run_command(&session, &command, handler.as_ref(), respond_to, &busy);
                    }
                    Job::Event { event, respond_to } => {
                        let outcome = apply_event(&session, event);
                        let _ = respond_to.send(outcome);
                    }
                }
                sweep_stale_elements(&session);
            }
            tracing::debug!("automation thread exiting");
        })
}

fn run_command(
    session: &Session,
    command: &Command,
    handler: &dyn CommandHandler,
    respond_to: oneshot::Sender<WebDriverResult>,
    busy: &AtomicBool,
) {
    // The current window is resolved here so commands see the effects of
    // every command that ran before them
    let window_before = session.current_window_id();
    let browser = session.current_browser().ok();
    let frame_before = browser
        .as_ref()
        .map(|browser| (browser.clone(), browser.frame_context()));

    let result = execute(session, command, handler, browser);
    match &result {
        Ok(_) => tracing::debug!(command = %command.name(), "command succeeded"),
        Err(err) => tracing::debug!(command = %command.name(), error = %err, "command failed"),
    }

    // Anything enqueued from here on still runs after the rollback below
    busy.store(false, Ordering::Release);
    if respond_to.send(result).is_err() {
        tracing::warn!(
            command = %command.name(),
            "caller gave up waiting; discarding result and restoring prior context"
        );
        roll_back(session, window_before, frame_before);
    }
}

fn execute(
    session: &Session,
    command: &Command,
    handler: &dyn CommandHandler,
    browser: Option<Arc<BrowserHandle>>,
) -> WebDriverResult {
    if handler.requires_window() && browser.is_none() {
        return Err(WebDriverErrorResponse::no_such_window());
    }

    let ctx = CommandContext::new(session, browser);
    panic::catch_unwind(AssertUnwindSafe(|| handler.execute(&ctx, command.parameters())))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(command = %command.name(), %message, "command handler panicked");
            Err(WebDriverErrorResponse::unknown_error(&message))
        })
}

fn roll_back(
    session: &Session,
    window_before: Option<String>,
    frame_before: Option<(Arc<BrowserHandle>, FrameContext)>,
) {
    let window_before = window_before.filter(|id| session.registry().browser(id).is_ok());
    session.set_current_window(window_before);

    if let Some((browser, snapshot)) = frame_before {
        if session.registry().browser(browser.id()).is_ok() {
            browser.restore_frame(&snapshot);
        }
    }
}

fn apply_event(session: &Session, event: WindowEvent) -> EventOutcome {
    match event {
        WindowEvent::Opened(window) => {
            let browser = session.registry().register_browser(window);
            if session.current_browser().is_err() {
                session.set_current_window(Some(browser.id().to_string()));
            }
            tracing::info!(window = %browser.id(), "window opened");
            EventOutcome::Registered(browser.id().to_string())
        }
        WindowEvent::Closed(id) => {
            if session.registry().unregister_browser(&id).is_none() {
                return EventOutcome::UnknownWindow;
            }
            if session.current_window_id().as_deref() == Some(id.as_str()) {
                session.set_current_window(None);
            }
            tracing::info!(window = %id, "window closed");
            EventOutcome::Applied
        }
        WindowEvent::Navigated(id) => match session.registry().browser(&id) {
            Ok(browser) => {
                browser.on_navigation();
                tracing::debug!(window = %id, "window navigated");
                EventOutcome::Applied
            }
            Err(_) => EventOutcome::UnknownWindow,
        },
    }
}

/// Retire elements whose frame generation is no longer current
fn sweep_stale_elements(session: &Session) {
    let registry = session.registry();
    for browser in registry.browsers() {
        let retired = registry.retire_stale_elements(browser.id(), browser.generation());
        if retired > 0 {
            tracing::debug!(window = %browser.id(), retired, "retired stale elements");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("command handler panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("command handler panicked: {message}")
    } else {
        "command handler panicked".to_string()
    }
}
