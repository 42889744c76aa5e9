//! Command dispatch engine.
//!
//! [`Driver`] is the inbound side: it validates a command, hands it to the
//! automation thread and suspends until the result arrives or the deadline
//! passes. The target window is resolved on the automation thread when the
//! command's turn comes.
//!
//! Timeout policy: a command that misses its deadline keeps the engine busy.
//! While busy, new commands fail immediately with a timeout instead of queueing
//! behind it. When the late command finishes, its result is dropped, the
//! session's current window and the affected window's frame focus are restored
//! to what they were before it ran, and the engine accepts commands again.

mod handler;
mod worker;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::Instant;

pub use handler::{CommandContext, CommandHandler, HandlerTable};
pub use worker::{EventOutcome, WindowEvent};

use crate::config::DriverConfig;
use crate::platform::BrowserWindow;
use crate::server::response::{WebDriverErrorResponse, WebDriverResult};
use crate::webdriver::{Command, Session};
use crate::{Error, Result};
use worker::Job;

struct Inner {
    session: Arc<Session>,
    handlers: HandlerTable,
    queue: mpsc::Sender<Job>,
    /// Admits one command at a time
    gate: Mutex<()>,
    /// Set while a command is queued or running on the automation thread
    busy: Arc<AtomicBool>,
    command_timeout: Duration,
}

/// Cloneable handle to the dispatch engine.
///
/// The automation thread exits once every clone has been dropped.
#[derive(Clone)]
pub struct Driver {
    inner: Arc<Inner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("session", &self.inner.session.id())
            .field("handlers", &self.inner.handlers)
            .field("command_timeout", &self.inner.command_timeout)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Create the session and start the automation thread
    pub fn spawn(config: &DriverConfig, handlers: HandlerTable) -> Result<Self> {
        config.validate()?;

        let session = Arc::new(Session::new(config.timeouts.clone()));
        let busy = Arc::new(AtomicBool::new(false));
        let (queue, rx) = mpsc::channel(config.queue_capacity);
        worker::spawn(session.clone(), rx, busy.clone())?;

        tracing::info!(session = %session.id(), "driver started");

        Ok(Self {
            inner: Arc::new(Inner {
                session,
                handlers,
                queue,
                gate: Mutex::new(()),
                busy,
                command_timeout: config.command_timeout(),
            }),
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// True while a command (possibly a timed-out one) occupies the automation thread
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Execute a command with the configured command timeout
    pub async fn execute(&self, command: Command) -> WebDriverResult {
        self.execute_with_timeout(command, self.inner.command_timeout).await
    }

    /// Execute a command, giving up after `timeout`
    pub async fn execute_with_timeout(
        &self,
        command: Command,
        timeout: Duration,
    ) -> WebDriverResult {
        let deadline = Instant::now() + timeout;
        let name = command.name().to_string();

        let handler = self
            .inner
            .handlers
            .get(&name)
            .ok_or_else(|| WebDriverErrorResponse::unknown_command(&name))?;

        let Ok(_guard) = tokio::time::timeout_at(deadline, self.inner.gate.lock()).await else {
            return Err(WebDriverErrorResponse::timeout(&format!(
                "Timed out waiting to run {name}"
            )));
        };

        if self.inner.busy.swap(true, Ordering::AcqRel) {
            return Err(WebDriverErrorResponse::timeout(
                "Automation thread is still busy with a timed-out command",
            ));
        }

        let (respond_to, mut rx) = oneshot::channel();
        let job = Job::Command {
            command,
            handler,
            respond_to,
        };
        if self.inner.queue.send(job).await.is_err() {
            self.inner.busy.store(false, Ordering::Release);
            return Err(WebDriverErrorResponse::unknown_error(
                "Automation thread has shut down",
            ));
        }

        match tokio::time::timeout_at(deadline, &mut rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                self.inner.busy.store(false, Ordering::Release);
                Err(WebDriverErrorResponse::unknown_error(
                    "Automation thread dropped the command",
                ))
            }
            Err(_) => {
                // Close first so a result sent from now on is refused and rolled back
                rx.close();
                if let Ok(result) = rx.try_recv() {
                    return result;
                }
                tracing::warn!(command = %name, ?timeout, "command timed out");
                Err(WebDriverErrorResponse::timeout(&format!(
                    "Command {name} did not complete within {}ms",
                    timeout.as_millis()
                )))
            }
        }
    }

    // =========================================================================
    // Window lifecycle events
    // =========================================================================

    /// Register a window that appeared in the browser; returns its handle
    pub async fn open_window(&self, window: Box<dyn BrowserWindow>) -> Result<String> {
        match self.post_event(WindowEvent::Opened(window)).await? {
            EventOutcome::Registered(id) => Ok(id),
            other => Err(Error::UnexpectedOutcome(other)),
        }
    }

    /// Tell the driver a window went away
    pub async fn window_closed(&self, id: &str) -> Result<EventOutcome> {
        self.post_event(WindowEvent::Closed(id.to_string())).await
    }

    /// Tell the driver a window loaded a new top-level document
    pub async fn window_navigated(&self, id: &str) -> Result<EventOutcome> {
        self.post_event(WindowEvent::Navigated(id.to_string())).await
    }

    /// Queue a lifecycle event behind any pending command and wait for it to apply
    pub async fn post_event(&self, event: WindowEvent) -> Result<EventOutcome> {
        let (respond_to, rx) = oneshot::channel();
        self.inner
            .queue
            .send(Job::Event { event, respond_to })
            .await
            .map_err(|_| Error::AutomationThreadGone)?;
        match tokio::time::timeout(self.inner.command_timeout, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(Error::AutomationThreadGone),
            Err(_) => Err(Error::Timeout(self.inner.command_timeout)),
        }
    }
}
