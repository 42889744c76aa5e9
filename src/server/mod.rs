//! HTTP listener adapter.
//!
//! Decodes W3C-style requests into commands for the [`Driver`] and encodes
//! its results. The dispatch core never depends on this module.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;

pub mod handlers;
pub mod response;
pub mod router;

use crate::dispatch::Driver;
use crate::server::response::WebDriverErrorResponse;

/// Shared state for the `WebDriver` server
pub struct AppState {
    pub driver: Driver,
    /// Whether a client currently holds the session
    claimed: AtomicBool,
}

impl AppState {
    pub fn new(driver: Driver) -> Self {
        Self {
            driver,
            claimed: AtomicBool::new(false),
        }
    }

    /// Hand the session to a client. False if someone already holds it.
    pub fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.claimed.store(false, Ordering::Release);
    }

    /// Fail unless `session_id` names the claimed session
    pub fn check_session(&self, session_id: &str) -> Result<(), WebDriverErrorResponse> {
        if self.claimed.load(Ordering::Acquire) && self.driver.session().id() == session_id {
            Ok(())
        } else {
            Err(WebDriverErrorResponse::invalid_session_id(session_id))
        }
    }
}

/// Running HTTP listener
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    server_handle: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Address actually bound, useful when asked for port 0
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.server_handle.await;
    }
}

/// Start the `WebDriver` HTTP server for `driver` on `addr`
pub async fn start(driver: Driver, addr: SocketAddr) -> crate::Result<ServerHandle> {
    let state = Arc::new(AppState::new(driver));
    let router = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let graceful = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });

    let server_handle = tokio::spawn(async move {
        if let Err(err) = graceful.await {
            tracing::error!(error = %err, "WebDriver server error");
        }
    });

    tracing::info!("WebDriver server listening on http://{}", local_addr);

    Ok(ServerHandle {
        addr: local_addr,
        shutdown_tx,
        server_handle,
    })
}
