//! Dispatch core for a `WebDriver`-style browser automation driver.
//!
//! Commands arrive as a name plus a JSON parameter map, are handed to a single
//! automation thread that owns every browser call, and come back as a
//! [`WebDriverResult`](server::response::WebDriverResult). The [`server`]
//! module exposes the core over HTTP.

use std::net::SocketAddr;

pub mod commands;
pub mod config;
pub mod dispatch;
mod error;
pub mod platform;
pub mod server;
pub mod webdriver;

pub use config::{DriverConfig, DEFAULT_PORT};
pub use dispatch::Driver;
pub use error::{Error, Result};
pub use server::ServerHandle;

/// Start a driver with the built-in command handlers and serve it on
/// `127.0.0.1:<port>`.
///
/// Windows are announced afterwards through [`Driver::open_window`].
pub async fn start(config: &DriverConfig) -> Result<(Driver, ServerHandle)> {
    let driver = Driver::spawn(config, commands::standard_handlers())?;
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let server = server::start(driver.clone(), addr).await?;
    tracing::info!("WebDriver driver initialized on port {}", server.addr().port());
    Ok((driver, server))
}
