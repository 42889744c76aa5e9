use std::time::Duration;

use serde::Deserialize;

use crate::webdriver::Timeouts;
use crate::{Error, Result};

/// Default port for the `WebDriver` HTTP server
pub const DEFAULT_PORT: u16 = 4445;

/// Driver configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// Port the HTTP listener binds on 127.0.0.1
    pub port: u16,
    /// How long a caller waits for one command before getting a timeout
    pub command_timeout_ms: u64,
    /// Capacity of the queue feeding the automation thread
    pub queue_capacity: usize,
    /// Initial session timeouts
    pub timeouts: Timeouts,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            command_timeout_ms: 30_000,
            queue_capacity: 32,
            timeouts: Timeouts::default(),
        }
    }
}

impl DriverConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::Config("queueCapacity must be at least 1".into()));
        }
        if self.command_timeout_ms == 0 {
            return Err(Error::Config("commandTimeoutMs must be positive".into()));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}
