//! Application configuration loaded from environment variables.

use std::time::Duration;

use purchase::{LedgerConfig, PollerConfig};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LEDGER_HOST` — ledger gateway host (default: `"localhost:8545"`)
/// - `LEDGER_CREDENTIAL` — opaque gateway credential (default: empty)
/// - `POLL_INTERVAL_MS` — wait before each receipt query (default: `1000`)
/// - `POLL_MAX_ATTEMPTS` — confirmation poll budget (default: `3`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub ledger_host: String,
    pub ledger_credential: String,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ledger_host: std::env::var("LEDGER_HOST")
                .unwrap_or_else(|_| "localhost:8545".to_string()),
            ledger_credential: std::env::var("LEDGER_CREDENTIAL").unwrap_or_default(),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            poll_max_attempts: std::env::var("POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the ledger gateway configuration.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.ledger_host.clone(), self.ledger_credential.clone())
    }

    /// Returns the confirmation polling budget.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            ledger_host: "localhost:8545".to_string(),
            ledger_credential: String::new(),
            poll_interval_ms: 1000,
            poll_max_attempts: 3,
        }
    }
}
