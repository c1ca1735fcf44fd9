//! # Ledger Telemetry
//!
//! Structured logging for ledger-core processes, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // Ledger events are now emitted as fmt or JSON lines
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LEDGER_SERVICE_NAME` | `ledger-core` | Service name |
//! | `LEDGER_LOG_LEVEL` | `info` | Log filter (`RUST_LOG` also honored) |
//! | `LEDGER_JSON_LOGS` | `false` | JSON output |
//! | `LEDGER_CONSOLE_OUTPUT` | `true` | Console output |
//! | `LEDGER_LOG_SOURCE` | `false` | File and line in events |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
