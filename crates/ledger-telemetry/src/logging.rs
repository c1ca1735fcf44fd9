//! Subscriber installation and structured event macros.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber described by `config`.
///
/// Fails if a global subscriber is already installed or the filter directive
/// does not parse.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    if !config.console_output {
        registry
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location);
        registry
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location)
            .with_ansi(true);
        registry
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

/// Install a test-friendly subscriber, ignoring "already installed".
///
/// Output goes through the test writer so `cargo test` captures it.
pub fn init_test_logging() {
    let config = TelemetryConfig::for_tests();
    let filter = build_filter(&config).unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_trx_event {
    ($level:ident, $msg:expr, $digest:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            trx = %$digest,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a proposal-related event with standard fields.
#[macro_export]
macro_rules! log_proposal_event {
    ($level:ident, $msg:expr, $proposal:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            proposal = $proposal,
            $($($field)*,)?
            $msg
        )
    };
}
