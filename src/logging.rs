//! # Structured Logging Module
//!
//! Environment-aware `tracing` setup for binaries and tests built on the clientset.
//! Library code only emits events; installing a subscriber is left to the caller.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
///
/// `SPIKE_LOG` takes a full `EnvFilter` directive and wins over the environment
/// default. `SPIKE_LOG_FORMAT=json` switches console output to JSON lines.
pub fn init_structured_logging() {
    init_structured_logging_with(None);
}

/// Initialize structured logging, using `directive` when `SPIKE_LOG` is unset
///
/// Binaries pass the verbosity picked on their command line here instead of
/// writing it into the process environment.
pub fn init_structured_logging_with(directive: Option<&str>) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let directive =
            filter_directive(std::env::var("SPIKE_LOG").ok(), directive, &environment);
        let filter = EnvFilter::try_new(&directive)
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let layer = if json_output_requested() {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_filter(filter)
                .boxed()
        };

        // Use try_init to avoid panic if global subscriber already set
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::debug!(environment = %environment, "Structured logging initialized");
    });
}

/// Pick the filter directive: `SPIKE_LOG`, then the caller's, then the environment default
fn filter_directive(from_env: Option<String>, requested: Option<&str>, environment: &str) -> String {
    from_env
        .filter(|directive| !directive.trim().is_empty())
        .or_else(|| requested.map(str::to_string))
        .unwrap_or_else(|| get_log_level(environment))
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("SPIKE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn json_output_requested() -> bool {
    std::env::var("SPIKE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
