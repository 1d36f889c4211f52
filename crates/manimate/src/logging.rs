//! Tracing subscriber setup for the CLI.

use manimate_error::ConfigError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How log output is filtered and formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Raise the default level to `debug`
    pub verbose: bool,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl LoggingOptions {
    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the default level when set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(options: LoggingOptions) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directive()));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if options.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::new(format!("Failed to initialise logging: {}", e)))
}
