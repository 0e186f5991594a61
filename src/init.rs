use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::env::{env_or, CLOUD_LOG_FILTER_ENV};
use crate::error::ConfigError;

/// Logging setup for processes embedding the normalizer.
///
/// **Fields**
/// - `filter`: `EnvFilter` directives, e.g. `info,cloud_log_normalizer=debug`.
/// - `enable_stdout`: write events to stdout. When `false` they go to
///   stderr, for hosts that reserve stdout for their own protocol.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub filter: String,
    pub enable_stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: env_or(CLOUD_LOG_FILTER_ENV, "info"),
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber built from `config`.
///
/// **Returns**
/// - `Err(ConfigError::InvalidValue)` if the filter does not parse.
/// - `Err(ConfigError::Subscriber)` if a global subscriber is already set.
pub fn init_tracing_with_config(config: LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|_| ConfigError::InvalidValue {
        key: CLOUD_LOG_FILTER_ENV,
        value: config.filter.clone(),
    })?;

    // The two writers give different layer types, so build both variants.
    let result = if config.enable_stdout {
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stdout));
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|err| ConfigError::Subscriber(err.to_string()))
}

/// Initialize tracing with [`LoggingConfig::default`].
pub fn init_tracing() -> Result<(), ConfigError> {
    init_tracing_with_config(LoggingConfig::default())
}
