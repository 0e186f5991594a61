//! Environment variable names used by this crate to configure
//! normalization from the hosting service.
//!
//! These are purely helpers; the normalizer itself takes an explicit
//! [`NormalizeConfig`](crate::config::NormalizeConfig).

/// How writer labels are keyed: `quoted` (`labels."k"`) or `raw` (`k`).
pub const CLOUD_LOG_LABEL_KEY_STYLE_ENV: &str = "CLOUD_LOG_LABEL_KEY_STYLE";

/// Level shown for `DEFAULT` severity entries: `info` or `debug`.
pub const CLOUD_LOG_DEFAULT_LEVEL_ENV: &str = "CLOUD_LOG_DEFAULT_LEVEL";

/// What to do when an entry has no payload: `yield` or `stop`.
pub const CLOUD_LOG_FAILURE_POLICY_ENV: &str = "CLOUD_LOG_FAILURE_POLICY";

/// Seconds to wait for the first entry during a health check.
pub const CLOUD_LOG_HEALTH_TIMEOUT_SECS_ENV: &str = "CLOUD_LOG_HEALTH_TIMEOUT_SECS";

/// `tracing_subscriber::EnvFilter` directives for [`init_tracing`](crate::init::init_tracing).
pub const CLOUD_LOG_FILTER_ENV: &str = "CLOUD_LOG_FILTER";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
