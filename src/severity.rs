use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Provider severity codes and their symbolic names.
const SEVERITY_TABLE: [(i32, &str); 9] = [
    (0, "DEFAULT"),
    (100, "DEBUG"),
    (200, "INFO"),
    (300, "NOTICE"),
    (400, "WARNING"),
    (500, "ERROR"),
    (600, "CRITICAL"),
    (700, "ALERT"),
    (800, "EMERGENCY"),
];

/// Severity of a log entry as defined by the provider.
///
/// Values outside the known set are kept as [`Severity::Unrecognized`]
/// with their symbolic (or numeric) name so that normalization stays total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    #[default]
    Default,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
    Unrecognized(String),
}

impl Severity {
    /// Map a provider numeric code (`0`, `100`, ... `800`).
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Severity::Default,
            100 => Severity::Debug,
            200 => Severity::Info,
            300 => Severity::Notice,
            400 => Severity::Warning,
            500 => Severity::Error,
            600 => Severity::Critical,
            700 => Severity::Alert,
            800 => Severity::Emergency,
            other => Severity::Unrecognized(other.to_string()),
        }
    }

    /// Map a symbolic name such as `"WARNING"`, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match SEVERITY_TABLE.iter().find(|(_, n)| *n == upper) {
            Some((code, _)) => Severity::from_code(*code),
            None => Severity::Unrecognized(name.trim().to_string()),
        }
    }

    /// Symbolic name as the provider spells it.
    pub fn name(&self) -> &str {
        match self {
            Severity::Default => "DEFAULT",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
            Severity::Unrecognized(name) => name,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display level used for entries with the `DEFAULT` severity.
///
/// Earlier renditions of this mapping disagreed, so the choice is left to
/// the caller. `Info` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultLevel {
    #[default]
    Info,
    Debug,
}

impl DefaultLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DefaultLevel::Info => "info",
            DefaultLevel::Debug => "debug",
        }
    }
}

impl FromStr for DefaultLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(DefaultLevel::Info),
            "debug" => Ok(DefaultLevel::Debug),
            other => Err(ConfigError::InvalidValue {
                key: "default level",
                value: other.to_string(),
            }),
        }
    }
}

/// Normalize a provider severity to the level vocabulary of the log panel.
///
/// **Returns**
/// - `"critical"` for `EMERGENCY`, which the panel has no level for.
/// - `default_level` for `DEFAULT`.
/// - The lower-cased symbolic name for everything else, including
///   unrecognized values. Never an empty string.
pub fn normalize_level(severity: &Severity, default_level: DefaultLevel) -> String {
    match severity {
        Severity::Emergency => "critical".to_string(),
        Severity::Default => default_level.as_str().to_string(),
        Severity::Unrecognized(name) if name.trim().is_empty() => "unknown".to_string(),
        other => other.name().trim().to_lowercase(),
    }
}
