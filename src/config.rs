use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::env::{
    env_or, CLOUD_LOG_DEFAULT_LEVEL_ENV, CLOUD_LOG_FAILURE_POLICY_ENV,
    CLOUD_LOG_HEALTH_TIMEOUT_SECS_ENV, CLOUD_LOG_LABEL_KEY_STYLE_ENV,
};
use crate::error::ConfigError;
use crate::severity::DefaultLevel;

/// Default wait for the first entry of a health check query.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(60);

/// How labels attached by the log writer are keyed in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKeyStyle {
    /// `labels."<key>"`, the form the provider's filter language accepts.
    #[default]
    Quoted,
    /// The key as written.
    Raw,
}

impl LabelKeyStyle {
    pub fn key(self, name: &str) -> String {
        match self {
            LabelKeyStyle::Quoted => format!("labels.\"{name}\""),
            LabelKeyStyle::Raw => name.to_string(),
        }
    }
}

impl FromStr for LabelKeyStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quoted" => Ok(LabelKeyStyle::Quoted),
            "raw" => Ok(LabelKeyStyle::Raw),
            other => Err(ConfigError::InvalidValue {
                key: CLOUD_LOG_LABEL_KEY_STYLE_ENV,
                value: other.to_string(),
            }),
        }
    }
}

/// What the pager does with an entry whose message cannot be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RecordFailurePolicy {
    /// Log it and yield the entry with an empty message and its labels.
    #[default]
    #[serde(rename = "yield")]
    YieldEmptyMessage,
    /// Log it, drop the entry and end the stream.
    #[serde(rename = "stop")]
    StopStream,
}

impl FromStr for RecordFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yield" => Ok(RecordFailurePolicy::YieldEmptyMessage),
            "stop" => Ok(RecordFailurePolicy::StopStream),
            other => Err(ConfigError::InvalidValue {
                key: CLOUD_LOG_FAILURE_POLICY_ENV,
                value: other.to_string(),
            }),
        }
    }
}

/// Conventions applied while normalizing entries.
///
/// Deserializes from the host's camelCase JSON settings; missing fields
/// take their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizeConfig {
    pub label_key_style: LabelKeyStyle,
    pub default_level: DefaultLevel,
    pub failure_policy: RecordFailurePolicy,
}

impl NormalizeConfig {
    /// Build a config from `CLOUD_LOG_*` environment variables, using the
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            label_key_style: parse_env(CLOUD_LOG_LABEL_KEY_STYLE_ENV, defaults.label_key_style)?,
            default_level: parse_env(CLOUD_LOG_DEFAULT_LEVEL_ENV, defaults.default_level)?,
            failure_policy: parse_env(CLOUD_LOG_FAILURE_POLICY_ENV, defaults.failure_policy)?,
        })
    }
}

/// Health check timeout from `CLOUD_LOG_HEALTH_TIMEOUT_SECS`.
pub fn health_timeout_from_env() -> Result<Duration, ConfigError> {
    let raw = env_or(CLOUD_LOG_HEALTH_TIMEOUT_SECS_ENV, "");
    if raw.trim().is_empty() {
        return Ok(DEFAULT_HEALTH_TIMEOUT);
    }
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            key: CLOUD_LOG_HEALTH_TIMEOUT_SECS_ENV,
            value: raw.clone(),
        }),
    }
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    let raw = env_or(key, "");
    if raw.trim().is_empty() {
        return Ok(default);
    }
    raw.parse::<T>().map_err(|err| match err {
        ConfigError::InvalidValue { value, .. } => ConfigError::InvalidValue { key, value },
        other => other,
    })
}
