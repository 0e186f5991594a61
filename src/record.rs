use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::severity::Severity;

/// JSON-shaped value carried by structured payloads and produced by the
/// opaque payload decoders.
///
/// `serde_json` is built without `preserve_order`, so object keys iterate
/// in sorted order and every rendering of the same value is identical.
pub type StructuredValue = serde_json::Value;

/// Flat label mapping attached to a normalized entry.
pub type Labels = BTreeMap<String, String>;

/// A single entry as returned by the log-query API.
///
/// Records are produced page by page by a [`LogCursor`](crate::cursor::LogCursor),
/// normalized once and then discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// Provider-assigned id, unique only within a time window.
    pub insert_id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    /// Labels attached to the entry by the writer.
    pub labels: BTreeMap<String, String>,
    pub resource: Resource,
    pub payload: Payload,
    /// Either empty or `projects/<project>/traces/<trace id>`.
    pub trace: String,
    pub span_id: String,
    pub http_request: Option<HttpRequest>,
}

/// The monitored resource that wrote an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub r#type: String,
    pub labels: BTreeMap<String, String>,
}

/// Body of a log entry. Exactly one shape is active at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// The entry carries no payload at all.
    #[default]
    None,
    Text(String),
    Structured(StructuredValue),
    /// A typed protobuf message packed as `google.protobuf.Any`.
    Opaque { type_url: String, value: Vec<u8> },
}

impl Payload {
    /// Short name of the active variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::None => "none",
            Payload::Text(_) => "textPayload",
            Payload::Structured(_) => "jsonPayload",
            Payload::Opaque { .. } => "protoPayload",
        }
    }
}

/// HTTP request metadata recorded for entries written by serving workloads.
///
/// Serializes with the provider's camelCase field names. `latency` is not
/// serialized; label building renders it as a duration string instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_url: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub request_size: i64,
    #[serde(skip_serializing_if = "is_zero_status")]
    pub status: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub response_size: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_agent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remote_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub referer: String,
    #[serde(skip)]
    pub latency: Option<Duration>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cache_lookup: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cache_hit: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cache_validated_with_origin_server: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub cache_fill_bytes: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub protocol: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

fn is_zero_status(v: &i32) -> bool {
    *v == 0
}
