use serde_json::Value;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::warn;

use crate::config::NormalizeConfig;
use crate::decoder::{self, DecoderRegistry};
use crate::flatten::{flatten_into, join_key};
use crate::payload::MESSAGE_FIELD;
use crate::record::{HttpRequest, Labels, LogRecord, Payload};
use crate::severity::normalize_level;

/// Build the label map of an entry using the built-in payload decoders.
///
/// See [`build_labels_with`].
pub fn build_labels(record: &LogRecord, config: &NormalizeConfig) -> Labels {
    build_labels_with(record, config, decoder::builtin())
}

/// Build the flat label map of an entry.
///
/// Labels are written in a fixed order and later writes win on a key
/// collision:
///
/// 1. `id` and `level`
/// 2. `resource.type`, then `resource.labels.<k>`
/// 3. writer labels, keyed per [`LabelKeyStyle`](crate::config::LabelKeyStyle)
/// 4. `jsonPayload.*` for structured payloads (without `message`), or
///    `protoPayload.*` for typed payloads with a registered decoder
/// 5. `httpRequest.*`
/// 6. `trace`, `traceId` and `spanId`
///
/// Never fails. A typed payload that does not decode is logged and
/// contributes only its `protoPayload.@type` label.
pub fn build_labels_with(
    record: &LogRecord,
    config: &NormalizeConfig,
    registry: &DecoderRegistry,
) -> Labels {
    let mut labels = Labels::new();
    labels.insert("id".to_string(), record.insert_id.clone());
    labels.insert(
        "level".to_string(),
        normalize_level(&record.severity, config.default_level),
    );

    if !record.resource.r#type.is_empty() {
        labels.insert("resource.type".to_string(), record.resource.r#type.clone());
    }
    for (k, v) in &record.resource.labels {
        labels.insert(format!("resource.labels.{k}"), v.clone());
    }
    for (k, v) in &record.labels {
        labels.insert(config.label_key_style.key(k), v.clone());
    }

    payload_labels(&mut labels, record, registry);

    if let Some(request) = &record.http_request {
        http_request_labels(&mut labels, request);
    }

    if !record.trace.is_empty() {
        labels.insert("trace".to_string(), record.trace.clone());
        labels.insert("traceId".to_string(), trace_id(&record.trace).to_string());
    }
    if !record.span_id.is_empty() {
        labels.insert("spanId".to_string(), record.span_id.clone());
    }

    labels
}

fn payload_labels(labels: &mut Labels, record: &LogRecord, registry: &DecoderRegistry) {
    match &record.payload {
        Payload::None | Payload::Text(_) => {}
        Payload::Structured(Value::Object(fields)) => {
            for (k, v) in fields {
                if k != MESSAGE_FIELD {
                    flatten_into(labels, &join_key("jsonPayload", k), v);
                }
            }
        }
        Payload::Structured(other) => flatten_into(labels, "jsonPayload", other),
        Payload::Opaque { type_url, value } => {
            if !registry.is_registered(type_url) {
                return;
            }
            labels.insert("protoPayload.@type".to_string(), type_url.clone());
            match registry.decode(type_url, value) {
                Ok(decoded) => flatten_into(labels, "protoPayload", &decoded),
                Err(err) => warn!(
                    insert_id = %record.insert_id,
                    type_url = %type_url,
                    error = %err,
                    "failed decoding typed payload labels"
                ),
            }
        }
    }
}

fn http_request_labels(labels: &mut Labels, request: &HttpRequest) {
    match serde_json::to_value(request) {
        Ok(value) => flatten_into(labels, "httpRequest", &value),
        Err(err) => warn!(error = %err, "failed serializing httpRequest"),
    }
    if let Some(latency) = request.latency {
        labels.insert("httpRequest.latency".to_string(), format_duration(latency));
    }
}

/// Trace id of a `projects/<p>/traces/<id>` trace name: its last segment.
pub fn trace_id(trace: &str) -> &str {
    trace.rsplit_once('/').map(|(_, id)| id).unwrap_or(trace)
}

/// Render a duration the way Go's `time.Duration` prints it:
/// `250ms`, `1.5s`, `1m30s`, `2h0m5s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    match nanos {
        0 => "0s".to_string(),
        n if n < 1_000 => format!("{n}ns"),
        n if n < 1_000_000 => format!("{}µs", decimal(n, 1_000)),
        n if n < 1_000_000_000 => format!("{}ms", decimal(n, 1_000_000)),
        _ => {
            let total_secs = d.as_secs();
            let hours = total_secs / 3600;
            let minutes = (total_secs % 3600) / 60;
            let secs_nanos = u128::from(total_secs % 60) * 1_000_000_000
                + u128::from(d.subsec_nanos());
            let mut out = String::new();
            if hours > 0 {
                let _ = write!(out, "{hours}h");
            }
            if hours > 0 || minutes > 0 {
                let _ = write!(out, "{minutes}m");
            }
            let _ = write!(out, "{}s", decimal(secs_nanos, 1_000_000_000));
            out
        }
    }
}

/// `value / unit` with the fraction printed only as far as needed.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
