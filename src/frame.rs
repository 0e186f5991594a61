use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::config::NormalizeConfig;
use crate::decoder::{self, DecoderRegistry};
use crate::error::MessageError;
use crate::labels::build_labels_with;
use crate::payload::extract_message_with;
use crate::record::{Labels, LogRecord};

/// A log entry reduced to what a log panel displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    /// Insert id of the source entry.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub labels: Labels,
}

impl NormalizedEntry {
    /// Normalize a record with the built-in decoders. An entry without a
    /// payload gets an empty message; its labels are kept.
    pub fn from_record(record: &LogRecord, config: &NormalizeConfig) -> Self {
        Self::try_from_record_with(record, config, decoder::builtin())
            .unwrap_or_else(|_| Self::assemble(record, String::new(), config, decoder::builtin()))
    }

    /// Normalize a record, failing if its message cannot be extracted.
    pub fn try_from_record_with(
        record: &LogRecord,
        config: &NormalizeConfig,
        registry: &DecoderRegistry,
    ) -> Result<Self, MessageError> {
        let message = extract_message_with(&record.payload, registry)?;
        Ok(Self::assemble(record, message, config, registry))
    }

    pub(crate) fn assemble(
        record: &LogRecord,
        message: String,
        config: &NormalizeConfig,
        registry: &DecoderRegistry,
    ) -> Self {
        Self {
            id: record.insert_id.clone(),
            timestamp: record.timestamp,
            message,
            labels: build_labels_with(record, config, registry),
        }
    }
}

/// How the host should present a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visualization {
    #[default]
    Logs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMeta {
    pub preferred_visualization: Visualization,
}

/// Display unit handed to the host, one per log entry.
///
/// Serializes as a frame named after the insert id with a `time` field and
/// a `content` field that carries the labels:
///
/// ```json
/// {"name":"x1",
///  "fields":[{"name":"time","values":["..."]},
///            {"name":"content","labels":{"id":"x1"},"values":["hello"]}],
///  "meta":{"preferredVisualization":"logs"}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogFrame {
    pub name: String,
    pub time: DateTime<Utc>,
    pub content: String,
    pub labels: Labels,
    pub meta: FrameMeta,
}

impl From<NormalizedEntry> for LogFrame {
    fn from(entry: NormalizedEntry) -> Self {
        Self {
            name: entry.id,
            time: entry.timestamp,
            content: entry.message,
            labels: entry.labels,
            meta: FrameMeta::default(),
        }
    }
}

#[derive(Serialize)]
struct WireField<'a, T: Serialize> {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a Labels>,
    values: [&'a T; 1],
}

#[derive(Serialize)]
struct WireFrame<'a> {
    name: &'a str,
    fields: (WireField<'a, DateTime<Utc>>, WireField<'a, String>),
    meta: &'a FrameMeta,
}

impl Serialize for LogFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireFrame {
            name: &self.name,
            fields: (
                WireField {
                    name: "time",
                    labels: None,
                    values: [&self.time],
                },
                WireField {
                    name: "content",
                    labels: Some(&self.labels),
                    values: [&self.content],
                },
            ),
            meta: &self.meta,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn frame_serializes_in_host_shape() {
        let mut labels = Labels::new();
        labels.insert("id".into(), "x1".into());
        let frame = LogFrame::from(NormalizedEntry {
            id: "x1".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            message: "hello".into(),
            labels,
        });
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({
                "name": "x1",
                "fields": [
                    {"name": "time", "values": ["2024-01-02T03:04:05Z"]},
                    {"name": "content", "labels": {"id": "x1"}, "values": ["hello"]}
                ],
                "meta": {"preferredVisualization": "logs"}
            })
        );
    }
}
