use serde_json::Value;
use tracing::warn;

use crate::decoder::{self, DecoderRegistry};
use crate::error::MessageError;
use crate::record::{Payload, StructuredValue};

/// Field of a structured payload holding the human-readable message.
pub const MESSAGE_FIELD: &str = "message";

/// Get the display message of a payload using the built-in decoders.
///
/// See [`extract_message_with`].
pub fn extract_message(payload: &Payload) -> Result<String, MessageError> {
    extract_message_with(payload, decoder::builtin())
}

/// Get the display message of a payload.
///
/// **Parameters**
/// - `payload`: the entry body.
/// - `registry`: decoders for typed payloads.
///
/// **Returns**
/// - `Err(MessageError::UnknownPayload)` when the entry has no payload.
/// - The text verbatim for text payloads.
/// - For structured payloads, the `message` field (raw if it is a string,
///   compact JSON otherwise), or the whole payload as compact JSON when
///   there is no such field. Its other fields end up as labels.
/// - For typed payloads, the decoded message as compact JSON, or a raw
///   rendering of the type URL and bytes if it cannot be decoded.
pub fn extract_message_with(
    payload: &Payload,
    registry: &DecoderRegistry,
) -> Result<String, MessageError> {
    match payload {
        Payload::None => Err(MessageError::UnknownPayload),
        Payload::Text(text) => Ok(text.clone()),
        Payload::Structured(value) => Ok(structured_message(value)),
        Payload::Opaque { type_url, value } => Ok(opaque_message(registry, type_url, value)),
    }
}

fn structured_message(value: &StructuredValue) -> String {
    match value.get(MESSAGE_FIELD) {
        Some(Value::String(message)) => message.clone(),
        Some(message) => to_compact_json(message),
        None => to_compact_json(value),
    }
}

fn opaque_message(registry: &DecoderRegistry, type_url: &str, value: &[u8]) -> String {
    if !registry.is_registered(type_url) {
        return decoder::raw_any_text(type_url, value);
    }
    match registry.decode(type_url, value) {
        Ok(decoded) => to_compact_json(&decoded),
        Err(err) => {
            warn!(type_url, error = %err, "failed decoding typed payload, using raw value");
            decoder::raw_any_text(type_url, value)
        }
    }
}

/// Compact JSON with sorted object keys.
pub fn to_compact_json(value: &StructuredValue) -> String {
    // Serializing a `Value` cannot fail: all keys are strings.
    serde_json::to_string(value).unwrap_or_default()
}
