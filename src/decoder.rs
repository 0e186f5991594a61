use once_cell::sync::Lazy;
use prost::Message;
use std::collections::HashMap;
use std::fmt;

use crate::error::DecodeError;
use crate::proto::{AuditLog, RequestLog, ToStructured};
use crate::record::StructuredValue;

/// Prefix of every type URL the provider emits.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

pub const AUDIT_LOG_TYPE: &str = "google.cloud.audit.AuditLog";
pub const REQUEST_LOG_TYPE: &str = "google.appengine.logging.v1.RequestLog";

/// Decodes the bytes of a typed payload into a structured value.
pub type DecodeFn = fn(&[u8]) -> Result<StructuredValue, DecodeError>;

static BUILTIN: Lazy<DecoderRegistry> = Lazy::new(DecoderRegistry::with_builtin);

/// Registry of typed payload decoders keyed by fully qualified message name.
///
/// A type URL is matched on its last path segment, so
/// `type.googleapis.com/google.cloud.audit.AuditLog` resolves to the
/// `google.cloud.audit.AuditLog` entry. Supporting another payload schema
/// means registering another entry.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl DecoderRegistry {
    /// An empty registry. Every opaque payload falls back to raw text.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the AuditLog and App Engine RequestLog decoders.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(AUDIT_LOG_TYPE, decode_audit_log);
        registry.register(REQUEST_LOG_TYPE, decode_request_log);
        registry
    }

    /// Add or replace the decoder for `type_name`.
    pub fn register(&mut self, type_name: impl Into<String>, decoder: DecodeFn) {
        self.decoders.insert(type_name.into(), decoder);
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.decoders.contains_key(type_name(type_url))
    }

    /// Decode `value` with the decoder registered for `type_url`.
    ///
    /// **Returns**
    /// - `Err(DecodeError::Unregistered)` if no decoder matches.
    /// - `Err(DecodeError::Malformed)` if the bytes do not parse.
    pub fn decode(&self, type_url: &str, value: &[u8]) -> Result<StructuredValue, DecodeError> {
        let name = type_name(type_url);
        match self.decoders.get(name) {
            Some(decode) => decode(value),
            None => Err(DecodeError::Unregistered(name.to_string())),
        }
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.decoders.keys().collect();
        names.sort();
        f.debug_struct("DecoderRegistry").field("types", &names).finish()
    }
}

/// Process-wide registry holding the built-in decoders.
pub fn builtin() -> &'static DecoderRegistry {
    &BUILTIN
}

/// Message name of a type URL: everything after the last `/`.
pub fn type_name(type_url: &str) -> &str {
    type_url
        .rsplit_once('/')
        .map(|(_, name)| name)
        .unwrap_or(type_url)
}

/// Fallback rendering of a payload no decoder could handle.
pub fn raw_any_text(type_url: &str, value: &[u8]) -> String {
    format!("type_url:{:?} value:\"{}\"", type_url, value.escape_ascii())
}

fn decode_as<M>(type_name: &str, bytes: &[u8]) -> Result<StructuredValue, DecodeError>
where
    M: Message + Default + ToStructured,
{
    M::decode(bytes)
        .map(|msg| msg.to_structured())
        .map_err(|source| DecodeError::Malformed {
            type_name: type_name.to_string(),
            source,
        })
}

fn decode_audit_log(bytes: &[u8]) -> Result<StructuredValue, DecodeError> {
    decode_as::<AuditLog>(AUDIT_LOG_TYPE, bytes)
}

fn decode_request_log(bytes: &[u8]) -> Result<StructuredValue, DecodeError> {
    decode_as::<RequestLog>(REQUEST_LOG_TYPE, bytes)
}
