//! Protobuf messages for the typed payloads we know how to decode.
//!
//! Only the fields worth showing in a log panel are declared; prost skips
//! the rest of the wire data. Each message renders itself into a
//! [`StructuredValue`] following the proto3 JSON mapping: lowerCamelCase
//! names, default values omitted, 64-bit integers as strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use crate::record::StructuredValue;
use crate::severity::Severity;

/// Conversion of a decoded message into the JSON shape used for messages
/// and labels.
pub trait ToStructured {
    fn to_structured(&self) -> StructuredValue;
}

/// `google.cloud.audit.AuditLog`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuditLog {
    #[prost(string, tag = "7")]
    pub service_name: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub method_name: ::prost::alloc::string::String,
    #[prost(string, tag = "11")]
    pub resource_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "12")]
    pub num_response_items: i64,
    #[prost(message, optional, tag = "2")]
    pub status: ::core::option::Option<RpcStatus>,
    #[prost(message, optional, tag = "3")]
    pub authentication_info: ::core::option::Option<AuthenticationInfo>,
    #[prost(message, repeated, tag = "9")]
    pub authorization_info: ::prost::alloc::vec::Vec<AuthorizationInfo>,
    #[prost(message, optional, tag = "4")]
    pub request_metadata: ::core::option::Option<RequestMetadata>,
    #[prost(message, optional, tag = "16")]
    pub request: ::core::option::Option<::prost_types::Struct>,
    #[prost(message, optional, tag = "17")]
    pub response: ::core::option::Option<::prost_types::Struct>,
    #[prost(message, optional, tag = "18")]
    pub metadata: ::core::option::Option<::prost_types::Struct>,
}

/// `google.rpc.Status`, without details.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcStatus {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticationInfo {
    #[prost(string, tag = "1")]
    pub principal_email: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub authority_selector: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub service_account_key_name: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub principal_subject: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizationInfo {
    #[prost(string, tag = "1")]
    pub resource: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub permission: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub granted: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestMetadata {
    #[prost(string, tag = "1")]
    pub caller_ip: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub caller_supplied_user_agent: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub caller_network: ::prost::alloc::string::String,
}

/// `google.appengine.logging.v1.RequestLog`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestLog {
    #[prost(string, tag = "1")]
    pub app_id: ::prost::alloc::string::String,
    #[prost(string, tag = "37")]
    pub module_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub version_id: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub request_id: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub ip: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "6")]
    pub start_time: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "7")]
    pub end_time: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "8")]
    pub latency: ::core::option::Option<::prost_types::Duration>,
    #[prost(string, tag = "10")]
    pub method: ::prost::alloc::string::String,
    #[prost(string, tag = "11")]
    pub resource: ::prost::alloc::string::String,
    #[prost(string, tag = "12")]
    pub http_version: ::prost::alloc::string::String,
    #[prost(int32, tag = "13")]
    pub status: i32,
    #[prost(int64, tag = "14")]
    pub response_size: i64,
    #[prost(string, tag = "16")]
    pub user_agent: ::prost::alloc::string::String,
    #[prost(string, tag = "20")]
    pub host: ::prost::alloc::string::String,
    #[prost(string, tag = "28")]
    pub instance_id: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "29")]
    pub line: ::prost::alloc::vec::Vec<LogLine>,
    #[prost(string, tag = "39")]
    pub trace_id: ::prost::alloc::string::String,
}

/// Application log line attached to a [`RequestLog`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogLine {
    #[prost(message, optional, tag = "1")]
    pub time: ::core::option::Option<::prost_types::Timestamp>,
    /// `google.logging.type.LogSeverity`
    #[prost(int32, tag = "2")]
    pub severity: i32,
    #[prost(string, tag = "3")]
    pub log_message: ::prost::alloc::string::String,
}

impl ToStructured for AuditLog {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .string("serviceName", &self.service_name)
            .string("methodName", &self.method_name)
            .string("resourceName", &self.resource_name)
            .int64("numResponseItems", self.num_response_items)
            .nested("status", self.status.as_ref().map(ToStructured::to_structured))
            .nested(
                "authenticationInfo",
                self.authentication_info.as_ref().map(ToStructured::to_structured),
            )
            .list(
                "authorizationInfo",
                self.authorization_info.iter().map(ToStructured::to_structured).collect(),
            )
            .nested(
                "requestMetadata",
                self.request_metadata.as_ref().map(ToStructured::to_structured),
            )
            .nested("request", self.request.as_ref().map(struct_to_value))
            .nested("response", self.response.as_ref().map(struct_to_value))
            .nested("metadata", self.metadata.as_ref().map(struct_to_value))
            .build()
    }
}

impl ToStructured for RpcStatus {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .int32("code", self.code)
            .string("message", &self.message)
            .build()
    }
}

impl ToStructured for AuthenticationInfo {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .string("principalEmail", &self.principal_email)
            .string("authoritySelector", &self.authority_selector)
            .string("serviceAccountKeyName", &self.service_account_key_name)
            .string("principalSubject", &self.principal_subject)
            .build()
    }
}

impl ToStructured for AuthorizationInfo {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .string("resource", &self.resource)
            .string("permission", &self.permission)
            .boolean("granted", self.granted)
            .build()
    }
}

impl ToStructured for RequestMetadata {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .string("callerIp", &self.caller_ip)
            .string("callerSuppliedUserAgent", &self.caller_supplied_user_agent)
            .string("callerNetwork", &self.caller_network)
            .build()
    }
}

impl ToStructured for RequestLog {
    fn to_structured(&self) -> StructuredValue {
        JsonObject::default()
            .string("appId", &self.app_id)
            .string("moduleId", &self.module_id)
            .string("versionId", &self.version_id)
            .string("requestId", &self.request_id)
            .string("ip", &self.ip)
            .nested("startTime", self.start_time.as_ref().map(timestamp_value))
            .nested("endTime", self.end_time.as_ref().map(timestamp_value))
            .nested(
                "latency",
                self.latency.as_ref().map(|d| Value::String(proto_duration(d))),
            )
            .string("method", &self.method)
            .string("resource", &self.resource)
            .string("httpVersion", &self.http_version)
            .int32("status", self.status)
            .int64("responseSize", self.response_size)
            .string("userAgent", &self.user_agent)
            .string("host", &self.host)
            .string("instanceId", &self.instance_id)
            .list("line", self.line.iter().map(ToStructured::to_structured).collect())
            .string("traceId", &self.trace_id)
            .build()
    }
}

impl ToStructured for LogLine {
    fn to_structured(&self) -> StructuredValue {
        let severity = match self.severity {
            0 => String::new(),
            code => Severity::from_code(code).name().to_string(),
        };
        JsonObject::default()
            .nested("time", self.time.as_ref().map(timestamp_value))
            .string("severity", &severity)
            .string("logMessage", &self.log_message)
            .build()
    }
}

/// Convert a `google.protobuf.Struct` into a JSON object.
pub fn struct_to_value(s: &prost_types::Struct) -> Value {
    Value::Object(
        s.fields
            .iter()
            .map(|(k, v)| (k.clone(), proto_value_to_json(v)))
            .collect(),
    )
}

/// Convert a `google.protobuf.Value` into JSON. Unset kinds become `null`.
pub fn proto_value_to_json(v: &prost_types::Value) -> Value {
    use prost_types::value::Kind;

    match &v.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::NumberValue(n)) => number_value(*n),
        Some(Kind::StringValue(s)) => Value::String(s.clone()),
        Some(Kind::BoolValue(b)) => Value::Bool(*b),
        Some(Kind::StructValue(s)) => struct_to_value(s),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.iter().map(proto_value_to_json).collect())
        }
    }
}

/// Protobuf numbers are doubles; integral ones are kept integral so they
/// render as `123`, not `123.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn timestamp_value(ts: &prost_types::Timestamp) -> Value {
    let nanos = u32::try_from(ts.nanos).unwrap_or(0);
    match DateTime::<Utc>::from_timestamp(ts.seconds, nanos) {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        None => Value::Null,
    }
}

/// proto3 JSON duration form: `"1.500s"` trimmed to `"1.5s"`.
pub fn proto_duration(d: &prost_types::Duration) -> String {
    let negative = d.seconds < 0 || d.nanos < 0;
    let seconds = d.seconds.unsigned_abs();
    let nanos = d.nanos.unsigned_abs();
    let sign = if negative { "-" } else { "" };
    if nanos == 0 {
        return format!("{sign}{seconds}s");
    }
    let fraction = format!("{nanos:09}");
    format!("{sign}{seconds}.{}s", fraction.trim_end_matches('0'))
}

/// Builder for proto3-JSON-like objects that omits default values.
#[derive(Default)]
struct JsonObject(Map<String, Value>);

impl JsonObject {
    fn string(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.0.insert(key.to_string(), Value::String(value.to_string()));
        }
        self
    }

    fn int32(mut self, key: &str, value: i32) -> Self {
        if value != 0 {
            self.0.insert(key.to_string(), Value::from(value));
        }
        self
    }

    fn int64(mut self, key: &str, value: i64) -> Self {
        if value != 0 {
            self.0.insert(key.to_string(), Value::String(value.to_string()));
        }
        self
    }

    fn boolean(mut self, key: &str, value: bool) -> Self {
        if value {
            self.0.insert(key.to_string(), Value::Bool(true));
        }
        self
    }

    fn nested(mut self, key: &str, value: Option<Value>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    fn list(mut self, key: &str, values: Vec<Value>) -> Self {
        if !values.is_empty() {
            self.0.insert(key.to_string(), Value::Array(values));
        }
        self
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}
