use std::error::Error;

/// Boxed error used at the seams implemented outside this crate.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Error returned by message extraction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("unknown payload type: entry has no payload")]
    UnknownPayload,
}

/// Error decoding a typed (opaque) payload.
///
/// Never surfaced to callers of the normalizer: the message falls back to
/// a raw rendering and the labels are skipped.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("no decoder registered for {0}")]
    Unregistered(String),

    #[error("malformed {type_name} payload: {source}")]
    Malformed {
        type_name: String,
        #[source]
        source: prost::DecodeError,
    },
}

/// Failure reported by a [`LogCursor`](crate::cursor::LogCursor) while
/// pulling the next entry.
#[derive(thiserror::Error, Debug)]
pub enum CursorError {
    #[error("error getting page: {0}")]
    Transport(#[source] BoxError),

    #[error("error decoding entry: {0}")]
    Decode(String),
}

/// A logical query that cannot be turned into a request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryScopeError {
    #[error("project id is required")]
    MissingProject,

    #[error("view {0:?} requires a bucket id")]
    ViewWithoutBucket(String),

    #[error("limit must be greater than zero")]
    ZeroLimit,

    #[error("time range start {from} is after its end {to}")]
    InvertedTimeRange { from: String, to: String },
}

/// Failure of a call made through [`LoggingApi`](crate::api::LoggingApi).
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{operation}: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

/// Error returned by [`run_query`](crate::datasource::run_query).
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("invalid query: {0}")]
    Scope(#[from] QueryScopeError),

    #[error("query: {0}")]
    Api(#[from] ApiError),
}

/// Reason a health check query failed. Timeouts and empty projects are
/// reported separately.
#[derive(thiserror::Error, Debug)]
pub enum HealthError {
    #[error("list entries: timeout")]
    Timeout,

    #[error("no entries")]
    NoEntries,

    #[error("list entries: {0}")]
    Query(#[source] BoxError),

    #[error("invalid health check query: {0}")]
    Scope(#[from] QueryScopeError),
}

/// Invalid configuration value or logging setup failure.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
