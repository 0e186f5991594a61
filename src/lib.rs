//! Normalizes Cloud Logging entries into display-ready log lines: a message
//! string plus a flat map of labels for filtering and faceting.
//!
//! The crate does no network I/O. A transport implements [`api::LoggingApi`]
//! and [`cursor::LogCursor`]; this crate builds the query it should send
//! and turns each returned entry into a [`frame::NormalizedEntry`].

pub mod api;
pub mod config;
pub mod cursor;
pub mod datasource;
pub mod decoder;
pub mod env;
pub mod error;
pub mod flatten;
pub mod frame;
pub mod health;
pub mod init;
pub mod labels;
pub mod paginate;
pub mod payload;
pub mod proto;
pub mod query;
pub mod record;
pub mod severity;

pub use config::{LabelKeyStyle, NormalizeConfig, RecordFailurePolicy};
pub use frame::{LogFrame, NormalizedEntry};
pub use labels::build_labels;
pub use paginate::{drive, LogPager, PageOutcome, StopReason};
pub use payload::extract_message;
pub use query::{build_query, Query, QueryPlan, TimeRange};
pub use record::{HttpRequest, Labels, LogRecord, Payload, Resource, StructuredValue};
pub use severity::{normalize_level, DefaultLevel, Severity};
