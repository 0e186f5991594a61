use async_trait::async_trait;

use crate::error::CursorError;
use crate::record::LogRecord;

/// Paged stream of log entries returned by a list request.
///
/// Implemented by the transport that talks to the logging API. The pager
/// pulls entries one at a time and never asks for more than it needs.
#[async_trait]
pub trait LogCursor: Send {
    /// Pull the next entry, fetching the next page if needed.
    ///
    /// **Returns**
    /// - `Ok(Some(record))` for the next entry.
    /// - `Ok(None)` once the result set is exhausted. This is not an error.
    /// - `Err(..)` if the page could not be fetched or decoded. The pager
    ///   stops at the first error and keeps what it already has.
    async fn next_entry(&mut self) -> Result<Option<LogRecord>, CursorError>;
}

#[async_trait]
impl<C: LogCursor + ?Sized> LogCursor for Box<C> {
    async fn next_entry(&mut self) -> Result<Option<LogRecord>, CursorError> {
        (**self).next_entry().await
    }
}

/// Cursor over results that are already in memory.
///
/// Useful for tests and for transports that fetch a page eagerly.
pub struct IterCursor {
    items: Box<dyn Iterator<Item = Result<LogRecord, CursorError>> + Send>,
}

impl IterCursor {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<LogRecord, CursorError>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            items: Box::new(items.into_iter()),
        }
    }

    /// A cursor that yields `records` and then reports exhaustion.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = LogRecord>,
        I::IntoIter: Send + 'static,
    {
        Self::new(records.into_iter().map(Ok))
    }
}

#[async_trait]
impl LogCursor for IterCursor {
    async fn next_entry(&mut self) -> Result<Option<LogRecord>, CursorError> {
        self.items.next().transpose()
    }
}
