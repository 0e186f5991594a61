use tracing::{debug, warn};

use crate::config::{NormalizeConfig, RecordFailurePolicy};
use crate::cursor::LogCursor;
use crate::decoder::{self, DecoderRegistry};
use crate::error::{CursorError, MessageError};
use crate::frame::NormalizedEntry;

/// Why a pager stopped producing entries.
#[derive(Debug)]
pub enum StopReason {
    /// The cursor ran out of entries.
    Exhausted,
    /// The requested number of entries was produced.
    LimitReached,
    /// The cursor failed; entries produced before the failure are kept.
    StreamError(CursorError),
    /// An entry had no message and the policy is
    /// [`RecordFailurePolicy::StopStream`]. The entry itself is dropped.
    RecordFailed { insert_id: String, error: MessageError },
}

impl StopReason {
    /// `true` when the pager stopped before the result set was exhausted
    /// for a reason other than the limit.
    pub fn is_early(&self) -> bool {
        matches!(self, StopReason::StreamError(_) | StopReason::RecordFailed { .. })
    }
}

/// Entries produced by a pager and the reason it stopped.
#[derive(Debug)]
pub struct PageOutcome {
    pub entries: Vec<NormalizedEntry>,
    pub stop: StopReason,
}

/// Drives a [`LogCursor`] and normalizes each entry it yields.
///
/// Pulls are strictly sequential and the pager owns no shared state, so
/// dropping it (or a pending `next_entry` future) between pulls abandons
/// the query without side effects. Once stopped, it stays stopped.
pub struct LogPager<'r, C> {
    cursor: C,
    limit: u64,
    yielded: u64,
    config: NormalizeConfig,
    registry: &'r DecoderRegistry,
    stop: Option<StopReason>,
}

impl<C: LogCursor> LogPager<'static, C> {
    /// Create a pager that produces at most `limit` entries, decoding typed
    /// payloads with the built-in decoders.
    pub fn new(cursor: C, limit: u64, config: NormalizeConfig) -> Self {
        LogPager::with_registry(cursor, limit, config, decoder::builtin())
    }
}

impl<'r, C: LogCursor> LogPager<'r, C> {
    pub fn with_registry(
        cursor: C,
        limit: u64,
        config: NormalizeConfig,
        registry: &'r DecoderRegistry,
    ) -> Self {
        Self {
            cursor,
            limit,
            yielded: 0,
            config,
            registry,
            stop: None,
        }
    }

    /// Produce the next normalized entry.
    ///
    /// **Returns**
    /// - `Some(entry)` while the cursor has entries and the limit is not
    ///   reached.
    /// - `None` once stopped; [`stop_reason`](Self::stop_reason) says why.
    pub async fn next_entry(&mut self) -> Option<NormalizedEntry> {
        if self.stop.is_some() {
            return None;
        }
        if self.yielded >= self.limit {
            self.stop = Some(StopReason::LimitReached);
            return None;
        }

        let record = match self.cursor.next_entry().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.stop = Some(StopReason::Exhausted);
                return None;
            }
            Err(err) => {
                warn!(error = %err, yielded = self.yielded, "error getting page, returning partial results");
                self.stop = Some(StopReason::StreamError(err));
                return None;
            }
        };

        let entry = match NormalizedEntry::try_from_record_with(&record, &self.config, self.registry) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(
                    insert_id = %record.insert_id,
                    payload = record.payload.kind(),
                    error = %error,
                    "failed getting log message"
                );
                match self.config.failure_policy {
                    RecordFailurePolicy::YieldEmptyMessage => {
                        NormalizedEntry::assemble(&record, String::new(), &self.config, self.registry)
                    }
                    RecordFailurePolicy::StopStream => {
                        self.stop = Some(StopReason::RecordFailed {
                            insert_id: record.insert_id,
                            error,
                        });
                        return None;
                    }
                }
            }
        };

        self.yielded += 1;
        Some(entry)
    }

    /// Number of entries produced so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    /// Pull until stopped and return everything produced.
    pub async fn run(mut self) -> PageOutcome {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await {
            entries.push(entry);
        }
        let stop = self.stop.unwrap_or(StopReason::Exhausted);
        debug!(entries = entries.len(), stop = ?stop, "pagination finished");
        PageOutcome { entries, stop }
    }
}

/// Drive `cursor` to completion, producing at most `limit` entries.
pub async fn drive<C: LogCursor>(cursor: C, limit: u64, config: NormalizeConfig) -> PageOutcome {
    LogPager::new(cursor, limit, config).run().await
}
