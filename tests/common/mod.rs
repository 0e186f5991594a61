#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use cloud_log_normalizer::api::{LoggingApi, Project};
use cloud_log_normalizer::cursor::{IterCursor, LogCursor};
use cloud_log_normalizer::error::{ApiError, CursorError};
use cloud_log_normalizer::{LogRecord, Payload, QueryPlan, Severity};

pub fn record(insert_id: &str) -> LogRecord {
    LogRecord {
        insert_id: insert_id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        severity: Severity::Info,
        payload: Payload::Text(format!("message {insert_id}")),
        ..Default::default()
    }
}

/// Cursor that never runs out of entries.
pub fn endless_cursor() -> IterCursor {
    let mut n = 0u64;
    IterCursor::new(std::iter::repeat_with(move || {
        n += 1;
        Ok(record(&format!("e{n}")))
    }))
}

/// Cursor that waits before every pull.
pub struct SlowCursor {
    pub delay: Duration,
}

#[async_trait]
impl LogCursor for SlowCursor {
    async fn next_entry(&mut self) -> Result<Option<LogRecord>, CursorError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(record("slow")))
    }
}

pub enum MockEntries {
    Records(Vec<LogRecord>),
    /// Yields the records, then fails.
    FailAfter(Vec<LogRecord>),
    Slow(Duration),
    ListFails,
}

/// In-memory logging API recording the plans it receives.
pub struct MockApi {
    pub entries: MockEntries,
    pub projects: Vec<Project>,
    pub bucket_names: Vec<String>,
    pub view_names: Vec<String>,
    pub plans: Mutex<Vec<QueryPlan>>,
    pub list_calls: AtomicUsize,
}

impl MockApi {
    pub fn new(entries: MockEntries) -> Self {
        Self {
            entries,
            projects: Vec::new(),
            bucket_names: Vec::new(),
            view_names: Vec::new(),
            plans: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn last_plan(&self) -> Option<QueryPlan> {
        self.plans.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LoggingApi for MockApi {
    async fn list_entries(&self, plan: &QueryPlan) -> Result<Box<dyn LogCursor>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.plans.lock().unwrap().push(plan.clone());
        match &self.entries {
            MockEntries::Records(records) => Ok(Box::new(IterCursor::from_records(records.clone()))),
            MockEntries::FailAfter(records) => {
                let items: Vec<Result<LogRecord, CursorError>> = records
                    .iter()
                    .cloned()
                    .map(Ok)
                    .chain(std::iter::once(Err(CursorError::Decode("truncated page".into()))))
                    .collect();
                Ok(Box::new(IterCursor::new(items)))
            }
            MockEntries::Slow(delay) => Ok(Box::new(SlowCursor { delay: *delay })),
            MockEntries::ListFails => Err(ApiError::Request {
                operation: "list entries",
                source: "permission denied".into(),
            }),
        }
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.projects.clone())
    }

    async fn list_bucket_names(&self, _project_id: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.bucket_names.clone())
    }

    async fn list_view_names(&self, _project_id: &str, _bucket_id: &str) -> Result<Vec<String>, ApiError> {
        Ok(self.view_names.clone())
    }
}
