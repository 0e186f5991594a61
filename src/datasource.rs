use std::time::Instant;
use tracing::debug;

use crate::api::LoggingApi;
use crate::config::NormalizeConfig;
use crate::error::QueryError;
use crate::frame::LogFrame;
use crate::paginate::{LogPager, StopReason};
use crate::query::{build_query, Query};

/// Frames produced for one query and the reason listing stopped.
#[derive(Debug)]
pub struct QueryResponse {
    pub frames: Vec<LogFrame>,
    pub stop: StopReason,
}

/// Execute `query` against `api` and normalize the results into frames.
///
/// **Returns**
/// - `Err(QueryError::Scope)` if the query is malformed; no call is made.
/// - `Err(QueryError::Api)` if the list request could not be started.
/// - Otherwise up to `query.limit` frames. A stream failure midway ends
///   the listing early; frames produced so far are returned and
///   `stop` carries the failure.
pub async fn run_query(
    api: &dyn LoggingApi,
    query: &Query,
    config: &NormalizeConfig,
) -> Result<QueryResponse, QueryError> {
    let plan = build_query(query)?;
    let started = Instant::now();

    let cursor = api.list_entries(&plan).await?;
    let outcome = LogPager::new(cursor, query.limit, *config).run().await;

    debug!(
        resource_name = %plan.resource_name,
        entries = outcome.entries.len(),
        duration = ?started.elapsed(),
        "finished listing logs"
    );

    Ok(QueryResponse {
        frames: outcome.entries.into_iter().map(LogFrame::from).collect(),
        stop: outcome.stop,
    })
}
