use std::time::{Duration, Instant};
use tracing::debug;

use crate::api::LoggingApi;
use crate::error::{HealthError, QueryScopeError};
use crate::query::{legacy_project_resource_name, QueryPlan, ORDER_BY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Outcome of [`check_health`], worded for the data source settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: String,
}

/// Query a single entry of `project_id` and report whether one arrived
/// within `timeout`.
///
/// **Returns**
/// - `Ok(())` if an entry came back in time.
/// - `Err(HealthError::Timeout)` if the wait ran out.
/// - `Err(HealthError::NoEntries)` if the project has no entries.
/// - `Err(HealthError::Query)` if the API call or page fetch failed.
pub async fn test_connection(
    api: &dyn LoggingApi,
    project_id: &str,
    timeout: Duration,
) -> Result<(), HealthError> {
    if project_id.trim().is_empty() {
        return Err(QueryScopeError::MissingProject.into());
    }
    let plan = QueryPlan {
        resource_name: legacy_project_resource_name(project_id),
        filter: String::new(),
        page_size: 1,
        order_by: ORDER_BY,
    };

    let started = Instant::now();
    let first = tokio::time::timeout(timeout, async {
        let mut cursor = api
            .list_entries(&plan)
            .await
            .map_err(|err| HealthError::Query(Box::new(err)))?;
        cursor
            .next_entry()
            .await
            .map_err(|err| HealthError::Query(Box::new(err)))
    })
    .await;
    debug!(duration = ?started.elapsed(), project_id, "finished test connection");

    match first {
        Err(_elapsed) => Err(HealthError::Timeout),
        Ok(Err(err)) => Err(err),
        Ok(Ok(None)) => Err(HealthError::NoEntries),
        Ok(Ok(Some(_))) => Ok(()),
    }
}

/// Run [`test_connection`] and turn the outcome into a health result.
pub async fn check_health(api: &dyn LoggingApi, project_id: &str, timeout: Duration) -> HealthCheckResult {
    match test_connection(api, project_id, timeout).await {
        Ok(()) => HealthCheckResult {
            status: HealthStatus::Ok,
            message: format!("Successfully queried logs from GCP project {project_id}"),
        },
        Err(err) => HealthCheckResult {
            status: HealthStatus::Error,
            message: format!("failed to run test query: {err}"),
        },
    }
}
