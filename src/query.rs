use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use crate::error::QueryScopeError;

/// Largest page the provider serves in one response.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Ordering requested for every listing: newest entries first.
pub const ORDER_BY: &str = "timestamp desc";

/// View that every log bucket provides implicitly.
pub const ALL_LOGS_VIEW: &str = "_AllLogs";

/// Inclusive time window of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// A query as the caller expresses it.
///
/// `bucket_id` and `view_id` are optional; empty means unset. Without a
/// bucket the query runs against the whole project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub project_id: String,
    /// Bucket path below `locations/`, e.g. `global/buckets/my-bucket`.
    pub bucket_id: String,
    pub view_id: String,
    pub filter: String,
    pub limit: u64,
    pub time_range: TimeRange,
}

/// A list request ready to hand to the logging API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub resource_name: String,
    pub filter: String,
    pub page_size: i32,
    pub order_by: &'static str,
}

/// Turn a logical query into the provider's resource name, filter and
/// page size.
///
/// **Returns**
/// - `Err(QueryScopeError)` if the project is missing, a view is given
///   without a bucket, the limit is zero or the time range is inverted.
///   Nothing is sent to the provider in that case.
pub fn build_query(query: &Query) -> Result<QueryPlan, QueryScopeError> {
    if query.project_id.trim().is_empty() {
        return Err(QueryScopeError::MissingProject);
    }
    if query.limit == 0 {
        return Err(QueryScopeError::ZeroLimit);
    }
    if query.time_range.from > query.time_range.to {
        return Err(QueryScopeError::InvertedTimeRange {
            from: format_timestamp(&query.time_range.from),
            to: format_timestamp(&query.time_range.to),
        });
    }

    Ok(QueryPlan {
        resource_name: resource_name(&query.project_id, &query.bucket_id, &query.view_id)?,
        filter: filter_string(&query.filter, &query.time_range),
        page_size: page_size(query.limit),
        order_by: ORDER_BY,
    })
}

/// Resource name a query is scoped to.
///
/// - no bucket: `projects/<project>`
/// - bucket only: `projects/<project>/locations/<bucket>/views/_AllLogs`
/// - bucket and view: `projects/<project>/locations/<bucket>/views/<view>`
pub fn resource_name(project_id: &str, bucket_id: &str, view_id: &str) -> Result<String, QueryScopeError> {
    match (bucket_id.is_empty(), view_id.is_empty()) {
        (true, true) => Ok(legacy_project_resource_name(project_id)),
        (true, false) => Err(QueryScopeError::ViewWithoutBucket(view_id.to_string())),
        (false, true) => Ok(format!(
            "projects/{project_id}/locations/{bucket_id}/views/{ALL_LOGS_VIEW}"
        )),
        (false, false) => Ok(format!(
            "projects/{project_id}/locations/{bucket_id}/views/{view_id}"
        )),
    }
}

pub fn legacy_project_resource_name(project_id: &str) -> String {
    format!("projects/{project_id}")
}

/// The user's filter with the time range constraints appended.
pub fn filter_string(filter: &str, range: &TimeRange) -> String {
    let window = format!(
        r#"timestamp >= "{}" AND timestamp <= "{}""#,
        format_timestamp(&range.from),
        format_timestamp(&range.to)
    );
    let filter = filter.trim();
    if filter.is_empty() {
        window
    } else {
        format!("{filter} AND {window}")
    }
}

/// Never exceed the maximum page size.
pub fn page_size(limit: u64) -> i32 {
    i32::try_from(limit).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE)
}

/// RFC 3339 in UTC with a `Z` suffix and second precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Query fields sent by the host UI.
///
/// Older saved queries carry the filter in `query` instead of `queryText`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryModel {
    pub query_text: String,
    pub query: String,
    pub project_id: String,
    pub bucket_id: String,
    pub view_id: String,
}

impl QueryModel {
    /// The filter text, preferring `queryText` over the legacy `query`.
    pub fn filter(&self) -> &str {
        if !self.query_text.is_empty() {
            &self.query_text
        } else {
            &self.query
        }
    }

    pub fn into_query(self, max_data_points: u64, time_range: TimeRange) -> Query {
        Query {
            filter: self.filter().to_string(),
            project_id: self.project_id,
            bucket_id: self.bucket_id,
            view_id: self.view_id,
            limit: max_data_points,
            time_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range() -> TimeRange {
        TimeRange {
            from: Utc.with_ymd_and_hms(2022, 8, 31, 11, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2022, 8, 31, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn empty_filter_has_no_dangling_and() {
        assert_eq!(
            filter_string("  ", &range()),
            r#"timestamp >= "2022-08-31T11:00:00Z" AND timestamp <= "2022-08-31T12:30:00Z""#
        );
    }

    #[test]
    fn page_size_is_capped() {
        assert_eq!(page_size(1), 1);
        assert_eq!(page_size(1000), 1000);
        assert_eq!(page_size(5000), 1000);
        assert_eq!(page_size(u64::MAX), 1000);
    }

    #[test]
    fn query_model_prefers_query_text() {
        let model: QueryModel = serde_json::from_str(
            r#"{"queryText":"severity>=ERROR","query":"old","projectId":"p"}"#,
        )
        .unwrap();
        assert_eq!(model.filter(), "severity>=ERROR");

        let legacy: QueryModel = serde_json::from_str(r#"{"query":"old","projectId":"p"}"#).unwrap();
        let query = legacy.into_query(50, range());
        assert_eq!(query.filter, "old");
        assert_eq!(query.limit, 50);
        assert!(query.bucket_id.is_empty());
    }
}
