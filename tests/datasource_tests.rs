mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use cloud_log_normalizer::api::{list_bucket_ids, list_project_ids, list_view_ids, Project};
use cloud_log_normalizer::datasource::run_query;
use cloud_log_normalizer::error::{CursorError, QueryError, QueryScopeError};
use cloud_log_normalizer::{NormalizeConfig, Payload, Query, StopReason, TimeRange};

use common::{record, MockApi, MockEntries};

fn query(limit: u64) -> Query {
    Query {
        project_id: "test-proj".into(),
        bucket_id: String::new(),
        view_id: String::new(),
        filter: "severity>=WARNING".into(),
        limit,
        time_range: TimeRange {
            from: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        },
    }
}

#[tokio::test]
async fn returns_one_frame_per_entry() {
    let mut structured = record("json");
    structured.payload = Payload::Structured(json!({"message": "disk full", "code": 28}));
    let api = MockApi::new(MockEntries::Records(vec![record("text"), structured]));

    let response = run_query(&api, &query(10), &NormalizeConfig::default()).await.unwrap();

    assert_eq!(response.frames.len(), 2);
    assert!(matches!(response.stop, StopReason::Exhausted));
    assert_eq!(response.frames[0].content, "message text");
    assert_eq!(response.frames[1].content, "disk full");
    assert_eq!(
        response.frames[1].labels.get("jsonPayload.code").map(String::as_str),
        Some("28")
    );
}

#[tokio::test]
async fn plan_is_sent_to_the_api() {
    let api = MockApi::new(MockEntries::Records(Vec::new()));

    run_query(&api, &query(5000), &NormalizeConfig::default()).await.unwrap();

    let plan = api.last_plan().unwrap();
    assert_eq!(api.calls(), 1);
    assert_eq!(plan.resource_name, "projects/test-proj");
    assert_eq!(plan.page_size, 1000);
    assert_eq!(plan.order_by, "timestamp desc");
    assert!(plan.filter.starts_with("severity>=WARNING AND timestamp >= "));
}

#[tokio::test]
async fn limit_caps_frames() {
    let records = (0..20).map(|i| record(&format!("r{i}"))).collect();
    let api = MockApi::new(MockEntries::Records(records));

    let response = run_query(&api, &query(7), &NormalizeConfig::default()).await.unwrap();

    assert_eq!(response.frames.len(), 7);
    assert!(matches!(response.stop, StopReason::LimitReached));
}

#[tokio::test]
async fn invalid_scope_makes_no_call() {
    let api = MockApi::new(MockEntries::Records(vec![record("a")]));
    let bad = Query {
        view_id: "errors-only".into(),
        ..query(10)
    };

    let err = run_query(&api, &bad, &NormalizeConfig::default()).await.unwrap_err();

    assert!(matches!(err, QueryError::Scope(QueryScopeError::ViewWithoutBucket(_))));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn failed_list_request_is_an_error() {
    let api = MockApi::new(MockEntries::ListFails);

    let err = run_query(&api, &query(10), &NormalizeConfig::default()).await.unwrap_err();

    assert!(matches!(err, QueryError::Api(_)));
}

#[tokio::test]
async fn stream_failure_returns_partial_frames() {
    let api = MockApi::new(MockEntries::FailAfter(vec![record("a"), record("b")]));

    let response = run_query(&api, &query(10), &NormalizeConfig::default()).await.unwrap();

    assert_eq!(response.frames.len(), 2);
    assert!(matches!(response.stop, StopReason::StreamError(CursorError::Decode(_))));
}

#[tokio::test]
async fn frame_serializes_as_logs_frame() {
    let api = MockApi::new(MockEntries::Records(vec![record("a")]));

    let response = run_query(&api, &query(10), &NormalizeConfig::default()).await.unwrap();
    let value = serde_json::to_value(&response.frames[0]).unwrap();

    assert_eq!(value["meta"]["preferredVisualization"], "logs");
    assert_eq!(value["fields"][1]["values"][0], "message a");
    assert_eq!(value["fields"][1]["labels"]["level"], "info");
}

#[tokio::test]
async fn resource_listings() {
    let mut api = MockApi::new(MockEntries::Records(Vec::new()));
    api.projects = vec![
        Project {
            project_id: "live".into(),
            lifecycle_state: "ACTIVE".into(),
        },
        Project {
            project_id: "gone".into(),
            lifecycle_state: "DELETE_REQUESTED".into(),
        },
    ];
    api.bucket_names = vec!["projects/live/locations/global/buckets/audit".into()];
    api.view_names = vec!["projects/live/locations/global/buckets/audit/views/errors".into()];

    assert_eq!(list_project_ids(&api).await.unwrap(), vec!["live"]);
    assert_eq!(list_bucket_ids(&api, "live").await.unwrap(), vec!["", "global/buckets/audit"]);
    assert_eq!(
        list_view_ids(&api, "live", "global/buckets/audit").await.unwrap(),
        vec!["", "errors"]
    );
}
