use async_trait::async_trait;

use crate::cursor::LogCursor;
use crate::error::ApiError;
use crate::query::QueryPlan;

/// Lifecycle states of projects that are on their way out.
const DELETED_PROJECT_STATES: [&str; 2] = ["DELETE_REQUESTED", "DELETE_IN_PROGRESS"];

/// A project as returned by the resource manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub project_id: String,
    pub lifecycle_state: String,
}

/// Calls this crate needs from the logging and resource manager APIs.
///
/// Implementations own credentials, connections and transport retries.
/// Every method is called from the query path and should use async I/O.
#[async_trait]
pub trait LoggingApi: Send + Sync {
    /// Start listing entries for `plan`.
    ///
    /// The returned cursor fetches further pages lazily, each at most
    /// `plan.page_size` entries, ordered by `plan.order_by`.
    async fn list_entries(&self, plan: &QueryPlan) -> Result<Box<dyn LogCursor>, ApiError>;

    /// All projects visible to the credentials, in any lifecycle state.
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// Full bucket names, e.g.
    /// `projects/my-project/locations/global/buckets/my-bucket`.
    ///
    /// Buckets of every location are listed under [`bucket_list_parent`].
    async fn list_bucket_names(&self, project_id: &str) -> Result<Vec<String>, ApiError>;

    /// Full view names of a bucket, e.g.
    /// `projects/my-project/locations/global/buckets/my-bucket/views/my-view`.
    ///
    /// Views are listed under [`view_list_parent`].
    async fn list_view_names(&self, project_id: &str, bucket_id: &str) -> Result<Vec<String>, ApiError>;

    /// Release connections. Default implementation is a no-op.
    async fn close(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Ids of the visible projects that are not being deleted.
pub async fn list_project_ids(api: &dyn LoggingApi) -> Result<Vec<String>, ApiError> {
    Ok(active_project_ids(api.list_projects().await?))
}

/// Bucket ids of a project, led by `""` for the project-wide default.
pub async fn list_bucket_ids(api: &dyn LoggingApi, project_id: &str) -> Result<Vec<String>, ApiError> {
    Ok(bucket_ids(api.list_bucket_names(project_id).await?))
}

/// View ids of a bucket, led by `""` for the implicit `_AllLogs` view.
pub async fn list_view_ids(
    api: &dyn LoggingApi,
    project_id: &str,
    bucket_id: &str,
) -> Result<Vec<String>, ApiError> {
    Ok(view_ids(api.list_view_names(project_id, bucket_id).await?))
}

pub fn active_project_ids(projects: impl IntoIterator<Item = Project>) -> Vec<String> {
    projects
        .into_iter()
        .filter(|p| !DELETED_PROJECT_STATES.contains(&p.lifecycle_state.as_str()))
        .map(|p| p.project_id)
        .collect()
}

/// `projects/p/locations/global/buckets/b` becomes `global/buckets/b`.
pub fn bucket_ids(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids = vec![String::new()];
    for name in names {
        let parts: Vec<&str> = name.split('/').collect();
        match parts.get(3..) {
            Some(rest) if !rest.is_empty() => ids.push(rest.join("/")),
            _ => ids.push(name),
        }
    }
    ids
}

/// `projects/p/locations/global/buckets/b/views/v` becomes `v`.
pub fn view_ids(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ids = vec![String::new()];
    ids.extend(names.into_iter().map(|name| match name.rsplit_once('/') {
        Some((_, view)) => view.to_string(),
        None => name,
    }));
    ids
}

/// Parent used when listing the buckets of a project in every location.
pub fn bucket_list_parent(project_id: &str) -> String {
    format!("projects/{project_id}/locations/-")
}

/// Parent used when listing the views of a bucket.
pub fn view_list_parent(project_id: &str, bucket_id: &str) -> String {
    format!("projects/{project_id}/locations/{bucket_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, state: &str) -> Project {
        Project {
            project_id: id.into(),
            lifecycle_state: state.into(),
        }
    }

    #[test]
    fn deleted_projects_are_skipped() {
        let ids = active_project_ids(vec![
            project("live", "ACTIVE"),
            project("going", "DELETE_REQUESTED"),
            project("gone", "DELETE_IN_PROGRESS"),
            project("unknown", ""),
        ]);
        assert_eq!(ids, vec!["live", "unknown"]);
    }

    #[test]
    fn bucket_and_view_ids_start_with_default() {
        assert_eq!(
            bucket_ids(vec!["projects/p/locations/global/buckets/_Default".to_string()]),
            vec!["", "global/buckets/_Default"]
        );
        assert_eq!(
            view_ids(vec!["projects/p/locations/global/buckets/b/views/errors".to_string()]),
            vec!["", "errors"]
        );
        assert_eq!(bucket_ids(Vec::new()), vec![""]);
    }

    #[test]
    fn list_parents() {
        assert_eq!(bucket_list_parent("p"), "projects/p/locations/-");
        assert_eq!(view_list_parent("p", "global/buckets/b"), "projects/p/locations/global/buckets/b");
    }
}
