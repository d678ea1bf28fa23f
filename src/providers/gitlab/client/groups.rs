use super::core::GitLabClient;
use super::models::{GroupNode, ProjectNode};
use crate::error::{ExplorerError, Result};

impl GitLabClient {
    pub async fn fetch_group(&self, group_id: u64) -> Result<GroupNode> {
        self.get_json(&format!("groups/{group_id}"), &[])
            .await
            .map_err(|e| not_found(e, || ExplorerError::GroupNotFound(group_id)))
    }

    pub async fn fetch_descendant_groups(&self, group_id: u64) -> Result<Vec<GroupNode>> {
        self.get_all(&format!("groups/{group_id}/descendant_groups"), &[])
            .await
            .map_err(|e| not_found(e, || ExplorerError::GroupNotFound(group_id)))
    }

    pub async fn fetch_group_projects(&self, group_id: u64) -> Result<Vec<ProjectNode>> {
        self.get_all(&format!("groups/{group_id}/projects"), &[])
            .await
            .map_err(|e| not_found(e, || ExplorerError::GroupNotFound(group_id)))
    }

    pub async fn fetch_project(&self, project_id: u64) -> Result<ProjectNode> {
        self.get_json(&format!("projects/{project_id}"), &[])
            .await
            .map_err(|e| not_found(e, || ExplorerError::ProjectNotFound(project_id)))
    }
}

/// Maps a 404 response to a resource-specific error.
pub(super) fn not_found(
    error: ExplorerError,
    resource: impl FnOnce() -> ExplorerError,
) -> ExplorerError {
    match error {
        ExplorerError::Api { status: 404, .. } => resource(),
        other => other,
    }
}
