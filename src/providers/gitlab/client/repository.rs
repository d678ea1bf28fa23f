use reqwest::Method;

use super::core::GitLabClient;
use super::groups::not_found;
use super::models::{BranchNode, TagNode, TagOrder};
use crate::error::{ExplorerError, Result};

impl GitLabClient {
    pub async fn fetch_branches(&self, project_id: u64) -> Result<Vec<BranchNode>> {
        self.get_all(&format!("projects/{project_id}/repository/branches"), &[])
            .await
            .map_err(|e| not_found(e, || ExplorerError::ProjectNotFound(project_id)))
    }

    pub async fn fetch_tags(&self, project_id: u64, order: TagOrder) -> Result<Vec<TagNode>> {
        let params = [
            ("order_by", order.order_by.as_str().to_string()),
            ("sort", order.sort.as_str().to_string()),
        ];
        self.get_all(&format!("projects/{project_id}/repository/tags"), &params)
            .await
            .map_err(|e| not_found(e, || ExplorerError::ProjectNotFound(project_id)))
    }

    pub async fn post_tag(&self, project_id: u64, name: &str, ref_: &str) -> Result<TagNode> {
        let params = [("tag_name", name.to_string()), ("ref", ref_.to_string())];
        let response = self
            .send_once(
                Method::POST,
                &format!("projects/{project_id}/repository/tags"),
                &params,
            )
            .await?;
        Ok(response.json().await?)
    }

    pub async fn remove_tag(&self, project_id: u64, name: &str) -> Result<()> {
        self.send_once(
            Method::DELETE,
            &format!(
                "projects/{project_id}/repository/tags/{}",
                urlencoding::encode(name)
            ),
            &[],
        )
        .await?;
        Ok(())
    }
}
