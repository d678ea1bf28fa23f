use super::core::GitLabClient;
use super::models::{BridgeNode, JobNode, PipelineNode, PipelineQuery};
use crate::error::Result;

impl GitLabClient {
    /// Lists pipelines for a ref, ordered by id. Only the first page is
    /// requested; its size comes from the query.
    pub async fn fetch_pipelines(
        &self,
        project_id: u64,
        ref_: &str,
        query: PipelineQuery,
    ) -> Result<Vec<PipelineNode>> {
        let params = [
            ("ref", ref_.to_string()),
            ("order_by", "id".to_string()),
            ("sort", query.sort.as_str().to_string()),
            ("per_page", query.per_page.to_string()),
            ("page", "1".to_string()),
        ];
        self.get_json(&format!("projects/{project_id}/pipelines"), &params)
            .await
    }

    pub async fn fetch_pipeline_jobs(
        &self,
        project_id: u64,
        pipeline_id: u64,
    ) -> Result<Vec<JobNode>> {
        self.get_all(
            &format!("projects/{project_id}/pipelines/{pipeline_id}/jobs"),
            &[],
        )
        .await
    }

    pub async fn fetch_pipeline_bridges(
        &self,
        project_id: u64,
        pipeline_id: u64,
    ) -> Result<Vec<BridgeNode>> {
        self.get_all(
            &format!("projects/{project_id}/pipelines/{pipeline_id}/bridges"),
            &[],
        )
        .await
    }
}
