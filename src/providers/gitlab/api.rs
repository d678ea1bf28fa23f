//! Capability contract between the explorer and the remote platform.
//!
//! Every core operation is generic over [`GitLabApi`], so the traversal logic
//! never depends on the transport. [`GitLabClient`](super::client::GitLabClient)
//! is the REST implementation; tests plug in in-memory stubs.

use super::client::models::{
    BranchNode, BridgeNode, GroupNode, JobNode, PipelineNode, PipelineQuery, ProjectNode,
    TagNode, TagOrder,
};
use crate::error::Result;

#[allow(async_fn_in_trait)]
pub trait GitLabApi {
    /// API base address the client was configured with
    /// (e.g. `https://gitlab.example.com/api/v4/`).
    fn base_url(&self) -> &str;

    async fn get_group(&self, group_id: u64) -> Result<GroupNode>;

    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<GroupNode>>;

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<ProjectNode>>;

    async fn list_branches(&self, project_id: u64) -> Result<Vec<BranchNode>>;

    async fn list_tags(&self, project_id: u64, order: TagOrder) -> Result<Vec<TagNode>>;

    async fn list_pipelines(
        &self,
        project_id: u64,
        ref_: &str,
        query: PipelineQuery,
    ) -> Result<Vec<PipelineNode>>;

    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<JobNode>>;

    async fn list_pipeline_bridges(
        &self,
        project_id: u64,
        pipeline_id: u64,
    ) -> Result<Vec<BridgeNode>>;

    async fn get_project(&self, project_id: u64) -> Result<ProjectNode>;

    async fn create_tag(&self, project_id: u64, name: &str, ref_: &str) -> Result<TagNode>;

    async fn delete_tag(&self, project_id: u64, name: &str) -> Result<()>;

    async fn play_job(&self, project_id: u64, job_id: u64) -> Result<()>;

    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()>;

    async fn cancel_job(&self, project_id: u64, job_id: u64) -> Result<()>;
}
