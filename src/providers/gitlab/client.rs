mod core;
mod groups;
mod jobs;
pub mod models;
mod pipelines;
mod repository;

pub use self::core::{ClientOptions, GitLabClient};

use self::models::{
    BranchNode, BridgeNode, GroupNode, JobNode, PipelineNode, PipelineQuery, ProjectNode,
    TagNode, TagOrder,
};
use super::api::GitLabApi;
use crate::error::Result;

impl GitLabApi for GitLabClient {
    fn base_url(&self) -> &str {
        self.api_url().as_str()
    }

    async fn get_group(&self, group_id: u64) -> Result<GroupNode> {
        self.fetch_group(group_id).await
    }

    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<GroupNode>> {
        self.fetch_descendant_groups(group_id).await
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<ProjectNode>> {
        self.fetch_group_projects(group_id).await
    }

    async fn list_branches(&self, project_id: u64) -> Result<Vec<BranchNode>> {
        self.fetch_branches(project_id).await
    }

    async fn list_tags(&self, project_id: u64, order: TagOrder) -> Result<Vec<TagNode>> {
        self.fetch_tags(project_id, order).await
    }

    async fn list_pipelines(
        &self,
        project_id: u64,
        ref_: &str,
        query: PipelineQuery,
    ) -> Result<Vec<PipelineNode>> {
        self.fetch_pipelines(project_id, ref_, query).await
    }

    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<JobNode>> {
        self.fetch_pipeline_jobs(project_id, pipeline_id).await
    }

    async fn list_pipeline_bridges(
        &self,
        project_id: u64,
        pipeline_id: u64,
    ) -> Result<Vec<BridgeNode>> {
        self.fetch_pipeline_bridges(project_id, pipeline_id).await
    }

    async fn get_project(&self, project_id: u64) -> Result<ProjectNode> {
        self.fetch_project(project_id).await
    }

    async fn create_tag(&self, project_id: u64, name: &str, ref_: &str) -> Result<TagNode> {
        self.post_tag(project_id, name, ref_).await
    }

    async fn delete_tag(&self, project_id: u64, name: &str) -> Result<()> {
        self.remove_tag(project_id, name).await
    }

    async fn play_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.post_job_action(project_id, job_id, "play").await
    }

    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.post_job_action(project_id, job_id, "retry").await
    }

    async fn cancel_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.post_job_action(project_id, job_id, "cancel").await
    }
}
