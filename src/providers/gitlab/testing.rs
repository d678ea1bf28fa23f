//! In-memory [`GitLabApi`] used by the unit tests.
//!
//! Every lookup that has no configured entry fails with a 500, which is how
//! tests inject remote failures. Pipeline listings are the exception: an
//! unknown ref has no pipelines, and failures are opted into per project.
//! Every call is recorded.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::api::GitLabApi;
use super::client::models::{
    BranchNode, BridgeNode, CommitNode, DownstreamPipeline, GroupNode, JobNode, PipelineNode,
    PipelineQuery, ProjectNode, TagNode, TagOrder,
};
use crate::error::{ExplorerError, Result};

#[derive(Default)]
pub struct StubGitLab {
    pub groups: HashMap<u64, GroupNode>,
    pub descendants: HashMap<u64, Vec<GroupNode>>,
    pub group_projects: HashMap<u64, Vec<ProjectNode>>,
    pub projects: HashMap<u64, ProjectNode>,
    pub branches: HashMap<u64, Vec<BranchNode>>,
    pub tags: HashMap<u64, Vec<TagNode>>,
    pub pipelines: HashMap<(u64, String), Vec<PipelineNode>>,
    pub jobs: HashMap<(u64, u64), Vec<JobNode>>,
    pub bridges: HashMap<(u64, u64), Vec<BridgeNode>>,
    pub failing_pipeline_listings: HashSet<u64>,
    pub reject_mutations: bool,
    calls: Mutex<Vec<String>>,
}

impl StubGitLab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, id: u64, path: &str, descendants: Vec<GroupNode>) -> Self {
        self.groups.insert(id, group(id, path));
        self.descendants.insert(id, descendants);
        self
    }

    pub fn with_projects(mut self, group_id: u64, projects: Vec<ProjectNode>) -> Self {
        for p in &projects {
            self.projects.insert(p.id, p.clone());
        }
        self.group_projects.insert(group_id, projects);
        self
    }

    pub fn with_refs(mut self, project_id: u64, branches: &[&str], tags: &[&str]) -> Self {
        self.branches.insert(
            project_id,
            branches
                .iter()
                .map(|name| BranchNode {
                    name: (*name).to_string(),
                })
                .collect(),
        );
        self.tags
            .insert(project_id, tags.iter().map(|name| tag(name, None)).collect());
        self
    }

    pub fn with_pipeline(mut self, project_id: u64, ref_: &str, pipeline_id: u64) -> Self {
        self.pipelines.insert(
            (project_id, ref_.to_string()),
            vec![PipelineNode {
                id: pipeline_id,
                ref_: ref_.to_string(),
                status: "running".to_string(),
            }],
        );
        self
    }

    pub fn with_jobs(mut self, project_id: u64, pipeline_id: u64, jobs: Vec<JobNode>) -> Self {
        self.jobs.insert((project_id, pipeline_id), jobs);
        self
    }

    pub fn with_bridges(
        mut self,
        project_id: u64,
        pipeline_id: u64,
        bridges: Vec<BridgeNode>,
    ) -> Self {
        self.bridges.insert((project_id, pipeline_id), bridges);
        self
    }

    pub fn failing_pipeline_listing(mut self, project_id: u64) -> Self {
        self.failing_pipeline_listings.insert(project_id);
        self
    }

    pub fn rejecting_mutations(mut self) -> Self {
        self.reject_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn group(id: u64, path: &str) -> GroupNode {
    GroupNode {
        id,
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        full_path: path.to_string(),
    }
}

pub fn project(id: u64, path: &str) -> ProjectNode {
    ProjectNode {
        id,
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path_with_namespace: path.to_string(),
    }
}

pub fn job(id: u64, name: &str, status: &str, stage: &str) -> JobNode {
    JobNode {
        id,
        name: name.to_string(),
        status: status.to_string(),
        stage: stage.to_string(),
    }
}

pub fn bridge(id: u64, name: &str, downstream: Option<(u64, u64)>) -> BridgeNode {
    BridgeNode {
        id,
        name: name.to_string(),
        status: "success".to_string(),
        downstream_pipeline: downstream.map(|(project_id, id)| DownstreamPipeline { id, project_id }),
    }
}

pub fn tag(name: &str, created_at: Option<&str>) -> TagNode {
    TagNode {
        name: name.to_string(),
        commit: Some(CommitNode {
            id: format!("sha-{name}"),
            created_at: created_at.map(|ts| ts.parse().unwrap()),
        }),
    }
}

fn missing(what: String) -> ExplorerError {
    ExplorerError::Api {
        status: 500,
        message: format!("stub has no {what}"),
    }
}

impl GitLabApi for StubGitLab {
    fn base_url(&self) -> &str {
        "https://gitlab.example.com/api/v4/"
    }

    async fn get_group(&self, group_id: u64) -> Result<GroupNode> {
        self.record(format!("get_group:{group_id}"));
        self.groups
            .get(&group_id)
            .cloned()
            .ok_or_else(|| missing(format!("group {group_id}")))
    }

    async fn list_descendant_groups(&self, group_id: u64) -> Result<Vec<GroupNode>> {
        self.record(format!("list_descendant_groups:{group_id}"));
        self.descendants
            .get(&group_id)
            .cloned()
            .ok_or_else(|| missing(format!("descendants of {group_id}")))
    }

    async fn list_group_projects(&self, group_id: u64) -> Result<Vec<ProjectNode>> {
        self.record(format!("list_group_projects:{group_id}"));
        self.group_projects
            .get(&group_id)
            .cloned()
            .ok_or_else(|| missing(format!("projects of {group_id}")))
    }

    async fn list_branches(&self, project_id: u64) -> Result<Vec<BranchNode>> {
        self.record(format!("list_branches:{project_id}"));
        self.branches
            .get(&project_id)
            .cloned()
            .ok_or_else(|| missing(format!("branches of {project_id}")))
    }

    async fn list_tags(&self, project_id: u64, _order: TagOrder) -> Result<Vec<TagNode>> {
        self.record(format!("list_tags:{project_id}"));
        self.tags
            .get(&project_id)
            .cloned()
            .ok_or_else(|| missing(format!("tags of {project_id}")))
    }

    async fn list_pipelines(
        &self,
        project_id: u64,
        ref_: &str,
        query: PipelineQuery,
    ) -> Result<Vec<PipelineNode>> {
        self.record(format!("list_pipelines:{project_id}:{ref_}"));
        if self.failing_pipeline_listings.contains(&project_id) {
            return Err(missing(format!("pipelines of {project_id}")));
        }
        let mut pipelines = self
            .pipelines
            .get(&(project_id, ref_.to_string()))
            .cloned()
            .unwrap_or_default();
        pipelines.truncate(query.per_page as usize);
        Ok(pipelines)
    }

    async fn list_pipeline_jobs(&self, project_id: u64, pipeline_id: u64) -> Result<Vec<JobNode>> {
        self.record(format!("list_pipeline_jobs:{project_id}:{pipeline_id}"));
        self.jobs
            .get(&(project_id, pipeline_id))
            .cloned()
            .ok_or_else(|| missing(format!("jobs of pipeline {pipeline_id}")))
    }

    async fn list_pipeline_bridges(
        &self,
        project_id: u64,
        pipeline_id: u64,
    ) -> Result<Vec<BridgeNode>> {
        self.record(format!("list_pipeline_bridges:{project_id}:{pipeline_id}"));
        self.bridges
            .get(&(project_id, pipeline_id))
            .cloned()
            .ok_or_else(|| missing(format!("bridges of pipeline {pipeline_id}")))
    }

    async fn get_project(&self, project_id: u64) -> Result<ProjectNode> {
        self.record(format!("get_project:{project_id}"));
        self.projects
            .get(&project_id)
            .cloned()
            .ok_or(ExplorerError::ProjectNotFound(project_id))
    }

    async fn create_tag(&self, project_id: u64, name: &str, ref_: &str) -> Result<TagNode> {
        self.record(format!("create_tag:{project_id}:{name}:{ref_}"));
        if self.reject_mutations {
            return Err(ExplorerError::Api {
                status: 400,
                message: "Tag already exists".to_string(),
            });
        }
        Ok(tag(name, None))
    }

    async fn delete_tag(&self, project_id: u64, name: &str) -> Result<()> {
        self.record(format!("delete_tag:{project_id}:{name}"));
        if self.reject_mutations {
            return Err(missing(format!("tag {name}")));
        }
        Ok(())
    }

    async fn play_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.record(format!("play_job:{project_id}:{job_id}"));
        self.job_action_result()
    }

    async fn retry_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.record(format!("retry_job:{project_id}:{job_id}"));
        self.job_action_result()
    }

    async fn cancel_job(&self, project_id: u64, job_id: u64) -> Result<()> {
        self.record(format!("cancel_job:{project_id}:{job_id}"));
        self.job_action_result()
    }
}

impl StubGitLab {
    fn job_action_result(&self) -> Result<()> {
        if self.reject_mutations {
            return Err(ExplorerError::Api {
                status: 403,
                message: "403 Forbidden".to_string(),
            });
        }
        Ok(())
    }
}
