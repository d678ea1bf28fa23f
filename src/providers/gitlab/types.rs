use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::outcome::Skip;

/// Message carried by a pipeline result when the ref has never run.
pub const NO_PIPELINES_MESSAGE: &str = "no pipelines for this ref";

/// A group of the hierarchy together with its projects.
///
/// Rebuilt from scratch on every resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    /// Full hierarchical path (e.g., "platform/backend")
    pub full_path: String,
    pub projects: Vec<Project>,
    /// Every ref name seen across the group's projects, deduplicated by name
    pub all_refs: IndexSet<String>,
    /// Every branch name seen across the group's projects, deduplicated by name
    pub all_branches: IndexSet<String>,
}

/// A project with its merged ref catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    /// Branch names followed by `tag:`-prefixed tag names
    pub refs: Vec<String>,
    pub branches: Vec<String>,
    /// Tag whose commit is the most recent, if any
    pub latest_tag: Option<String>,
}

/// Flat output of a group tree resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupTree {
    pub groups: Vec<Group>,
    /// Groups or listings that could not be fetched and were left out
    pub skipped: Vec<Skip>,
    /// Roots whose group or descendant listing failed
    pub failed_roots: Vec<RootFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootFailure {
    pub group_id: u64,
    pub error: String,
}

/// Latest pipeline of a ref with its jobs and expanded bridges.
///
/// When the ref has no pipeline, `id` is `None`, `jobs` and `bridges` are
/// empty and `error` carries [`NO_PIPELINES_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub id: Option<u64>,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub jobs: Vec<PipelineJob>,
    pub bridges: Vec<BridgeInfo>,
    pub error: Option<String>,
}

impl PipelineInfo {
    pub fn missing(ref_: &str) -> Self {
        Self {
            id: None,
            ref_: ref_.to_string(),
            jobs: Vec::new(),
            bridges: Vec::new(),
            error: Some(NO_PIPELINES_MESSAGE.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.id.is_none()
    }

    /// Keeps only the jobs whose name contains `needle`, ignoring case, both
    /// in the pipeline and in every bridge's downstream pipeline.
    ///
    /// Bridges themselves are kept even when none of their jobs match. A
    /// blank needle keeps everything.
    pub fn retain_jobs_matching(&mut self, needle: &str) {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return;
        }
        let matches = |job: &PipelineJob| job.name.to_lowercase().contains(&needle);

        self.jobs.retain(matches);
        for bridge in &mut self.bridges {
            bridge.downstream_jobs.retain(matches);
        }
    }
}

/// A job, with its status mirrored verbatim from GitLab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineJob {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub stage: String,
}

/// A bridge job and the jobs of the downstream pipeline it triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeInfo {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub downstream_jobs: Vec<PipelineJob>,
}

/// A resolved pipeline plus its browsable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineLink {
    pub pipeline: PipelineInfo,
    pub url: Option<String>,
}

/// Pipeline resolution for one project of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPipeline {
    pub project_id: u64,
    pub project_name: String,
    pub pipeline: Option<PipelineInfo>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit_id: String,
    pub committed_at: Option<DateTime<Utc>>,
}

/// Pipelines of one ref across the projects of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPipelines {
    pub group_id: u64,
    pub full_path: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    pub projects: Vec<ProjectPipeline>,
}

impl GroupPipelines {
    /// Applies [`PipelineInfo::retain_jobs_matching`] to every resolved project.
    pub fn retain_jobs_matching(&mut self, needle: &str) {
        for pipeline in self.projects.iter_mut().filter_map(|p| p.pipeline.as_mut()) {
            pipeline.retain_jobs_matching(needle);
        }
    }
}
