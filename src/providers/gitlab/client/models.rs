//! Wire shapes of the GitLab REST v4 resources the explorer reads.
//!
//! Only the fields the explorer consumes are declared; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupNode {
    pub id: u64,
    pub name: String,
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectNode {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BranchNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagNode {
    pub name: String,
    pub commit: Option<CommitNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommitNode {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineNode {
    pub id: u64,
    #[serde(rename = "ref")]
    pub ref_: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobNode {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub stage: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeNode {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub downstream_pipeline: Option<DownstreamPipeline>,
}

/// Pipeline spawned by a bridge job, possibly in another project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownstreamPipeline {
    pub id: u64,
    pub project_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagOrderBy {
    Name,
    #[default]
    Updated,
    Version,
}

impl TagOrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Updated => "updated",
            Self::Version => "version",
        }
    }
}

/// Sort options for tag listings. Defaults to the server's own default
/// (most recently updated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TagOrder {
    pub order_by: TagOrderBy,
    pub sort: SortDirection,
}

/// Call-level options for a pipeline listing. The listing is never
/// paginated beyond `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineQuery {
    pub sort: SortDirection,
    pub per_page: u32,
}

impl PipelineQuery {
    /// The single most recent pipeline, ordered by id.
    pub fn latest() -> Self {
        Self {
            sort: SortDirection::Desc,
            per_page: 1,
        }
    }
}
