use futures::stream::{self, StreamExt};
use log::{debug, info};

use super::api::GitLabApi;
use super::client::models::{BridgeNode, JobNode, PipelineQuery};
use super::links::pipeline_url;
use super::outcome::Outcome;
use super::refs::{strip_tag_marker, tag_ref};
use super::types::{BridgeInfo, Group, PipelineInfo, PipelineJob, PipelineLink, ProjectPipeline};
use crate::error::{ExplorerError, Result};

/// Resolves the most recent pipeline of a ref, its jobs, and the jobs of the
/// downstream pipelines its bridges triggered.
///
/// A `tag:` marker on `ref_` is stripped before querying. A ref without any
/// pipeline yields [`PipelineInfo::missing`], not an error.
///
/// Bridges are expanded one level only: downstream bridges are not followed.
/// Downstream job listings run at most `concurrency` at a time and a failed
/// listing leaves that bridge's jobs empty.
///
/// # Errors
///
/// Returns an error if the ref is empty, or if the pipeline listing, its job
/// listing or its bridge listing fails.
pub async fn resolve_pipeline<C: GitLabApi>(
    client: &C,
    project_id: u64,
    ref_: &str,
    concurrency: usize,
) -> Result<PipelineInfo> {
    let ref_ = strip_tag_marker(ref_.trim());
    if ref_.is_empty() {
        return Err(ExplorerError::MissingParameter("ref"));
    }

    let pipelines = client
        .list_pipelines(project_id, ref_, PipelineQuery::latest())
        .await?;

    let Some(pipeline) = pipelines.into_iter().next() else {
        info!("No pipelines for ref '{ref_}' in project {project_id}");
        return Ok(PipelineInfo::missing(ref_));
    };

    debug!("Latest pipeline for '{ref_}' is {}", pipeline.id);

    let jobs = client.list_pipeline_jobs(project_id, pipeline.id).await?;
    let bridges = client.list_pipeline_bridges(project_id, pipeline.id).await?;

    let bridges: Vec<BridgeInfo> = stream::iter(bridges)
        .map(|bridge| expand_bridge(client, bridge))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    Ok(PipelineInfo {
        id: Some(pipeline.id),
        ref_: ref_.to_string(),
        jobs: jobs.into_iter().map(PipelineJob::from).collect(),
        bridges,
        error: None,
    })
}

async fn expand_bridge<C: GitLabApi>(client: &C, bridge: BridgeNode) -> BridgeInfo {
    let downstream_jobs = match &bridge.downstream_pipeline {
        Some(downstream) => match Outcome::from_result(
            client
                .list_pipeline_jobs(downstream.project_id, downstream.id)
                .await,
            format!("downstream jobs of bridge {}", bridge.name),
        ) {
            Outcome::Fetched(jobs) => jobs,
            Outcome::Skipped(_) => Vec::new(),
        },
        None => Vec::new(),
    };

    BridgeInfo {
        id: bridge.id,
        name: bridge.name,
        status: bridge.status,
        downstream_jobs: downstream_jobs.into_iter().map(PipelineJob::from).collect(),
    }
}

/// Resolves a pipeline and composes its web address from the client's base
/// address and the project's path.
///
/// # Errors
///
/// Same as [`resolve_pipeline`], plus a failure to fetch the project.
pub async fn resolve_pipeline_url<C: GitLabApi>(
    client: &C,
    project_id: u64,
    ref_: &str,
    concurrency: usize,
) -> Result<PipelineLink> {
    let pipeline = resolve_pipeline(client, project_id, ref_, concurrency).await?;

    let Some(pipeline_id) = pipeline.id else {
        return Ok(PipelineLink {
            pipeline,
            url: None,
        });
    };

    let project = client.get_project(project_id).await?;
    let url = pipeline_url(client.base_url(), &project.path_with_namespace, pipeline_id);

    Ok(PipelineLink {
        pipeline,
        url: Some(url),
    })
}

/// Resolves `ref_` for every project of a group that has it.
///
/// `ref_` may be in catalog form (`tag:v1`) or a bare name, in which case a
/// branch or a tag of that name both count. The group's ref set is checked
/// first so a group lacking the ref costs no remote call. A failure for one
/// project is stored in its entry.
pub async fn resolve_group_pipelines<C: GitLabApi>(
    client: &C,
    group: &Group,
    ref_: &str,
    concurrency: usize,
) -> Vec<ProjectPipeline> {
    let tagged = tag_ref(ref_);
    let has_ref = |r: &String| *r == ref_ || *r == tagged;

    if !group.all_refs.iter().any(has_ref) {
        debug!("Group {} has no ref '{ref_}'", group.full_path);
        return Vec::new();
    }

    let candidates = group
        .projects
        .iter()
        .filter(|project| project.refs.iter().any(has_ref));

    stream::iter(candidates)
        .map(|project| async move {
            match resolve_pipeline(client, project.id, ref_, concurrency).await {
                Ok(pipeline) => ProjectPipeline {
                    project_id: project.id,
                    project_name: project.name.clone(),
                    pipeline: Some(pipeline),
                    error: None,
                },
                Err(e) => ProjectPipeline {
                    project_id: project.id,
                    project_name: project.name.clone(),
                    pipeline: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

impl From<JobNode> for PipelineJob {
    fn from(job: JobNode) -> Self {
        Self {
            id: job.id,
            name: job.name,
            status: job.status,
            stage: job.stage,
        }
    }
}
