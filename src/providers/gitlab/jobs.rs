use std::fmt;
use std::str::FromStr;

use log::info;
use serde::Serialize;

use super::api::GitLabApi;
use crate::error::{ExplorerError, Result};

/// Control action an operator can issue against a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    Play,
    Retry,
    Cancel,
}

impl JobAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Retry => "retry",
            Self::Cancel => "cancel",
        }
    }

    /// Actions that make sense for a job in the given status.
    ///
    /// Manual jobs can be played, finished jobs retried, and active jobs
    /// canceled. Any other status offers nothing.
    pub fn available_for(status: &str) -> Vec<JobAction> {
        match status {
            "manual" => vec![Self::Play],
            "failed" | "success" | "canceled" => vec![Self::Retry],
            "running" | "pending" => vec![Self::Cancel],
            _ => Vec::new(),
        }
    }
}

impl FromStr for JobAction {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "play" => Ok(Self::Play),
            "retry" => Ok(Self::Retry),
            "cancel" => Ok(Self::Cancel),
            other => Err(ExplorerError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs `action` against a job with a single remote call.
///
/// # Errors
///
/// Returns [`ExplorerError::UnknownAction`] without contacting GitLab when
/// `action` is not `play`, `retry` or `cancel`; otherwise returns the remote
/// error unchanged.
pub async fn execute_action<C: GitLabApi>(
    client: &C,
    project_id: u64,
    job_id: u64,
    action: &str,
) -> Result<()> {
    let action: JobAction = action.parse()?;

    info!("Job {job_id} in project {project_id}: {action}");

    match action {
        JobAction::Play => client.play_job(project_id, job_id).await,
        JobAction::Retry => client.retry_job(project_id, job_id).await,
        JobAction::Cancel => client.cancel_job(project_id, job_id).await,
    }
}
