use reqwest::Method;

use super::core::GitLabClient;
use crate::error::Result;

impl GitLabClient {
    /// Triggers a job control endpoint (`play`, `retry` or `cancel`).
    /// Never retried.
    pub async fn post_job_action(&self, project_id: u64, job_id: u64, verb: &str) -> Result<()> {
        self.send_once(
            Method::POST,
            &format!("projects/{project_id}/jobs/{job_id}/{verb}"),
            &[],
        )
        .await?;
        Ok(())
    }
}
