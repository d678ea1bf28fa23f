use log::info;

use crate::auth::Token;
use crate::error::Result;

use super::api::GitLabApi;
use super::client::{ClientOptions, GitLabClient};
use super::groups::{self, ResolveOptions};
use super::jobs;
use super::pipelines;
use super::tags;
use super::types::{GroupPipelines, GroupTree, PipelineInfo, PipelineLink, Tag};

/// Entry point for the explorer operations.
///
/// Wraps one authenticated client; build a new provider per operator
/// session since nothing is shared between them.
pub struct GitLabProvider<C = GitLabClient> {
    client: C,
    options: ResolveOptions,
}

impl GitLabProvider<GitLabClient> {
    /// Creates a provider talking to the GitLab instance at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitLab instance base URL (e.g., <https://gitlab.example.com>)
    /// * `token` - Personal access token
    /// * `client_options` - Timeout and retry policy for read requests
    /// * `options` - Root failure policy and fan-out bound
    ///
    /// # Errors
    ///
    /// Returns an error if the token is blank or the API URL cannot be built.
    pub fn new(
        base_url: &str,
        token: Token,
        client_options: ClientOptions,
        options: ResolveOptions,
    ) -> Result<Self> {
        let client = GitLabClient::new(base_url, token, client_options)?;
        Ok(Self::with_client(client, options))
    }
}

impl<C: GitLabApi> GitLabProvider<C> {
    pub fn with_client(client: C, options: ResolveOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves the group trees below `root_ids` with their projects and refs.
    pub async fn load_groups(&self, root_ids: &[u64]) -> Result<GroupTree> {
        info!("Loading group trees for roots {root_ids:?}");
        groups::resolve(&self.client, root_ids, self.options).await
    }

    pub async fn pipeline(&self, project_id: u64, ref_: &str) -> Result<PipelineInfo> {
        info!("Resolving latest pipeline of '{ref_}' in project {project_id}");
        pipelines::resolve_pipeline(&self.client, project_id, ref_, self.options.concurrency).await
    }

    pub async fn pipeline_link(&self, project_id: u64, ref_: &str) -> Result<PipelineLink> {
        pipelines::resolve_pipeline_url(&self.client, project_id, ref_, self.options.concurrency)
            .await
    }

    /// Resolves `ref_` for every project below `root_ids` that has it.
    ///
    /// Groups where no project has the ref are left out of the result.
    pub async fn group_pipelines(
        &self,
        root_ids: &[u64],
        ref_: &str,
    ) -> Result<Vec<GroupPipelines>> {
        let tree = self.load_groups(root_ids).await?;
        let mut results = Vec::new();

        for group in &tree.groups {
            let projects = pipelines::resolve_group_pipelines(
                &self.client,
                group,
                ref_,
                self.options.concurrency,
            )
            .await;

            if projects.is_empty() {
                continue;
            }

            results.push(GroupPipelines {
                group_id: group.id,
                full_path: group.full_path.clone(),
                ref_: ref_.to_string(),
                projects,
            });
        }

        info!(
            "Resolved '{ref_}' in {} of {} groups",
            results.len(),
            tree.groups.len()
        );

        Ok(results)
    }

    pub async fn job_action(&self, project_id: u64, job_id: u64, action: &str) -> Result<()> {
        jobs::execute_action(&self.client, project_id, job_id, action).await
    }

    pub async fn tags(&self, project_id: u64) -> Result<Vec<Tag>> {
        tags::list_tags(&self.client, project_id).await
    }

    pub async fn create_tag(&self, project_id: u64, name: &str, ref_: &str) -> Result<Tag> {
        tags::create_tag(&self.client, project_id, name, ref_).await
    }

    pub async fn delete_tag(&self, project_id: u64, name: &str) -> Result<()> {
        tags::delete_tag(&self.client, project_id, name).await
    }
}
