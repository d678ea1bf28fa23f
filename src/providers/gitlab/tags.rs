use log::info;

use super::api::GitLabApi;
use super::client::models::{SortDirection, TagNode, TagOrder, TagOrderBy};
use super::types::Tag;
use crate::error::{ExplorerError, Result};

/// Lists the tags of a project, most recently updated first.
pub async fn list_tags<C: GitLabApi>(client: &C, project_id: u64) -> Result<Vec<Tag>> {
    let order = TagOrder {
        order_by: TagOrderBy::Updated,
        sort: SortDirection::Desc,
    };
    let tags = client.list_tags(project_id, order).await?;
    Ok(tags.into_iter().map(Tag::from).collect())
}

/// Creates `name` pointing at `ref_`. GitLab decides whether the ref exists.
///
/// # Errors
///
/// Returns [`ExplorerError::MissingParameter`] before any remote call when
/// either argument is blank.
pub async fn create_tag<C: GitLabApi>(
    client: &C,
    project_id: u64,
    name: &str,
    ref_: &str,
) -> Result<Tag> {
    let name = name.trim();
    let ref_ = ref_.trim();
    if name.is_empty() {
        return Err(ExplorerError::MissingParameter("tag name"));
    }
    if ref_.is_empty() {
        return Err(ExplorerError::MissingParameter("ref"));
    }

    let tag = client.create_tag(project_id, name, ref_).await?;
    info!("Created tag {name} at {ref_} in project {project_id}");
    Ok(Tag::from(tag))
}

/// # Errors
///
/// Returns [`ExplorerError::MissingParameter`] before any remote call when
/// the name is blank.
pub async fn delete_tag<C: GitLabApi>(client: &C, project_id: u64, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ExplorerError::MissingParameter("tag name"));
    }

    client.delete_tag(project_id, name).await?;
    info!("Deleted tag {name} in project {project_id}");
    Ok(())
}

impl From<TagNode> for Tag {
    fn from(node: TagNode) -> Self {
        let (commit_id, committed_at) = node
            .commit
            .map(|c| (c.id, c.created_at))
            .unwrap_or_default();
        Self {
            name: node.name,
            commit_id,
            committed_at,
        }
    }
}
