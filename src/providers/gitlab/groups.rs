use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use log::{info, warn};

use super::api::GitLabApi;
use super::client::models::{GroupNode, ProjectNode};
use super::outcome::{Outcome, Skip};
use super::refs::build_refs;
use super::types::{Group, GroupTree, Project, RootFailure};
use crate::error::{ExplorerError, Result};

/// What to do when a root group, or its descendant listing, cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootFailurePolicy {
    /// Abort on the first failing root and discard everything gathered so far.
    AllOrNothing,
    /// Record the failing root and keep the groups of the others.
    #[default]
    Partial,
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    pub policy: RootFailurePolicy,
    /// Upper bound on concurrent per-project ref catalog fetches
    pub concurrency: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            policy: RootFailurePolicy::default(),
            concurrency: 4,
        }
    }
}

/// Resolves every root into a flat list of groups.
///
/// Groups reachable from several roots appear once per root.
///
/// # Errors
///
/// Returns an error if no root id is given, if any root fails under
/// [`RootFailurePolicy::AllOrNothing`], or if every root fails under
/// [`RootFailurePolicy::Partial`].
pub async fn resolve<C: GitLabApi>(
    client: &C,
    root_ids: &[u64],
    options: ResolveOptions,
) -> Result<GroupTree> {
    if root_ids.is_empty() {
        return Err(ExplorerError::MissingParameter("root group id"));
    }

    let mut tree = GroupTree::default();
    let mut first_error = None;

    for &root_id in root_ids {
        match resolve_root(client, root_id, options.concurrency).await {
            Ok(resolved) => {
                tree.groups.extend(resolved.groups);
                tree.skipped.extend(resolved.skipped);
            }
            Err(e) if options.policy == RootFailurePolicy::AllOrNothing => return Err(e),
            Err(e) => {
                warn!("Failed to resolve root group {root_id}: {e}");
                tree.failed_roots.push(RootFailure {
                    group_id: root_id,
                    error: e.to_string(),
                });
                first_error.get_or_insert(e);
            }
        }
    }

    if tree.failed_roots.len() == root_ids.len() {
        if let Some(e) = first_error {
            return Err(e);
        }
    }

    info!(
        "Resolved {} groups from {} roots ({} skipped)",
        tree.groups.len(),
        root_ids.len(),
        tree.skipped.len()
    );

    Ok(tree)
}

/// Resolves one root: the root group followed by all of its descendants.
///
/// A group whose projects cannot be listed is left out and recorded in
/// `skipped`; failing to fetch the root or its descendants is an error.
pub async fn resolve_root<C: GitLabApi>(
    client: &C,
    root_id: u64,
    concurrency: usize,
) -> Result<GroupTree> {
    let root = client.get_group(root_id).await?;
    let descendants = client.list_descendant_groups(root_id).await?;

    info!(
        "Group {} has {} descendant groups",
        root.full_path,
        descendants.len()
    );

    let mut tree = GroupTree::default();

    for node in std::iter::once(root).chain(descendants) {
        let projects = match Outcome::from_result(
            client.list_group_projects(node.id).await,
            format!("projects of group {}", node.full_path),
        ) {
            Outcome::Fetched(projects) => projects,
            Outcome::Skipped(skip) => {
                tree.skipped.push(skip);
                continue;
            }
        };

        let group = build_group(client, node, projects, concurrency, &mut tree.skipped).await;
        tree.groups.push(group);
    }

    Ok(tree)
}

async fn build_group<C: GitLabApi>(
    client: &C,
    node: GroupNode,
    projects: Vec<ProjectNode>,
    concurrency: usize,
    skipped: &mut Vec<Skip>,
) -> Group {
    let catalogs: Vec<_> = stream::iter(projects)
        .map(|project| async move {
            let catalog = build_refs(client, project.id).await;
            (project, catalog)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut all_refs = IndexSet::new();
    let mut all_branches = IndexSet::new();
    let mut group_projects = Vec::with_capacity(catalogs.len());

    for (project, catalog) in catalogs {
        all_refs.extend(catalog.refs.iter().cloned());
        all_branches.extend(catalog.branches.iter().cloned());
        skipped.extend(catalog.skipped);

        group_projects.push(Project {
            id: project.id,
            name: project.name,
            path_with_namespace: project.path_with_namespace,
            refs: catalog.refs,
            branches: catalog.branches,
            latest_tag: catalog.latest_tag,
        });
    }

    Group {
        id: node.id,
        name: node.name,
        full_path: node.full_path,
        projects: group_projects,
        all_refs,
        all_branches,
    }
}
