use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use super::api::GitLabApi;
use super::client::models::{TagNode, TagOrder};
use super::outcome::{Outcome, Skip};

/// Marker distinguishing tag refs from branch refs in a single namespace.
pub const TAG_MARKER: &str = "tag:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
}

pub fn classify(ref_: &str) -> RefKind {
    if ref_.starts_with(TAG_MARKER) {
        RefKind::Tag
    } else {
        RefKind::Branch
    }
}

/// Removes the catalog's tag marker, yielding the ref name GitLab knows.
pub fn strip_tag_marker(ref_: &str) -> &str {
    ref_.strip_prefix(TAG_MARKER).unwrap_or(ref_)
}

pub fn tag_ref(name: &str) -> String {
    format!("{TAG_MARKER}{name}")
}

/// Branches and tags of one project, merged into a single ref list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefCatalog {
    /// Branch names, then `tag:`-prefixed tag names, in remote order
    pub refs: Vec<String>,
    pub branches: Vec<String>,
    pub latest_tag: Option<String>,
    pub skipped: Vec<Skip>,
}

/// Builds the ref catalog of a project.
///
/// Branch and tag listings are best-effort: a failed listing contributes
/// nothing and is recorded in `skipped`.
pub async fn build_refs<C: GitLabApi>(client: &C, project_id: u64) -> RefCatalog {
    let mut catalog = RefCatalog::default();

    let branches = Outcome::from_result(
        client.list_branches(project_id).await,
        format!("branches of project {project_id}"),
    )
    .or_record(Vec::new(), &mut catalog.skipped);

    for branch in branches {
        catalog.refs.push(branch.name.clone());
        catalog.branches.push(branch.name);
    }

    let tags = Outcome::from_result(
        client.list_tags(project_id, TagOrder::default()).await,
        format!("tags of project {project_id}"),
    )
    .or_record(Vec::new(), &mut catalog.skipped);

    catalog.latest_tag = latest_tag(&tags);
    catalog
        .refs
        .extend(tags.iter().map(|tag| tag_ref(&tag.name)));

    debug!(
        "Project {project_id}: {} branches, {} refs",
        catalog.branches.len(),
        catalog.refs.len()
    );

    catalog
}

/// Picks the tag pointing at the most recently created commit. Tags without
/// a commit timestamp only win when no tag has one.
fn latest_tag(tags: &[TagNode]) -> Option<String> {
    let mut best: Option<(&TagNode, Option<DateTime<Utc>>)> = None;

    for tag in tags {
        let created_at = tag.commit.as_ref().and_then(|c| c.created_at);
        let newer = match &best {
            None => true,
            Some((_, best_at)) => created_at > *best_at,
        };
        if newer {
            best = Some((tag, created_at));
        }
    }

    best.map(|(tag, _)| tag.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::gitlab::testing::{tag, StubGitLab};

    #[test]
    fn test_classify_and_strip() {
        assert_eq!(classify("main"), RefKind::Branch);
        assert_eq!(classify("tag:v1"), RefKind::Tag);
        assert_eq!(strip_tag_marker("tag:v1"), "v1");
        assert_eq!(strip_tag_marker("main"), "main");
        // only the leading marker is removed
        assert_eq!(strip_tag_marker("tag:tag:v1"), "tag:v1");
    }

    #[tokio::test]
    async fn test_catalog_has_every_branch_and_prefixed_tag() {
        let stub = StubGitLab::new().with_refs(10, &["main", "develop", "feature/x"], &["v1", "v2"]);

        let catalog = build_refs(&stub, 10).await;

        assert_eq!(
            catalog.refs,
            vec!["main", "develop", "feature/x", "tag:v1", "tag:v2"]
        );
        assert_eq!(catalog.branches, vec!["main", "develop", "feature/x"]);
        assert!(catalog.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_name_shared_by_branch_and_tag_appears_twice() {
        let stub = StubGitLab::new().with_refs(10, &["release"], &["release"]);

        let catalog = build_refs(&stub, 10).await;

        assert_eq!(catalog.refs, vec!["release", "tag:release"]);
        assert_eq!(catalog.branches, vec!["release"]);
    }

    #[tokio::test]
    async fn test_failed_branch_listing_keeps_tags() {
        let mut stub = StubGitLab::new();
        stub.tags.insert(10, vec![tag("v1", None)]);

        let catalog = build_refs(&stub, 10).await;

        assert_eq!(catalog.refs, vec!["tag:v1"]);
        assert!(catalog.branches.is_empty());
        assert_eq!(catalog.skipped.len(), 1);
        assert_eq!(catalog.skipped[0].subject, "branches of project 10");
    }

    #[tokio::test]
    async fn test_failed_listings_yield_empty_catalog() {
        let stub = StubGitLab::new();

        let catalog = build_refs(&stub, 10).await;

        assert!(catalog.refs.is_empty());
        assert!(catalog.latest_tag.is_none());
        assert_eq!(catalog.skipped.len(), 2);
    }

    #[test]
    fn test_latest_tag_uses_commit_time() {
        let tags = vec![
            tag("v1", Some("2024-01-01T00:00:00Z")),
            tag("v3", Some("2024-06-01T00:00:00Z")),
            tag("v2", Some("2024-03-01T00:00:00Z")),
            tag("untimed", None),
        ];

        assert_eq!(latest_tag(&tags), Some("v3".to_string()));
    }

    #[test]
    fn test_latest_tag_without_timestamps_keeps_first() {
        let tags = vec![tag("a", None), tag("b", None)];
        assert_eq!(latest_tag(&tags), Some("a".to_string()));
        assert_eq!(latest_tag(&[]), None);
    }
}
