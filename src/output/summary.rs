use std::fmt::Write;

use comfy_table::Cell;

use crate::providers::gitlab::refs::{classify, RefKind};
use crate::providers::gitlab::types::{
    GroupPipelines, GroupTree, PipelineInfo, PipelineJob, PipelineLink, Tag,
};

use super::styling::{dim, failure, heading, ref_name, status, warning};
use super::tables::{actions_cell, create_table, header, status_cell};

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{emoji} {}", heading(title));
}

/// Renders every group with a per-project ref overview, followed by any
/// skipped listings and failed roots.
pub fn render_groups(tree: &GroupTree) -> String {
    let mut output = String::new();

    for group in &tree.groups {
        add_section_header(
            &mut output,
            "📁",
            &format!("{} (id {})", group.full_path, group.id),
        );

        if group.projects.is_empty() {
            let _ = writeln!(output, "  {}\n", dim("No projects"));
            continue;
        }

        let mut table = create_table();
        table.set_header(header(&["Project", "ID", "Branches", "Tags", "Latest tag"]));

        for project in &group.projects {
            let tags = project
                .refs
                .iter()
                .filter(|r| classify(r) == RefKind::Tag)
                .count();
            table.add_row(vec![
                Cell::new(&project.name),
                Cell::new(project.id),
                Cell::new(project.branches.len()),
                Cell::new(tags),
                Cell::new(project.latest_tag.as_deref().unwrap_or("-")),
            ]);
        }

        let _ = writeln!(output, "{table}");
        let _ = writeln!(
            output,
            "  {} {}  {} {}\n",
            dim("Distinct refs:"),
            warning(group.all_refs.len()),
            dim("Distinct branches:"),
            warning(group.all_branches.len()),
        );
    }

    for skip in &tree.skipped {
        let _ = writeln!(
            output,
            "{} {}: {}",
            warning("⚠ skipped"),
            skip.subject,
            dim(&skip.reason)
        );
    }

    for root in &tree.failed_roots {
        let _ = writeln!(
            output,
            "{} root group {}: {}",
            failure("✗ failed"),
            root.group_id,
            root.error
        );
    }

    output
}

fn jobs_table(jobs: &[PipelineJob]) -> String {
    let mut table = create_table();
    table.set_header(header(&["ID", "Stage", "Name", "Status", "Actions"]));
    for job in jobs {
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(&job.stage),
            Cell::new(&job.name),
            status_cell(&job.status),
            actions_cell(&job.status),
        ]);
    }
    table.to_string()
}

/// Renders a pipeline's jobs and the downstream jobs of each bridge.
pub fn render_pipeline(info: &PipelineInfo) -> String {
    let mut output = String::new();

    let Some(id) = info.id else {
        let message = info.error.as_deref().unwrap_or_default();
        let _ = writeln!(output, "{} {}", ref_name(&info.ref_), warning(message));
        return output;
    };

    add_section_header(
        &mut output,
        "🚀",
        &format!("Pipeline {id} on {}", info.ref_),
    );
    let _ = writeln!(output, "{}", jobs_table(&info.jobs));

    for bridge in &info.bridges {
        let _ = writeln!(
            output,
            "\n🌉 {} {} {}",
            heading(&bridge.name),
            dim(format!("(bridge {})", bridge.id)),
            status(&bridge.status)
        );
        if bridge.downstream_jobs.is_empty() {
            let _ = writeln!(output, "  {}", dim("No downstream jobs"));
        } else {
            let _ = writeln!(output, "{}", jobs_table(&bridge.downstream_jobs));
        }
    }

    output
}

pub fn render_pipeline_link(link: &PipelineLink) -> String {
    let mut output = render_pipeline(&link.pipeline);
    if let Some(url) = &link.url {
        let _ = writeln!(output, "\n  {} {}", dim("Open:"), url);
    }
    output
}

pub fn render_group_pipelines(results: &[GroupPipelines]) -> String {
    let mut output = String::new();

    if results.is_empty() {
        let _ = writeln!(output, "{}", dim("No project has this ref"));
        return output;
    }

    for group in results {
        add_section_header(
            &mut output,
            "📁",
            &format!("{} @ {}", group.full_path, group.ref_),
        );

        let mut table = create_table();
        table.set_header(header(&["Project", "Pipeline", "Jobs", "Failed", "Bridges", "Note"]));

        for entry in &group.projects {
            let mut row = vec![Cell::new(&entry.project_name)];
            match (&entry.pipeline, &entry.error) {
                (_, Some(error)) => {
                    row.extend([Cell::new("-"), Cell::new("-"), Cell::new("-"), Cell::new("-")]);
                    row.push(Cell::new(error).fg(comfy_table::Color::Red));
                }
                (Some(pipeline), None) => {
                    let failed = pipeline
                        .jobs
                        .iter()
                        .filter(|job| job.status == "failed")
                        .count();
                    row.push(Cell::new(
                        pipeline.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    ));
                    row.push(Cell::new(pipeline.jobs.len()));
                    row.push(Cell::new(failed));
                    row.push(Cell::new(pipeline.bridges.len()));
                    row.push(Cell::new(pipeline.error.as_deref().unwrap_or("")));
                }
                (None, None) => continue,
            }
            table.add_row(row);
        }

        let _ = writeln!(output, "{table}\n");
    }

    output
}

pub fn render_tags(tags: &[Tag]) -> String {
    let mut table = create_table();
    table.set_header(header(&["Tag", "Commit", "Committed at"]));
    for tag in tags {
        table.add_row(vec![
            Cell::new(&tag.name),
            Cell::new(tag.commit_id.chars().take(8).collect::<String>()),
            Cell::new(
                tag.committed_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::gitlab::outcome::Skip;
    use crate::providers::gitlab::types::{
        BridgeInfo, Group, Project, ProjectPipeline, RootFailure,
    };
    use indexmap::IndexSet;

    fn job(id: u64, name: &str, status: &str) -> PipelineJob {
        PipelineJob {
            id,
            name: name.to_string(),
            status: status.to_string(),
            stage: "test".to_string(),
        }
    }

    #[test]
    fn test_render_groups_lists_projects_and_skips() {
        let tree = GroupTree {
            groups: vec![Group {
                id: 5,
                name: "platform".to_string(),
                full_path: "platform".to_string(),
                projects: vec![Project {
                    id: 10,
                    name: "api".to_string(),
                    path_with_namespace: "platform/api".to_string(),
                    refs: vec!["main".to_string(), "tag:v1".to_string()],
                    branches: vec!["main".to_string()],
                    latest_tag: Some("v1".to_string()),
                }],
                all_refs: IndexSet::from(["main".to_string(), "tag:v1".to_string()]),
                all_branches: IndexSet::from(["main".to_string()]),
            }],
            skipped: vec![Skip {
                subject: "projects of group platform/broken".to_string(),
                reason: "403".to_string(),
            }],
            failed_roots: Vec::new(),
        };

        let rendered = render_groups(&tree);

        assert!(rendered.contains("platform (id 5)"));
        assert!(rendered.contains("api"));
        assert!(rendered.contains("v1"));
        assert!(rendered.contains("projects of group platform/broken"));
    }

    #[test]
    fn test_render_groups_reports_failed_roots() {
        let tree = GroupTree {
            groups: Vec::new(),
            skipped: Vec::new(),
            failed_roots: vec![RootFailure {
                group_id: 7,
                error: "Group 7 not found".to_string(),
            }],
        };

        let rendered = render_groups(&tree);

        assert!(rendered.contains("failed"));
        assert!(rendered.contains("root group 7: Group 7 not found"));
    }

    #[test]
    fn test_render_missing_pipeline_shows_message() {
        let rendered = render_pipeline(&PipelineInfo::missing("feature/x"));
        assert!(rendered.contains("no pipelines for this ref"));
    }

    #[test]
    fn test_render_pipeline_includes_bridge_jobs() {
        let info = PipelineInfo {
            id: Some(100),
            ref_: "main".to_string(),
            jobs: vec![job(1, "build", "success")],
            bridges: vec![BridgeInfo {
                id: 200,
                name: "trigger-deploy".to_string(),
                status: "success".to_string(),
                downstream_jobs: vec![job(3, "deploy", "manual")],
            }],
            error: None,
        };

        let rendered = render_pipeline(&info);

        assert!(rendered.contains("Pipeline 100 on main"));
        assert!(rendered.contains("trigger-deploy"));
        assert!(rendered.contains("deploy"));
        assert!(rendered.contains("play"));
    }

    #[test]
    fn test_render_group_pipelines_shows_errors() {
        let results = vec![GroupPipelines {
            group_id: 5,
            full_path: "platform".to_string(),
            ref_: "main".to_string(),
            projects: vec![ProjectPipeline {
                project_id: 10,
                project_name: "api".to_string(),
                pipeline: None,
                error: Some("boom".to_string()),
            }],
        }];

        let rendered = render_group_pipelines(&results);

        assert!(rendered.contains("platform @ main"));
        assert!(rendered.contains("boom"));
    }

    #[test]
    fn test_render_tags_shortens_commit() {
        let tags = vec![Tag {
            name: "v1".to_string(),
            commit_id: "0123456789abcdef".to_string(),
            committed_at: None,
        }];

        let rendered = render_tags(&tags);

        assert!(rendered.contains("01234567"));
        assert!(!rendered.contains("89abcdef"));
    }
}
