use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::output::{self, Spinner};
use crate::providers::GitLabProvider;

#[derive(Parser)]
#[command(name = "glexplorer")]
#[command(author, version, about = "GitLab group, ref and pipeline explorer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitLab personal access token
    #[arg(short, long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitLab instance base URL
    #[arg(short, long, global = true, env = "GITLAB_URL")]
    url: Option<String>,

    /// Configuration file (defaults to ./glexplorer.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show groups below the given roots with their projects and refs
    Groups {
        #[arg(short, long = "group")]
        groups: Vec<u64>,

        /// Abort when any root group cannot be fetched
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Show the latest pipeline of a ref, including bridged pipelines
    Pipeline {
        #[arg(short = 'P', long)]
        project: u64,

        /// Branch name, or tag name with or without the `tag:` prefix
        #[arg(short, long = "ref")]
        ref_: String,

        /// Also resolve the pipeline's web URL
        #[arg(long, default_value_t = false)]
        link: bool,

        /// Only show jobs whose name contains this text (case-insensitive)
        #[arg(long)]
        job_filter: Option<String>,
    },
    /// Show the latest pipeline of a ref for every project below the roots
    GroupPipelines {
        #[arg(short, long = "group")]
        groups: Vec<u64>,

        /// Branch name, or tag name with or without the `tag:` prefix
        #[arg(short, long = "ref")]
        ref_: String,

        /// Only show jobs whose name contains this text (case-insensitive)
        #[arg(long)]
        job_filter: Option<String>,
    },
    /// Play, retry or cancel a job
    Job {
        #[arg(short = 'P', long)]
        project: u64,

        #[arg(short, long)]
        job: u64,

        /// One of: play, retry, cancel
        #[arg(short, long)]
        action: String,
    },
    /// List, create or delete tags
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    List {
        #[arg(short = 'P', long)]
        project: u64,
    },
    Create {
        #[arg(short = 'P', long)]
        project: u64,

        #[arg(short, long)]
        name: String,

        /// Branch, tag or commit the new tag points at
        #[arg(short, long = "ref")]
        ref_: String,
    },
    Delete {
        #[arg(short = 'P', long)]
        project: u64,

        #[arg(short, long)]
        name: String,
    },
}

impl Cli {
    fn provider(&self, config: &Config, strict: bool) -> Result<GitLabProvider> {
        let token = self
            .token
            .clone()
            .or_else(|| config.gitlab.token.clone())
            .context("No GitLab token given (use --token, GITLAB_TOKEN or the config file)")?;
        let url = self
            .url
            .clone()
            .unwrap_or_else(|| config.gitlab.base_url.clone());

        let mut options = config.gitlab.resolve_options();
        if strict {
            options.policy = crate::providers::gitlab::RootFailurePolicy::AllOrNothing;
        }

        let provider = GitLabProvider::new(
            &url,
            Token::from(token),
            config.gitlab.client_options(),
            options,
        )?;
        Ok(provider)
    }

    fn root_groups(groups: &[u64], config: &Config) -> Result<Vec<u64>> {
        let roots = if groups.is_empty() {
            config.gitlab.root_groups.clone()
        } else {
            groups.to_vec()
        };
        if roots.is_empty() {
            bail!("No root group given (use --group or root-groups in the config file)");
        }
        Ok(roots)
    }

    fn render<T: serde::Serialize>(
        &self,
        config: &Config,
        value: &T,
        table: impl FnOnce(&T) -> String,
    ) -> Result<()> {
        let format = self.format.unwrap_or(config.output.format);
        let rendered = match format {
            OutputFormat::Json => output::to_json(value, self.pretty || config.output.pretty)?,
            OutputFormat::Table => table(value),
        };
        output::emit(&rendered, self.output.as_deref())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Groups { groups, strict } => {
                let roots = Self::root_groups(groups, &config)?;
                let provider = self.provider(&config, *strict)?;

                let spinner = Spinner::start("Walking group tree");
                let tree = match provider.load_groups(&roots).await {
                    Ok(tree) => {
                        spinner.succeed(&format!("Loaded {} groups", tree.groups.len()));
                        tree
                    }
                    Err(e) => {
                        spinner.fail("Group tree failed");
                        return Err(e).context("Failed to load groups");
                    }
                };

                self.render(&config, &tree, output::render_groups)
            }
            Commands::Pipeline {
                project,
                ref_,
                link,
                job_filter,
            } => {
                let provider = self.provider(&config, false)?;
                let filter = job_filter.as_deref().unwrap_or_default();
                if *link {
                    let mut link = provider
                        .pipeline_link(*project, ref_)
                        .await
                        .context("Failed to load pipeline")?;
                    link.pipeline.retain_jobs_matching(filter);
                    self.render(&config, &link, output::render_pipeline_link)
                } else {
                    let mut pipeline = provider
                        .pipeline(*project, ref_)
                        .await
                        .context("Failed to load pipeline")?;
                    pipeline.retain_jobs_matching(filter);
                    self.render(&config, &pipeline, output::render_pipeline)
                }
            }
            Commands::GroupPipelines {
                groups,
                ref_,
                job_filter,
            } => {
                let roots = Self::root_groups(groups, &config)?;
                let provider = self.provider(&config, false)?;

                let spinner = Spinner::start("Resolving pipelines across groups");
                let mut results = match provider.group_pipelines(&roots, ref_).await {
                    Ok(results) => {
                        spinner.succeed("Resolved pipelines");
                        results
                    }
                    Err(e) => {
                        spinner.fail("Pipeline resolution failed");
                        return Err(e).context("Failed to resolve group pipelines");
                    }
                };
                if let Some(filter) = job_filter {
                    for group in &mut results {
                        group.retain_jobs_matching(filter);
                    }
                }

                self.render(&config, &results, |r| output::render_group_pipelines(r))
            }
            Commands::Job {
                project,
                job,
                action,
            } => {
                let provider = self.provider(&config, false)?;
                provider
                    .job_action(*project, *job, action)
                    .await
                    .with_context(|| format!("Failed to {action} job {job}"))?;
                info!("Job {job}: {action} succeeded");
                self.render(
                    &config,
                    &serde_json::json!({"status": "success"}),
                    |_| format!("Job {job}: {action} succeeded"),
                )
            }
            Commands::Tags { command } => self.execute_tags(&config, command).await,
        }
    }

    async fn execute_tags(&self, config: &Config, command: &TagCommands) -> Result<()> {
        let provider = self.provider(config, false)?;

        match command {
            TagCommands::List { project } => {
                let tags = provider
                    .tags(*project)
                    .await
                    .context("Failed to list tags")?;
                self.render(config, &tags, |t| output::render_tags(t))
            }
            TagCommands::Create {
                project,
                name,
                ref_,
            } => {
                let tag = provider
                    .create_tag(*project, name, ref_)
                    .await
                    .context("Failed to create tag")?;
                self.render(config, &vec![tag], |t| output::render_tags(t))
            }
            TagCommands::Delete { project, name } => {
                provider
                    .delete_tag(*project, name)
                    .await
                    .context("Failed to delete tag")?;
                self.render(
                    config,
                    &serde_json::json!({"status": "success"}),
                    |_| format!("Deleted tag {name}"),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_groups_with_several_roots() {
        let cli = Cli::try_parse_from(["glexplorer", "groups", "-g", "5", "-g", "7", "--strict"])
            .unwrap();
        match cli.command {
            Commands::Groups { groups, strict } => {
                assert_eq!(groups, vec![5, 7]);
                assert!(strict);
            }
            _ => panic!("expected groups command"),
        }
    }

    #[test]
    fn test_parse_pipeline_with_tag_ref() {
        let cli = Cli::try_parse_from([
            "glexplorer",
            "pipeline",
            "-P",
            "10",
            "--ref",
            "tag:v1",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Pipeline {
                project,
                ref_,
                link,
                job_filter,
            } => {
                assert_eq!(project, 10);
                assert_eq!(ref_, "tag:v1");
                assert!(!link);
                assert!(job_filter.is_none());
            }
            _ => panic!("expected pipeline command"),
        }
    }

    #[test]
    fn test_parse_group_pipelines_with_job_filter() {
        let cli = Cli::try_parse_from([
            "glexplorer",
            "group-pipelines",
            "-g",
            "5",
            "--ref",
            "main",
            "--job-filter",
            "deploy",
        ])
        .unwrap();
        match cli.command {
            Commands::GroupPipelines {
                groups, job_filter, ..
            } => {
                assert_eq!(groups, vec![5]);
                assert_eq!(job_filter.as_deref(), Some("deploy"));
            }
            _ => panic!("expected group-pipelines command"),
        }
    }

    #[test]
    fn test_root_groups_fall_back_to_config() {
        let mut config = Config::default();
        config.gitlab.root_groups = vec![42];

        assert_eq!(Cli::root_groups(&[], &config).unwrap(), vec![42]);
        assert_eq!(Cli::root_groups(&[5], &config).unwrap(), vec![5]);
        assert!(Cli::root_groups(&[], &Config::default()).is_err());
    }
}
