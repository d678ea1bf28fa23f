mod progress;
mod styling;
mod summary;
mod tables;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::Path;

pub use progress::Spinner;
use styling::{banner, dim};
pub use summary::{
    render_group_pipelines, render_groups, render_pipeline, render_pipeline_link, render_tags,
};

/// Prints the glexplorer banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        banner("🦊 glexplorer"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab group, ref and pipeline explorer")
    );
}

pub fn to_json(value: &impl Serialize, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Writes rendered output to `path`, or stdout when no path is given.
pub fn emit(rendered: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write output: {}", path.display()))?;
        info!("Output written to: {}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(())
}
