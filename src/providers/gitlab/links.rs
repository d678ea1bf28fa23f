const API_PATH: &str = "/api/v4";

/// Strips the REST API path from a client base address, leaving the web root.
///
/// # Examples
///
/// `https://gitlab.example.com/api/v4/` becomes `https://gitlab.example.com`.
pub fn web_root(api_base: &str) -> &str {
    let trimmed = api_base.trim_end_matches('/');
    trimmed.strip_suffix(API_PATH).unwrap_or(trimmed)
}

/// Builds a clickable pipeline URL
/// (e.g., <https://gitlab.example.com/group/project/-/pipelines/123>).
pub fn pipeline_url(api_base: &str, project_path: &str, pipeline_id: u64) -> String {
    format!(
        "{}/{}/-/pipelines/{pipeline_id}",
        web_root(api_base),
        project_path.trim_matches('/')
    )
}
