use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::auth::Token;
use crate::error::{ExplorerError, Result};

pub(super) const PAGE_SIZE: usize = 100;
const MAX_PAGES: usize = 50;
const API_SUFFIX: &str = "api/v4/";

/// Connection-level policy for the REST client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// GitLab REST v4 client bound to one set of credentials.
///
/// A client is built per invocation and never shared between operators.
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Token,
    options: ClientOptions,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Token, options: ClientOptions) -> Result<Self> {
        if token.is_empty() {
            return Err(ExplorerError::MissingParameter("token"));
        }

        let client = Client::builder()
            .user_agent(concat!("glexplorer/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .build()
            .map_err(|e| ExplorerError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = api_url(base_url)?;

        Ok(Self {
            client,
            api_url,
            token,
            options,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| ExplorerError::Config(format!("Invalid API path '{path}': {e}")))
    }

    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("PRIVATE-TOKEN", self.token.as_str())
    }

    /// Sends a GET request, retrying on network errors, rate limits and
    /// server errors.
    async fn get_with_retry(&self, url: &Url, params: &[(&str, String)]) -> Result<Response> {
        let mut retry_count = 0;
        loop {
            let request = self.auth_request(self.client.get(url.clone()).query(params));

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if retry_count >= self.options.max_retries {
                        return Err(e.into());
                    }
                    warn!(
                        "Network error ({}), retrying in {:?} ({}/{})...",
                        e,
                        self.options.retry_delay,
                        retry_count + 1,
                        self.options.max_retries
                    );
                    tokio::time::sleep(self.options.retry_delay).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                if retry_count >= self.options.max_retries {
                    return Err(ExplorerError::ApiErrorAfterRetries {
                        status: status.as_u16(),
                        retries: self.options.max_retries,
                    });
                }

                warn!(
                    "GitLab API error (status {status}). Waiting {:?} before retry {}/{}...",
                    self.options.retry_delay,
                    retry_count + 1,
                    self.options.max_retries
                );

                tokio::time::sleep(self.options.retry_delay).await;
                retry_count += 1;
                continue;
            }

            return check_status(response).await;
        }
    }

    pub(super) async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = self.get_with_retry(&url, params).await?;
        Ok(response.json().await?)
    }

    /// Fetches every page of a list endpoint by following `x-next-page`.
    pub(super) async fn get_all<T>(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let mut items = Vec::new();
        let mut page = Some(1);

        for _ in 0..MAX_PAGES {
            let Some(current) = page else {
                break;
            };
            let mut query = params.to_vec();
            query.push(("per_page", PAGE_SIZE.to_string()));
            query.push(("page", current.to_string()));

            debug!("GET {url} (page {current})");
            let response = self.get_with_retry(&url, &query).await?;
            page = next_page(&response);
            let batch: Vec<T> = response.json().await?;
            items.extend(batch);
        }

        if page.is_some() {
            warn!(
                "GET {url} stopped after {MAX_PAGES} pages; {} items returned, the rest were left out",
                items.len()
            );
        }

        Ok(items)
    }

    /// Sends a state-changing request exactly once.
    pub(super) async fn send_once(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");
        let request = self.auth_request(self.client.request(method, url).query(params));
        let response = request.send().await?;
        check_status(response).await
    }
}

fn api_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ExplorerError::MissingParameter("base URL"));
    }

    let base = Url::parse(&format!("{trimmed}/"))
        .map_err(|e| ExplorerError::Config(format!("Invalid base URL: {e}")))?;

    if base.path().ends_with(API_SUFFIX) {
        return Ok(base);
    }

    base.join(API_SUFFIX)
        .map_err(|e| ExplorerError::Config(format!("Invalid API base URL: {e}")))
}

fn next_page(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("x-next-page")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    Err(ExplorerError::Api {
        status: status.as_u16(),
        message: error_text,
    })
}
