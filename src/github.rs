use crate::error::{GitHubPreviewError, Result};
use crate::models::{FetchFailure, RepoInfoResult};
use crate::types::GitHubRepo;
use image::DynamicImage;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
const API_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Request settings shared by every call a client makes
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub user_agent: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            token: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub struct GitHubClient {
    client: Client,
    config: ClientConfig,
    api_base: Url,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(GitHubClient {
            client,
            config,
            api_base,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            owner,
            repo
        )
    }

    fn api_request(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url).header(ACCEPT, API_ACCEPT);
        match &self.config.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    /// Looks up a repository. Never fails outright: HTTP, transport and
    /// decoding problems all come back as a tagged `RepoInfoResult::Failure`.
    pub async fn get_repo_info(&self, owner: &str, repo: &str) -> RepoInfoResult {
        if owner.is_empty() || repo.is_empty() {
            warn!("Refusing to look up a repository with an empty owner or name");
            return RepoInfoResult::Failure(FetchFailure::http(400));
        }

        let url = self.repo_url(owner, repo);
        info!("Fetching repository info for {}/{}", owner, repo);
        debug!(%url, "GET repository");

        let response = match self.api_request(&url).send().await {
            Ok(response) => response,
            Err(e) => return RepoInfoResult::Failure(FetchFailure::network(&e)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Repository lookup returned non-200");
            return RepoInfoResult::Failure(FetchFailure::http(status.as_u16()));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return RepoInfoResult::Failure(FetchFailure::network(&e)),
        };

        match serde_json::from_slice::<GitHubRepo>(&body) {
            Ok(repo_data) => RepoInfoResult::Success(repo_data.into()),
            Err(e) => RepoInfoResult::Failure(FetchFailure::decode(&e)),
        }
    }

    /// Downloads and decodes an avatar image.
    pub async fn fetch_avatar(&self, url: &str) -> Result<DynamicImage> {
        let url = Url::parse(url)?;
        debug!(%url, "GET avatar");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(GitHubPreviewError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
