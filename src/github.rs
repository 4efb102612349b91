//! Remote content store: GitHub's "create or update file contents" endpoint.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::config::RelayConfig;
use crate::content::ContentId;
use crate::error::{RelayError, RelayResult};
use crate::payload::OutboundPayload;

const USER_AGENT: &str = concat!("quest-relay/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// What the remote answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A store that accepts one file per content id
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write `payload` at `id`. Called at most once per relayed message.
    async fn put(&self, id: &ContentId, payload: &OutboundPayload) -> RelayResult<RemoteResponse>;
}

/// Build `<api_base>/repos/<owner>/<repo>/contents/<id>`.
///
/// `owner` and `repo` are pushed as single path segments, so `/` or `?` in
/// them is percent-encoded instead of changing the target path.
pub fn contents_url(api_base: &str, owner: &str, repo: &str, id: &ContentId) -> RelayResult<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| RelayError::OutboundBuild(format!("{api_base}: {e}")))?;
    let id = id.to_hex();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            RelayError::OutboundBuild(format!("{api_base}: cannot be used as a base URL"))
        })?;
        segments
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents", id.as_str()]);
    }
    Ok(url)
}

/// `ContentStore` backed by the GitHub REST API
pub struct GithubContents {
    client: reqwest::Client,
    config: RelayConfig,
}

impl GithubContents {
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RelayError::OutboundBuild(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ContentStore for GithubContents {
    async fn put(&self, id: &ContentId, payload: &OutboundPayload) -> RelayResult<RemoteResponse> {
        let url = contents_url(
            &self.config.api_base,
            &self.config.owner,
            &self.config.repo,
            id,
        )?;

        let response = self
            .client
            .put(url)
            .header(AUTHORIZATION, format!("token {}", self.config.token))
            .header(ACCEPT, GITHUB_JSON)
            .json(payload)
            .send()
            .await
            .map_err(RelayError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(RelayError::ResponseRead)?;

        Ok(RemoteResponse { status, body })
    }
}
