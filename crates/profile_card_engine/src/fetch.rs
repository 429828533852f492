use std::time::Duration;

use card_logging::{card_debug, card_warn};
use futures_util::StreamExt;
use profile_card_core::ProfileRecord;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::{normalize_profile, GitHubRepo, GitHubUser};
use crate::{EngineError, FailureKind, FetchError};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub api_base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// How many repositories the card lists. Zero skips the repo request.
    pub top_repo_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            user_agent: concat!("profile-card/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
            top_repo_limit: 5,
        }
    }
}

/// Resolves a username into a normalized profile. Implementations hold no
/// per-request state.
#[async_trait::async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch(&self, username: &str) -> Result<ProfileRecord, FetchError>;
}

/// GitHub REST fetcher. One `fetch` issues two GETs: `/users/{u}`, then
/// `/users/{u}/repos` for the top repositories (skipped when
/// `top_repo_limit` is 0). Either call failing fails the whole fetch.
#[derive(Debug, Clone)]
pub struct ReqwestProfileFetcher {
    client: reqwest::Client,
    base_url: Url,
    settings: FetchSettings,
}

impl ReqwestProfileFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let base_url = Url::parse(&settings.api_base_url)
            .map_err(|err| EngineError::InvalidSettings(format!("api base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::InvalidSettings(format!(
                "api base url cannot take a path: {base_url}"
            )));
        }
        let client = build_client(&settings)?;
        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::new(FailureKind::InvalidUrl, "api base url cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        card_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.headers()));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ProfileFetcher for ReqwestProfileFetcher {
    async fn fetch(&self, username: &str) -> Result<ProfileRecord, FetchError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(FetchError::new(
                FailureKind::InvalidUsername,
                "username is empty",
            ));
        }

        let user: GitHubUser = self.get_json(self.endpoint(&["users", username])?).await?;

        // Second request; its failure discards the user already fetched.
        let repos: Vec<GitHubRepo> = if self.settings.top_repo_limit == 0 {
            Vec::new()
        } else {
            let mut url = self.endpoint(&["users", username, "repos"])?;
            url.query_pairs_mut()
                .append_pair("per_page", "100")
                .append_pair("type", "owner");
            self.get_json(url).await?
        };

        normalize_profile(user, repos, self.settings.top_repo_limit)
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, EngineError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&settings.user_agent)
            .map_err(|err| EngineError::InvalidSettings(format!("user agent: {err}")))?,
    );
    if let Some(token) = settings.token.as_deref().filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| EngineError::InvalidSettings(format!("token: {err}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()?)
}

fn status_error(status: StatusCode, headers: &HeaderMap) -> FetchError {
    let rate_limit_exhausted = headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0");

    match status {
        StatusCode::NOT_FOUND => FetchError::new(FailureKind::NotFound, status.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            FetchError::new(FailureKind::RateLimited, status.to_string())
        }
        StatusCode::FORBIDDEN if rate_limit_exhausted => {
            card_warn!("GitHub rate limit exhausted");
            FetchError::new(FailureKind::RateLimited, status.to_string())
        }
        _ => FetchError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string()),
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Malformed, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
