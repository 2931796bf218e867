// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! GitHub REST API access.
//!
//! Everything the spotlight job asks the network boils down to three
//! queries: list an account's repositories, count commits since a
//! timestamp, and count pull requests created since a date. The
//! [`ActivitySource`] trait names those three queries so that the pipeline
//! can be driven by canned data in tests, while [`GitHubClient`] answers
//! them against api.github.com.
//!
//! # Rate Limits
//!
//! GitHub throttles aggressively, so every request goes out with a bearer
//! token and transient responses (429 and friends) get retried with bounded
//! exponential backoff before anyone sees an error.

use crate::rank::Repository;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const API_ROOT: &str = "https://api.github.com";

const PAGE_SIZE: usize = 100;

/// Response statuses worth retrying.
const RETRY_STATUSES: [u16; 4] = [429, 500, 502, 503];

/// Where repository activity numbers come from.
///
/// Layer of indirection over the hosting service so the pipeline can be
/// exercised without a network.
#[allow(async_fn_in_trait)]
pub trait ActivitySource {
    /// Enumerate every repository visible for the account.
    async fn list_repositories(&self, account: &str) -> Result<Vec<Repository>>;

    /// Count commits authored since the given timestamp.
    async fn count_commits(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64>;

    /// Count pull requests created since the given timestamp, any state.
    async fn count_pull_requests(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64>;
}

/// Bounded exponential backoff policy for transient responses.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retry attempts before the response is taken at face value.
    pub max_retries: u32,

    /// Delay before the first retry. Doubles on each attempt after.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Delay to wait before the given retry attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt)
    }
}

/// Activity source backed by the GitHub REST API.
#[derive(Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    retry: RetryConfig,
}

impl GitHubClient {
    /// Construct new GitHub client.
    ///
    /// # Errors
    ///
    /// - Return [`SourceError::MissingToken`] if no token was supplied.
    /// - Return [`SourceError::Request`] if the HTTP client cannot be built.
    pub fn try_new(token: Option<impl Into<String>>) -> Result<Self> {
        let token = token.map(Into::into).ok_or(SourceError::MissingToken)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("plumage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token,
            retry: RetryConfig::default(),
        })
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        let mut attempt = 0;
        loop {
            let result = self
                .http
                .get(url)
                .bearer_auth(&self.token)
                .header("Accept", "application/vnd.github+json")
                .send()
                .await;

            let transient = match &result {
                Ok(response) => RETRY_STATUSES.contains(&response.status().as_u16()),
                Err(error) => error.is_timeout() || error.is_connect(),
            };

            if transient && attempt < self.retry.max_retries {
                let delay = self.retry.delay(attempt);
                warn!("transient response from {url}, retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return result;
        }
    }
}

impl ActivitySource for GitHubClient {
    /// Enumerate every repository visible for the account.
    ///
    /// Follows pagination to exhaustion. A single page is not enough for
    /// accounts with many repositories.
    ///
    /// # Errors
    ///
    /// - Return [`SourceError::Auth`] if GitHub rejects the token.
    /// - Return [`SourceError::Request`] if transport fails.
    #[instrument(skip(self), level = "debug")]
    async fn list_repositories(&self, account: &str) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!("{API_ROOT}/users/{account}/repos?per_page={PAGE_SIZE}&page={page}");
            let response = check(&url, self.get_with_retry(&url).await?)?;
            let batch: Vec<RepoDto> = response.json().await?;
            let fetched = batch.len();
            repositories.extend(batch.into_iter().map(|dto| Repository::new(dto.full_name)));

            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!("listed {} repositories for {account}", repositories.len());
        Ok(repositories)
    }

    /// Count commits authored since the given timestamp.
    ///
    /// Pages through the commit listing and counts entries.
    ///
    /// # Errors
    ///
    /// - Return [`SourceError::Auth`] if GitHub rejects the token.
    /// - Return [`SourceError::Request`] if transport fails.
    async fn count_commits(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut count = 0u64;
        let mut page = 1usize;
        loop {
            let url = format!(
                "{API_ROOT}/repos/{}/commits?since={since}&per_page={PAGE_SIZE}&page={page}",
                repo.full_name()
            );
            let response = self.get_with_retry(&url).await?;

            // INVARIANT: Empty repositories answer 409, which counts as no
            // activity instead of an error.
            if response.status() == StatusCode::CONFLICT {
                return Ok(0);
            }

            let batch: Vec<CommitDto> = check(&url, response)?.json().await?;
            count += batch.len() as u64;

            if batch.len() < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(count)
    }

    /// Count pull requests created since the given timestamp, any state.
    ///
    /// Uses the issue search endpoint, which reports the total match count
    /// without needing pagination.
    ///
    /// # Errors
    ///
    /// - Return [`SourceError::Auth`] if GitHub rejects the token.
    /// - Return [`SourceError::Request`] if transport fails.
    async fn count_pull_requests(&self, repo: &Repository, since: DateTime<Utc>) -> Result<u64> {
        let query = format!(
            "repo:{} is:pr created:>={}",
            repo.full_name(),
            since.format("%Y-%m-%d")
        );
        let url = format!("{API_ROOT}/search/issues?q={}", urlencoding::encode(&query));
        let response = check(&url, self.get_with_retry(&url).await?)?;
        let result: SearchCountDto = response.json().await?;

        Ok(result.total_count)
    }
}

fn check(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::Auth { status });
    }

    if !status.is_success() {
        return Err(SourceError::Status {
            status,
            url: url.to_string(),
        });
    }

    Ok(response)
}

#[derive(Debug, Deserialize)]
struct RepoDto {
    full_name: String,
}

/// Commit entries only get counted, never read.
#[derive(Debug, Deserialize)]
struct CommitDto {}

#[derive(Debug, Deserialize)]
struct SearchCountDto {
    total_count: u64,
}

/// Activity source error types.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No credential to authenticate with.
    #[error("no github token provided, set GITHUB_TOKEN or pass --token")]
    MissingToken,

    /// GitHub rejected the supplied credential.
    #[error("github rejected the supplied credentials (status {status})")]
    Auth { status: StatusCode },

    /// Transport-level request failure.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Response carried an unexpected status.
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Friendly result alias :3
pub type Result<T, E = SourceError> = std::result::Result<T, E>;
