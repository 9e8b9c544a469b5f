//! Fetches one GitHub issue and its comments through the [`HttpClient`] port.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TriageError;
use crate::ports::{HttpClient, HttpError, HttpRequest};
use crate::record::Issue;

/// Per-request bound on tracker calls, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("triage/", env!("CARGO_PKG_VERSION"));

/// Owner and repository parsed from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoRef {
    /// Parses `https://github.com/{owner}/{repo}[/...]`.
    ///
    /// The scheme is optional, `www.` is tolerated, trailing path segments are
    /// ignored, and a `.git` suffix on the repository is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidUrl`] for another host or fewer than two
    /// non-empty path segments.
    pub fn parse(repository_url: &str) -> Result<Self, TriageError> {
        let trimmed = repository_url.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let path = without_scheme
            .strip_prefix("github.com/")
            .or_else(|| without_scheme.strip_prefix("www.github.com/"))
            .ok_or(TriageError::InvalidUrl)?;

        let mut segments = path.split('/');
        let owner = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or(TriageError::InvalidUrl)?;
        let repo = segments
            .next()
            .map(|s| s.strip_suffix(".git").unwrap_or(s))
            .filter(|s| !s.is_empty())
            .ok_or(TriageError::InvalidUrl)?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct GhIssue {
    title: Option<String>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct GhComment {
    body: Option<String>,
}

fn transport_error(e: HttpError) -> TriageError {
    match e {
        HttpError::Timeout => TriageError::Timeout,
        HttpError::Transport(msg) => TriageError::Network(msg),
    }
}

fn invalid_payload(e: serde_json::Error) -> TriageError {
    TriageError::Unexpected(format!("Invalid issue payload: {e}"))
}

/// Resolves a repository URL and issue number into an [`Issue`].
pub struct IssueFetcher<'a> {
    http: &'a dyn HttpClient,
    api_base: String,
    token: Option<String>,
}

impl<'a> IssueFetcher<'a> {
    /// Creates a fetcher calling `api_base` (e.g. `https://api.github.com`).
    pub fn new(
        http: &'a dyn HttpClient,
        api_base: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            token,
        }
    }

    /// Fetches the issue and its comments.
    ///
    /// Sends at most two requests. A failed comments request yields an issue
    /// with empty `comments` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidUrl`] without touching the network,
    /// [`TriageError::Timeout`] or [`TriageError::Network`] for transport
    /// failures, [`TriageError::Api`] for a non-200 issue status, and
    /// [`TriageError::Unexpected`] for an undecodable issue payload.
    pub async fn fetch(
        &self,
        repository_url: &str,
        issue_number: u64,
    ) -> Result<Issue, TriageError> {
        let repo = RepoRef::parse(repository_url)?;
        let issue_url = format!(
            "{}/repos/{}/{}/issues/{issue_number}",
            self.api_base.trim_end_matches('/'),
            repo.owner,
            repo.repo
        );
        let comments_url = format!("{issue_url}/comments");

        debug!(url = %issue_url, "fetching issue");
        let request = self.request(issue_url);
        let response = self.http.get(&request).await.map_err(transport_error)?;
        if response.status != 200 {
            return Err(TriageError::Api(response.status));
        }
        let issue: GhIssue = serde_json::from_str(&response.body).map_err(invalid_payload)?;

        let comments = self.fetch_comments(comments_url).await;

        Ok(Issue {
            title: issue.title.unwrap_or_default(),
            body: issue.body.unwrap_or_default(),
            comments: comments.join("\n"),
        })
    }

    async fn fetch_comments(&self, url: String) -> Vec<String> {
        debug!(url = %url, "fetching comments");
        let response = match self.http.get(&self.request(url)).await {
            Ok(response) if response.status == 200 => response,
            Ok(response) => {
                let status = response.status;
                warn!(status, "comments request failed, continuing without comments");
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "comments request failed, continuing without comments");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<GhComment>>(&response.body) {
            Ok(comments) => comments
                .into_iter()
                .map(|c| c.body.unwrap_or_default())
                .collect(),
            Err(e) => {
                warn!(error = %e, "undecodable comments payload, continuing without comments");
                Vec::new()
            }
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        let request = HttpRequest::get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .timeout_secs(REQUEST_TIMEOUT_SECS);
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}
