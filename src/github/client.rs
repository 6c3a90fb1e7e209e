use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use super::types::{ApiErrorBody, IssueComment, NewComment};
use super::{GitHubError, ReviewClient};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const COMMENTS_PAGE_SIZE: usize = 100;

#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self, GitHubError> {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// NOTE: Used for GitHub Enterprise and for testing with mock servers.
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            GitHubError::Auth {
                message: "Invalid token format".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, header_value);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tf-commentor/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(GitHubError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of issue comments.
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        page: u32,
    ) -> Result<Vec<IssueComment>, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments?per_page={}&page={}",
            self.base_url, owner, repo, issue, COMMENTS_PAGE_SIZE, page
        );

        let response = check_status(self.client.get(&url).send().await?).await?;
        let comments = response.json::<Vec<IssueComment>>().await.map_err(|e| {
            GitHubError::Api {
                status: 0,
                message: format!("Failed to parse comments: {}", e),
            }
        })?;

        Ok(comments)
    }

    pub async fn delete_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: u64,
    ) -> Result<(), GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.base_url, owner, repo, comment_id
        );

        check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewClient for GitHubClient {
    async fn find_and_delete_comment(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        needle: &str,
    ) -> Result<bool, GitHubError> {
        let mut page = 1u32;

        loop {
            let comments = self.list_comments(owner, repo, issue, page).await?;
            let count = comments.len();

            let found = comments.into_iter().find(|comment| {
                comment
                    .body
                    .as_deref()
                    .is_some_and(|body| body.contains(needle))
            });

            if let Some(comment) = found {
                tracing::debug!(comment_id = comment.id, issue, "deleting previous comment");
                self.delete_comment(owner, repo, comment.id).await?;
                return Ok(true);
            }

            if count < COMMENTS_PAGE_SIZE {
                return Ok(false);
            }

            page += 1;
        }
    }

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_url, owner, repo, issue
        );

        let response = self
            .client
            .post(&url)
            .json(&NewComment { body })
            .send()
            .await?;
        check_status(response).await?;

        tracing::debug!(issue, bytes = body.len(), "comment posted");
        Ok(())
    }
}

/// Maps non-2xx responses to `GitHubError`, using GitHub's `message` field
/// when the body has one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    match status.as_u16() {
        401 | 403 => Err(GitHubError::Auth { message }),
        code => Err(GitHubError::Api {
            status: code,
            message,
        }),
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}
