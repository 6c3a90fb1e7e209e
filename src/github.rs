mod client;
mod error;
mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use error::GitHubError;
pub use types::{Event, IssueComment, PullRequest, Repository, RepositoryOwner};

use async_trait::async_trait;

/// Pull-request comment operations the workflow depends on.
#[async_trait]
pub trait ReviewClient: Send + Sync {
    /// Deletes the first comment on the issue whose body contains `needle`.
    ///
    /// Returns whether a comment was deleted.
    async fn find_and_delete_comment(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        needle: &str,
    ) -> Result<bool, GitHubError>;

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue: u64,
        body: &str,
    ) -> Result<(), GitHubError>;
}
