//! One workflow step: run terraform, then replace the pull-request comment.

use std::path::Path;

use crate::comment::{CommentRequest, Composer};
use crate::config::StepConfig;
use crate::error::CommentorError;
use crate::github::{Event, GitHubError, ReviewClient};
use crate::runner::CommandRunner;
use crate::templates::TemplateSet;

pub async fn load_event(path: &Path) -> Result<Event, CommentorError> {
    let data = tokio::fs::read_to_string(path).await?;
    let event = serde_json::from_str(&data)?;
    Ok(event)
}

/// Runs the configured terraform command and, for pull requests, posts the
/// rendered result. Returns the process exit code.
///
/// Outside a pull request terraform's own exit code is passed through. In a
/// pull request the outcome is reported in the comment, so a posted comment
/// means success.
pub async fn execute(
    config: &StepConfig,
    templates: &TemplateSet,
    runner: &dyn CommandRunner,
    review: Option<&dyn ReviewClient>,
) -> Result<i32, CommentorError> {
    let event = load_event(&config.event_path).await?;
    let args = config.terraform_args();

    tracing::debug!(command = %config.command, directory = %config.directory, "running terraform");

    let result = runner.run(&config.terraform_bin, &args).await?;

    let Some(issue) = event.pull_request_number() else {
        if result.exit_status.is_success() {
            tracing::info!(command = %config.command.kind, "terraform command completed successfully");
        } else {
            tracing::error!(
                command = %config.command.kind,
                exit_code = result.exit_status.code(),
                "terraform command failed"
            );
        }
        tracing::debug!("not a pull request, skipping comment");
        return Ok(result.exit_status.code());
    };

    let owner = event.repository.owner.login.as_str();
    let repo = event.repository.name.as_str();
    if owner.is_empty() || repo.is_empty() {
        return Err(CommentorError::Config(
            "event payload has a pull request but no repository owner/name".to_string(),
        ));
    }

    let needle = config.command.comment_marker();
    match review {
        Some(client) => match client.find_and_delete_comment(owner, repo, issue, &needle).await {
            Ok(true) => tracing::debug!(issue, "deleted existing comment"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "error checking for existing comments"),
        },
        None => tracing::warn!(error = %GitHubError::MissingToken, "error checking for existing comments"),
    }

    let composer = Composer::new(templates);
    let body = composer.compose(&CommentRequest {
        command: &config.command,
        input: &result.output,
        exit_status: result.exit_status,
        workspace: &config.workspace,
        details_state: config.details_state,
    })?;

    let client = review.ok_or(GitHubError::MissingToken)?;
    client.post_comment(owner, repo, issue, &body).await?;

    tracing::info!(issue, command = %config.command, "posted comment to pull request");
    Ok(0)
}
