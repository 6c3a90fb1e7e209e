//! tf-commentor - Terraform pull-request commentor
//!
//! Runs a Terraform subcommand in CI and posts a readable summary of its
//! output as a pull-request comment, replacing the previous comment for the
//! same command.

pub mod comment;
pub mod config;
pub mod github;
pub mod pipeline;
pub mod runner;
pub mod templates;
pub mod terraform;

mod error;

pub use comment::{CommentRequest, Composer};
pub use config::{DetailsState, StepConfig};
pub use error::CommentorError;
pub use github::{Event, GitHubClient, GitHubError, ReviewClient};
pub use runner::{CommandRunner, ProcessRunner, RunOutput, RunnerError};
pub use templates::{TemplateError, TemplateSet};
pub use terraform::{
    CommandKind, ExitStatus, MAX_COMMENT_LENGTH, TerraformCommand, extract_plan_body, strip_ansi,
};
