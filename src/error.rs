use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentorError {
    #[error("invalid command '{0}'. Valid commands are: fmt, plan, apply, destroy")]
    InvalidCommand(String),

    #[error(transparent)]
    GitHub(#[from] crate::github::GitHubError),

    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    #[error(transparent)]
    Runner(#[from] crate::runner::RunnerError),

    #[error("failed to parse event payload: {0}")]
    Event(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
