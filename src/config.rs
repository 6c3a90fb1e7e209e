use std::path::PathBuf;
use std::time::Duration;

use crate::terraform::TerraformCommand;

pub const DEFAULT_EVENT_PATH: &str = "/github/workflow/event.json";
pub const DEFAULT_TERRAFORM_BIN: &str = "/usr/local/bin/terraform";
pub const DEFAULT_WORKSPACE: &str = "default";

/// Whether the `<details>` block in the comment starts expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DetailsState {
    #[default]
    Open,
    Closed,
}

impl DetailsState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailsState::Open => "open",
            DetailsState::Closed => "closed",
        }
    }
}

/// Everything one workflow step needs, resolved from CLI flags and the
/// environment.
#[derive(Debug, Clone)]
pub struct StepConfig {
    pub command: TerraformCommand,
    pub directory: String,
    pub extra_args: Vec<String>,
    pub workspace: String,
    pub details_state: DetailsState,
    pub event_path: PathBuf,
    pub terraform_bin: PathBuf,
    pub timeout: Option<Duration>,
}

impl StepConfig {
    pub fn new(command: TerraformCommand, directory: impl Into<String>) -> Self {
        Self {
            command,
            directory: directory.into(),
            extra_args: Vec::new(),
            workspace: DEFAULT_WORKSPACE.to_string(),
            details_state: DetailsState::default(),
            event_path: PathBuf::from(DEFAULT_EVENT_PATH),
            terraform_bin: PathBuf::from(DEFAULT_TERRAFORM_BIN),
            timeout: None,
        }
    }

    pub fn terraform_args(&self) -> Vec<String> {
        self.command.to_args(&self.directory, &self.extra_args)
    }
}
