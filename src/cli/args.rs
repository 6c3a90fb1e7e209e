use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use tf_commentor::config::{DEFAULT_EVENT_PATH, DEFAULT_TERRAFORM_BIN, DEFAULT_WORKSPACE};
use tf_commentor::github::GITHUB_API_BASE;
use tf_commentor::{CommentorError, DetailsState, StepConfig, TerraformCommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Terraform command to run, e.g. "plan -lock=false" (fmt, plan, apply, destroy)
    pub command: String,

    /// Directory containing the terraform configuration
    pub directory: String,

    /// Additional arguments passed to terraform
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "TERRAFORM_WORKSPACE", default_value = DEFAULT_WORKSPACE)]
    pub workspace: String,

    #[arg(long, env = "DETAILS_STATE", value_enum, default_value_t = DetailsState::Open)]
    pub details_state: DetailsState,

    #[arg(long, env = "DEBUG")]
    pub debug: bool,

    #[arg(long, env = "GITHUB_EVENT_PATH", default_value = DEFAULT_EVENT_PATH)]
    pub event_path: PathBuf,

    #[arg(long, env = "TERRAFORM_BIN", default_value = DEFAULT_TERRAFORM_BIN)]
    pub terraform_bin: PathBuf,

    /// Kill terraform after this many seconds
    #[arg(long, env = "TERRAFORM_TIMEOUT")]
    pub timeout: Option<u64>,

    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
    pub api_url: String,
}

impl Cli {
    pub fn step_config(&self) -> Result<StepConfig, CommentorError> {
        let command: TerraformCommand = self.command.parse()?;

        if self.timeout == Some(0) {
            return Err(CommentorError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let mut config = StepConfig::new(command, self.directory.clone());
        config.extra_args = self.args.clone();
        config.workspace = self.workspace.clone();
        config.details_state = self.details_state;
        config.event_path = self.event_path.clone();
        config.terraform_bin = self.terraform_bin.clone();
        config.timeout = self.timeout.map(Duration::from_secs);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tf_commentor::CommandKind;

    const ENV_VARS: &[&str] = &[
        "GITHUB_TOKEN",
        "TERRAFORM_WORKSPACE",
        "DETAILS_STATE",
        "DEBUG",
        "GITHUB_EVENT_PATH",
        "TERRAFORM_BIN",
        "TERRAFORM_TIMEOUT",
        "GITHUB_API_URL",
    ];

    /// Clears every variable the CLI reads, runs `f`, then restores them.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let backup: Vec<(&str, Option<String>)> = ENV_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();

        unsafe {
            for name in ENV_VARS {
                std::env::remove_var(name);
            }
            for (name, value) in vars {
                std::env::set_var(name, value);
            }
        }

        let result = f();

        unsafe {
            for (name, value) in backup {
                match value {
                    Some(v) => std::env::set_var(name, v),
                    None => std::env::remove_var(name),
                }
            }
        }

        result
    }

    #[test]
    #[serial]
    fn test_positional_command_and_directory() {
        let cli = with_env(&[], || {
            Cli::parse_from(["tf-commentor", "plan -lock=false", "infra/prod"])
        });

        assert_eq!(cli.command, "plan -lock=false");
        assert_eq!(cli.directory, "infra/prod");
        assert!(cli.args.is_empty());
        assert!(cli.token.is_none());
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        let cli = with_env(&[], || Cli::parse_from(["tf-commentor", "plan", "."]));

        assert_eq!(cli.workspace, "default");
        assert_eq!(cli.details_state, DetailsState::Open);
        assert!(!cli.debug);
        assert_eq!(cli.event_path, PathBuf::from("/github/workflow/event.json"));
        assert_eq!(cli.terraform_bin, PathBuf::from("/usr/local/bin/terraform"));
        assert_eq!(cli.api_url, "https://api.github.com");
        assert!(cli.timeout.is_none());
    }

    #[test]
    #[serial]
    fn test_trailing_args_allow_hyphens() {
        let cli = with_env(&[], || {
            Cli::parse_from(["tf-commentor", "plan", ".", "-var", "env=prod", "-refresh=false"])
        });

        assert_eq!(cli.args, vec!["-var", "env=prod", "-refresh=false"]);
    }

    #[test]
    #[serial]
    fn test_settings_from_env() {
        let cli = with_env(
            &[
                ("GITHUB_TOKEN", "env_token"),
                ("TERRAFORM_WORKSPACE", "staging"),
                ("DETAILS_STATE", "closed"),
                ("DEBUG", "true"),
                ("TERRAFORM_TIMEOUT", "600"),
            ],
            || Cli::parse_from(["tf-commentor", "apply", "stack"]),
        );

        assert_eq!(cli.token, Some("env_token".to_string()));
        assert_eq!(cli.workspace, "staging");
        assert_eq!(cli.details_state, DetailsState::Closed);
        assert!(cli.debug);
        assert_eq!(cli.timeout, Some(600));
    }

    #[test]
    #[serial]
    fn test_debug_env_false() {
        let cli = with_env(&[("DEBUG", "false")], || {
            Cli::parse_from(["tf-commentor", "plan", "."])
        });

        assert!(!cli.debug);
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let cli = with_env(&[("GITHUB_TOKEN", "env_token")], || {
            Cli::parse_from(["tf-commentor", "--token=cli_token", "plan", "."])
        });

        assert_eq!(cli.token, Some("cli_token".to_string()));
    }

    #[test]
    #[serial]
    fn test_step_config_conversion() {
        let cli = with_env(&[("TERRAFORM_WORKSPACE", "prod")], || {
            Cli::parse_from(["tf-commentor", "plan -lock=false", "infra", "-input=false"])
        });

        let config = cli.step_config().unwrap();
        assert_eq!(config.command.kind, CommandKind::Plan);
        assert_eq!(config.workspace, "prod");
        assert_eq!(
            config.terraform_args(),
            vec!["-chdir=infra", "plan", "-lock=false", "-input=false"]
        );
    }

    #[test]
    #[serial]
    fn test_step_config_rejects_unknown_command() {
        let cli = with_env(&[], || Cli::parse_from(["tf-commentor", "init", "."]));

        assert!(matches!(
            cli.step_config(),
            Err(CommentorError::InvalidCommand(ref c)) if c == "init"
        ));
    }

    #[test]
    #[serial]
    fn test_step_config_rejects_zero_timeout() {
        let cli = with_env(&[], || {
            Cli::parse_from(["tf-commentor", "--timeout=0", "plan", "."])
        });

        assert!(matches!(cli.step_config(), Err(CommentorError::Config(_))));
    }
}
