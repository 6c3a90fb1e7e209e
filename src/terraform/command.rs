use std::fmt;
use std::str::FromStr;

use crate::error::CommentorError;

/// Terraform subcommands this tool knows how to run and report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Fmt,
    Plan,
    Apply,
    Destroy,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Fmt,
        CommandKind::Plan,
        CommandKind::Apply,
        CommandKind::Destroy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Fmt => "fmt",
            CommandKind::Plan => "plan",
            CommandKind::Apply => "apply",
            CommandKind::Destroy => "destroy",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = CommentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CommentorError::InvalidCommand(s.to_string()))
    }
}

/// A user-supplied command line such as `plan -lock=false`, split into the
/// subcommand and the words that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformCommand {
    pub kind: CommandKind,
    pub extra_args: Vec<String>,
}

impl TerraformCommand {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            extra_args: Vec::new(),
        }
    }

    /// Full argv passed to the terraform binary.
    ///
    /// `apply` always runs non-interactively, so `--auto-approve` is injected
    /// right after the subcommand.
    pub fn to_args(&self, directory: &str, trailing: &[String]) -> Vec<String> {
        let mut args = vec![format!("-chdir={}", directory), self.kind.to_string()];

        if self.kind == CommandKind::Apply {
            args.push("--auto-approve".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args.extend(trailing.iter().cloned());
        args
    }

    /// Heading fragment used to find and replace an earlier comment for the
    /// same command.
    pub fn comment_marker(&self) -> String {
        format!("### Terraform `{}`", self)
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for arg in &self.extra_args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl FromStr for TerraformCommand {
    type Err = CommentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts
            .next()
            .ok_or_else(|| CommentorError::InvalidCommand(String::new()))?
            .parse::<CommandKind>()?;

        Ok(Self {
            kind,
            extra_args: parts.map(str::to_string).collect(),
        })
    }
}

/// Exit status of a terraform invocation.
///
/// `plan -detailed-exitcode` exits with 2 when changes are present, so both 0
/// and 2 count as a successful plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    pub fn is_plan_success(&self) -> bool {
        matches!(self.0, 0 | 2)
    }
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        ExitStatus(code)
    }
}

impl FromStr for ExitStatus {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i32>().map(ExitStatus)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
