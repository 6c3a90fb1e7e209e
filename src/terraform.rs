//! Terraform command model and transcript processing.

mod ansi;
mod command;
mod plan;

pub use ansi::strip_ansi;
pub use command::{CommandKind, ExitStatus, TerraformCommand};
pub use plan::{MAX_COMMENT_LENGTH, extract_plan_body, truncate_to};
