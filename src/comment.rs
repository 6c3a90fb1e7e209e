//! Turns a terraform transcript into the text of a pull-request comment.

use crate::config::DetailsState;
use crate::templates::{TemplateData, TemplateError, TemplateName, TemplateSet};
use crate::terraform::{
    CommandKind, ExitStatus, MAX_COMMENT_LENGTH, TerraformCommand, extract_plan_body, truncate_to,
};

/// One comment to render.
#[derive(Debug, Clone)]
pub struct CommentRequest<'a> {
    pub command: &'a TerraformCommand,
    pub input: &'a str,
    pub exit_status: ExitStatus,
    pub workspace: &'a str,
    pub details_state: DetailsState,
}

/// Picks the template for a command outcome and prepares its input.
pub struct Composer<'a> {
    templates: &'a TemplateSet,
    max_length: usize,
}

impl<'a> Composer<'a> {
    pub fn new(templates: &'a TemplateSet) -> Self {
        Self::with_max_length(templates, MAX_COMMENT_LENGTH)
    }

    pub fn with_max_length(templates: &'a TemplateSet, max_length: usize) -> Self {
        Self {
            templates,
            max_length,
        }
    }

    pub fn compose(&self, request: &CommentRequest<'_>) -> Result<String, TemplateError> {
        let (name, input) = self.select(request);

        tracing::debug!(
            command = %request.command,
            exit_status = %request.exit_status,
            template = name.as_str(),
            "composing comment"
        );

        let data = TemplateData {
            command: request.command.to_string(),
            input: &input,
            workspace: request.workspace,
            details_state: request.details_state.as_str(),
        };

        self.templates.render(name.as_str(), &data)
    }

    fn select(&self, request: &CommentRequest<'_>) -> (TemplateName, String) {
        let status = request.exit_status;
        let (name, mut input) = match request.command.kind {
            CommandKind::Plan if status.is_plan_success() => {
                return (
                    TemplateName::PlanSuccess,
                    extract_plan_body(request.input, self.max_length),
                );
            }
            CommandKind::Plan => (TemplateName::PlanFailure, request.input.to_string()),
            CommandKind::Apply if status.is_success() => {
                (TemplateName::ApplySuccess, request.input.trim().to_string())
            }
            CommandKind::Apply => (TemplateName::ApplyFailure, request.input.to_string()),
            CommandKind::Fmt | CommandKind::Destroy => {
                (TemplateName::General, request.input.to_string())
            }
        };

        truncate_to(&mut input, self.max_length);
        (name, input)
    }
}
