//! Embedded comment templates and a minimal `{{ Field }}` renderer.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("invalid placeholder regex")
});

const EMBEDDED: &[(&str, &str)] = &[
    ("plan_success", include_str!("templates/plan_success.tmpl")),
    ("plan_failure", include_str!("templates/plan_failure.tmpl")),
    ("apply_success", include_str!("templates/apply_success.tmpl")),
    ("apply_failure", include_str!("templates/apply_failure.tmpl")),
    ("general", include_str!("templates/general.tmpl")),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {0} not found")]
    NotFound(String),

    #[error("error executing template {template}: {message}")]
    Render { template: String, message: String },
}

/// Identifies one of the comment templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateName {
    PlanSuccess,
    PlanFailure,
    ApplySuccess,
    ApplyFailure,
    General,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::PlanSuccess => "plan_success",
            TemplateName::PlanFailure => "plan_failure",
            TemplateName::ApplySuccess => "apply_success",
            TemplateName::ApplyFailure => "apply_failure",
            TemplateName::General => "general",
        }
    }
}

/// Fields available to every template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateData<'a> {
    pub command: String,
    pub input: &'a str,
    pub workspace: &'a str,
    pub details_state: &'a str,
}

/// Read-only registry of template bodies, built once at startup.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: HashMap<String, String>,
}

impl TemplateSet {
    /// Loads the templates compiled into the binary.
    pub fn embedded() -> Self {
        Self::from_sources(EMBEDDED.iter().copied())
    }

    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let templates = sources
            .into_iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect();
        Self { templates }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn render(&self, name: &str, data: &TemplateData<'_>) -> Result<String, TemplateError> {
        let body = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;

        let render_err = |message: String| TemplateError::Render {
            template: name.to_string(),
            message,
        };

        let fields = serde_json::to_value(data).map_err(|e| render_err(e.to_string()))?;

        let mut out = String::with_capacity(body.len() + data.input.len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(body) {
            let (Some(whole), Some(field)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = fields
                .get(field.as_str())
                .and_then(|v| v.as_str())
                .ok_or_else(|| render_err(format!("no field {} in template data", field.as_str())))?;

            out.push_str(&body[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&body[last..]);

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(input: &str) -> TemplateData<'_> {
        TemplateData {
            command: "plan".to_string(),
            input,
            workspace: "default",
            details_state: "open",
        }
    }

    #[test]
    fn test_embedded_has_all_templates() {
        let set = TemplateSet::embedded();
        for name in [
            TemplateName::PlanSuccess,
            TemplateName::PlanFailure,
            TemplateName::ApplySuccess,
            TemplateName::ApplyFailure,
            TemplateName::General,
        ] {
            assert!(set.contains(name.as_str()), "missing {}", name.as_str());
        }
    }

    #[test]
    fn test_embedded_templates_start_with_marker_heading() {
        let set = TemplateSet::embedded();
        for (name, _) in EMBEDDED {
            let out = set.render(name, &data("body")).unwrap();
            assert!(
                out.starts_with("### Terraform `plan`"),
                "{} does not start with the heading",
                name
            );
        }
    }

    #[test]
    fn test_render_substitutes_fields() {
        let set = TemplateSet::from_sources([(
            "t",
            "{{Command}}|{{ Workspace }}|{{  DetailsState }}|{{Input}}",
        )]);
        let out = set.render("t", &data("x")).unwrap();
        assert_eq!(out, "plan|default|open|x");
    }

    #[test]
    fn test_render_does_not_expand_placeholders_in_values() {
        let set = TemplateSet::from_sources([("t", "[{{ Input }}]")]);
        let out = set.render("t", &data("{{ Workspace }}")).unwrap();
        assert_eq!(out, "[{{ Workspace }}]");
    }

    #[test]
    fn test_render_unknown_field() {
        let set = TemplateSet::from_sources([("t", "{{ Missing }}")]);
        let err = set.render("t", &data("x")).unwrap_err();
        match err {
            TemplateError::Render { template, message } => {
                assert_eq!(template, "t");
                assert!(message.contains("Missing"));
            }
            other => panic!("expected Render error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_unknown_template() {
        let set = TemplateSet::from_sources([("t", "x")]);
        let err = set.render("general", &data("x")).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(ref n) if n == "general"));
        assert_eq!(err.to_string(), "template general not found");
    }
}
