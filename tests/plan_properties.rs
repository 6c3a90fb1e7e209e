use proptest::prelude::*;
use tf_commentor::{MAX_COMMENT_LENGTH, extract_plan_body, strip_ansi};

const START_MARKERS: &[&str] = &[
    "An execution plan has been generated and is shown below.",
    "Terraform used the selected providers to generate the following execution",
    "No changes. Infrastructure is up-to-date.",
    "No changes. Your infrastructure matches the configuration.",
    "Note: Objects have changed outside of Terraform",
];

/// Transcript-ish lines: diff markers, colour codes, summary and noise.
fn transcript_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ a-z0-9=.\"]{0,30}",
        "[ ]{0,8}[-+~] [a-z_.]{1,20}",
        "\x1b\\[[0-9;]{0,5}m[a-z ]{0,10}\x1b\\[0m",
        Just("Plan: 1 to add, 0 to change, 0 to destroy.".to_string()),
        Just("module.x: Reading...".to_string()),
        Just("Error: something".to_string()),
        Just("Releasing state lock. This may take a few moments...".to_string()),
        prop::sample::select(START_MARKERS).prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn output_never_exceeds_max_length(
        lines in prop::collection::vec(transcript_line(), 0..40),
        max_length in 0usize..400,
    ) {
        let raw = lines.join("\n");
        prop_assert!(extract_plan_body(&raw, max_length).len() <= max_length);
    }

    #[test]
    fn no_start_marker_yields_empty_body(
        lines in prop::collection::vec("[ a-zA-Z0-9:+~=.-]{0,40}", 0..40),
    ) {
        let raw = lines.join("\n");
        prop_assume!(!START_MARKERS.iter().any(|m| raw.contains(m)));
        prop_assert_eq!(extract_plan_body(&raw, MAX_COMMENT_LENGTH), "");
    }

    #[test]
    fn strip_ansi_is_idempotent(text in "(\x1b\\[[0-9;]{0,6}[a-zA-Z]|[ -~]){0,60}") {
        let once = strip_ansi(&text);
        prop_assert_eq!(strip_ansi(&once), once.clone());
    }

    #[test]
    fn body_starts_with_marker_line(
        marker in prop::sample::select(START_MARKERS),
        lines in prop::collection::vec("[ a-z0-9=+~-]{0,30}", 0..20),
    ) {
        let raw = format!("preamble\n{}\n{}", marker, lines.join("\n"));
        let body = extract_plan_body(&raw, MAX_COMMENT_LENGTH);
        let first_line = format!("{}\n", marker);
        prop_assert!(body.starts_with(&first_line));
    }

    #[test]
    fn extraction_is_deterministic(lines in prop::collection::vec(transcript_line(), 0..30)) {
        let raw = lines.join("\n");
        prop_assert_eq!(
            extract_plan_body(&raw, MAX_COMMENT_LENGTH),
            extract_plan_body(&raw, MAX_COMMENT_LENGTH)
        );
    }
}
