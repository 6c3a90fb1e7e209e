//! Extraction of the readable part of a `terraform plan` transcript.
//!
//! Raw CI output carries colour codes, refresh chatter and lock messages
//! around the actual plan. The scanner below keeps the lines from the first
//! recognised start marker through the `Plan: ` summary, and rewrites diff
//! markers so GitHub's `diff` highlighting picks them up.

use super::ansi::strip_ansi;

/// GitHub rejects issue comments longer than this many bytes.
pub const MAX_COMMENT_LENGTH: usize = 65536;

/// Lines that open the meaningful part of a plan, checked in order.
const PLAN_START_MARKERS: &[&str] = &[
    "An execution plan has been generated and is shown below.",
    "Terraform used the selected providers to generate the following execution",
    "No changes. Infrastructure is up-to-date.",
    "No changes. Your infrastructure matches the configuration.",
    "Note: Objects have changed outside of Terraform",
];

const STATE_LOCK_MARKER: &str = "Releasing state lock";
const RESOURCE_READ_MARKER: &str = ": Reading...";
const ERROR_MARKER: &str = "Error:";
const SUMMARY_PREFIX: &str = "Plan: ";

#[derive(Debug, Default)]
struct ScanState {
    started: bool,
    suppressing_state_lock: bool,
    suppressing_resource_read: bool,
}

impl ScanState {
    /// Returns true when the line belongs to a noisy block and must be dropped.
    ///
    /// Once entered, a block only closes on a line containing `Error:`. A block
    /// that never sees one swallows the rest of the transcript.
    fn suppress(&mut self, line: &str) -> bool {
        if line.contains(STATE_LOCK_MARKER) {
            self.suppressing_state_lock = true;
            return true;
        }
        if self.suppressing_state_lock {
            if line.contains(ERROR_MARKER) {
                self.suppressing_state_lock = false;
            }
            return true;
        }

        if line.contains(RESOURCE_READ_MARKER) {
            self.suppressing_resource_read = true;
            return true;
        }
        if self.suppressing_resource_read {
            if line.contains(ERROR_MARKER) {
                self.suppressing_resource_read = false;
            }
            return true;
        }

        false
    }
}

/// Extracts the plan body from a raw transcript, at most `max_length` bytes.
///
/// Returns an empty string when no start marker is found.
pub fn extract_plan_body(raw: &str, max_length: usize) -> String {
    let cleaned = strip_ansi(raw);
    let mut state = ScanState::default();
    let mut body = String::new();

    for line in cleaned.split('\n') {
        if state.suppress(line) {
            continue;
        }

        if !state.started {
            if PLAN_START_MARKERS.iter().any(|marker| line.contains(marker)) {
                state.started = true;
                push_line(&mut body, line);
            }
            continue;
        }

        if line.trim_start().starts_with(SUMMARY_PREFIX) {
            push_line(&mut body, line);
            break;
        }

        push_line(&mut body, &reformat_diff_line(line));
    }

    truncate_to(&mut body, max_length);
    body
}

fn push_line(body: &mut String, line: &str) {
    body.push_str(line);
    body.push('\n');
}

/// Moves a `-`, `+` or `~` marker to column 0 and pads it with one space
/// fewer than the original indentation. `~` becomes `!` so it renders as a
/// change in a `diff` block.
///
/// `"    ~ attr = 1"` becomes `"!   attr = 1"`.
fn reformat_diff_line(line: &str) -> String {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let marker = match trimmed.chars().next() {
        Some('~') => '!',
        Some(c @ ('-' | '+')) => c,
        _ => return line.to_string(),
    };

    let rest = &trimmed[1..];
    let indent = line.len() - trimmed.len();
    let mut out = String::with_capacity(line.len());
    out.push(marker);

    if indent == 0 {
        out.push_str(rest);
        return out;
    }

    out.push_str(&" ".repeat(indent - 1));
    out.push_str(rest.strip_prefix(' ').unwrap_or(rest));
    out
}

/// Cuts `text` down to at most `max_length` bytes without splitting a
/// UTF-8 sequence.
pub fn truncate_to(text: &mut String, max_length: usize) {
    if text.len() <= max_length {
        return;
    }
    let mut cut = max_length;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
