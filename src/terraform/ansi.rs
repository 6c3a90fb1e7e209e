use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences: ESC `[`, zero or more digit/semicolon parameters, one letter.
static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("invalid ANSI regex"));

/// Removes terminal color and style escape sequences, leaving every other
/// character untouched.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}
