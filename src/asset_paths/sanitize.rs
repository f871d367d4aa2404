use std::sync::OnceLock;

use regex::Regex;

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn non_slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("invalid slug regex"))
}

/// Strip every whitespace character from an image filename.
///
/// Leading and trailing whitespace is trimmed and internal runs are removed outright rather
/// than collapsed, since legitimate asset filenames never contain spaces. Empty input yields an
/// empty string.
pub fn sanitize_filename(value: &str) -> String {
    whitespace_pattern()
        .replace_all(value.trim(), "")
        .into_owned()
}

/// Reduce a display name to lowercase ASCII letters and digits.
pub fn display_name_slug(name: &str) -> String {
    non_slug_pattern()
        .replace_all(&name.to_lowercase(), "")
        .into_owned()
}
