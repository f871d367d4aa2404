//! Splitting comma-joined tag strings.

/// Split a comma-joined string into trimmed, non-empty tags in source order.
///
/// Duplicates are kept.
pub fn split_tags(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|tag| !tag.is_empty())
    .map(str::to_string)
    .collect()
}
