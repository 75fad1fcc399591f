//! Input validation utilities
//!
//! Provides input validation and normalization functions.

/// Normalize a username for lookup (usernames are case-insensitive)
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}

/// Validate a raw flag tag: lowercase ASCII letters, digits and dashes,
/// neither starting nor ending with a dash.
pub fn is_valid_tag(raw: &str) -> bool {
    !raw.is_empty()
        && !raw.starts_with('-')
        && !raw.ends_with('-')
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
