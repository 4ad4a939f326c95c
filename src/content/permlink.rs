//! Permlink derivation.

use chrono::{DateTime, Utc};

/// Longest permlink the network accepts.
pub const MAX_PERMLINK_LENGTH: usize = 256;

/// Lowercase and replace anything outside `[a-z0-9-]` with `-`.
pub fn sanitize_permlink(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' { c } else { '-' })
        .collect()
}

/// Permlink for a reply to `parent_author/parent_permlink` created at `now`.
///
/// The timestamp suffix is kept whole when the result must be truncated.
pub fn derive_reply_permlink(parent_author: &str, parent_permlink: &str, now: DateTime<Utc>) -> String {
    let suffix = format!("-{}", now.format("%Y%m%dt%H%M%S%3fz"));
    let mut prefix = sanitize_permlink(&format!("re-{}-{}", parent_author, parent_permlink));
    prefix.truncate(MAX_PERMLINK_LENGTH - suffix.len());
    prefix + &suffix
}
