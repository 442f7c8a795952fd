//! Name Normalizer
//!
//! Maps a display name to the canonical pattern used as part of a group key.
//! UUIDs are substituted before plain numbers; running the digit pass first
//! would split a UUID into a mix of number placeholders and hex fragments.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::normalize::{NUMBER_PLACEHOLDER, TRAILING_SEPARATORS, UUID_PLACEHOLDER};

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid uuid regex")
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid number regex"));

/// Canonical grouping pattern for a display name
///
/// - UUIDs become `<UUID>`
/// - every remaining maximal digit run becomes `<N>`
/// - trailing `<N>` counters (and the separators before them) are dropped while
///   other text remains, so `"Login"`, `"Login 2"` and `"Login-07"` share a pattern
pub fn normalize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let without_uuids = UUID_REGEX.replace_all(name, UUID_PLACEHOLDER);
    let without_numbers = NUMBER_REGEX.replace_all(&without_uuids, NUMBER_PLACEHOLDER);
    strip_trailing_counters(without_numbers.trim()).to_string()
}

fn strip_trailing_counters(mut pattern: &str) -> &str {
    while let Some(head) = pattern.strip_suffix(NUMBER_PLACEHOLDER) {
        let head = head.trim_end_matches(TRAILING_SEPARATORS);
        if head.trim().is_empty() {
            break;
        }
        pattern = head;
    }
    pattern
}
