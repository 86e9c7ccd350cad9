//! Card number extraction from commit messages and pull request titles.
//!
//! Cards are referenced as `#<digits>`. GitHub's merge commits start with
//! `Merge pull request #<n> from ...`, where `#<n>` is the pull request
//! number rather than a card, so that preamble is removed before matching.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static MERGE_PREAMBLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Merge pull request #[0-9]+ from").unwrap());

static CARD_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([0-9]+)").unwrap());

/// Whether the text is a GitHub merge commit message.
#[must_use]
pub fn announces_merge(text: &str) -> bool {
    MERGE_PREAMBLE.is_match(text)
}

/// All distinct card numbers referenced in `text`, in first-occurrence order.
#[must_use]
pub fn card_numbers(text: &str) -> Vec<String> {
    let stripped = MERGE_PREAMBLE.replace_all(text, "");
    let mut seen = HashSet::new();

    CARD_REFERENCE
        .captures_iter(&stripped)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|number| seen.insert(number.clone()))
        .collect()
}

/// The last card number referenced in `text`.
#[must_use]
pub fn card_number(text: &str) -> Option<String> {
    let stripped = MERGE_PREAMBLE.replace_all(text, "");

    CARD_REFERENCE
        .captures_iter(&stripped)
        .filter_map(|cap| cap.get(1))
        .last()
        .map(|m| m.as_str().to_string())
}
