//! Recommendation reference merger.
//!
//! DESIGN
//! ======
//! The upstream answer text and the structured card list must not
//! contradict each other: every recommended card appears in the displayed
//! text exactly once, as a clickable reference to its apply URL. Two
//! passes:
//!
//! 1. Rewrite existing markdown links `[name](anyUrl)` whose text matches a
//!    card name (case-insensitive) to point at that card's `apply_url`;
//!    the upstream answer sometimes names a card with a wrong or missing
//!    link.
//! 2. Any card whose name does not appear anywhere in the rewritten text is
//!    appended as a bullet line.
//!
//! Re-merging already-merged output is idempotent: names present in prose
//! or in appended bullets are found by the scan and not appended again.

use regex::Regex;

use crate::advisor::types::Recommendation;

/// Merge a card list into a free-text answer.
///
/// An empty `recommendations` list returns `summary` unchanged.
#[must_use]
pub fn merge_recommendations(summary: &str, recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return summary.to_string();
    }

    let mut text = summary.to_string();

    // Pass 1: retarget existing links that already name a card.
    for rec in recommendations {
        let pattern = format!(r"(?i)\[({})\]\([^)]*\)", regex::escape(&rec.credit_card_name));
        if let Ok(re) = Regex::new(&pattern) {
            text = re
                .replace_all(&text, |caps: &regex::Captures<'_>| {
                    format!("[{}]({})", &caps[1], rec.apply_url)
                })
                .into_owned();
        }
    }

    // Pass 2: append a bullet for every card the text never mentions.
    let haystack = text.to_lowercase();
    let bullets: Vec<String> = recommendations
        .iter()
        .filter(|rec| !haystack.contains(&rec.matching_key()))
        .map(|rec| format!("• **[{}]({})** - {}", rec.credit_card_name, rec.apply_url, rec.reason))
        .collect();

    if bullets.is_empty() {
        return text;
    }

    let appended = bullets.join("\n\n");
    if text.trim().is_empty() {
        appended
    } else {
        format!("{text}\n\n{appended}")
    }
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
