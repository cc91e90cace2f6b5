//! View synchronizer — scroll and animation intents for the two panes.
//!
//! DESIGN
//! ======
//! The history pane and the recommendation pane scroll independently, and
//! programmatic repositioning must never fight the user's own scrolling.
//! The synchronizer is invoked with (previous snapshot, next snapshot) on
//! every store mutation and emits an intent list; it is never coupled to
//! the store through subscription. It owns three pieces of state:
//!
//! - the fingerprint of the active recommendation set (full structural
//!   equality, order- and field-sensitive, matching the source system),
//! - whether the user has scrolled the history pane since the current
//!   question was asked,
//! - the last observed turn count.
//!
//! Intents are recomputed from state on every mutation; observing the same
//! transition twice is a no-op.

use serde::Serialize;

use crate::advisor::types::Recommendation;
use crate::services::conversation::{Role, Snapshot};

/// History-pane offset beyond which auto-scroll is treated as overridden.
pub const HISTORY_SCROLL_THRESHOLD_PX: f64 = 10.0;

/// Fixed duration of the recommendation-pane highlight animation.
pub const HIGHLIGHT_DURATION_MS: u64 = 2000;

/// Delay before the history-pane scroll target is computed, letting layout
/// settle first.
pub const SCROLL_SETTLE_DELAY_MS: u64 = 100;

// =============================================================================
// INTENTS
// =============================================================================

/// One fire-and-forget instruction for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewIntent {
    /// Reset the recommendation pane's scroll position to top.
    ResetRecommendationScroll,
    /// Run the highlight animation on the recommendation pane, then clear
    /// it after `duration_ms`.
    HighlightRecommendations { duration_ms: u64 },
    /// Scroll the history pane so the turn at `turn_index` sits at the top
    /// of its viewport, after `settle_delay_ms`.
    ScrollHistoryToQuestion { turn_index: usize, settle_delay_ms: u64 },
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

#[derive(Debug)]
pub struct ViewSynchronizer {
    last_fingerprint: Vec<Recommendation>,
    user_scrolled_history: bool,
    last_turn_count: usize,
}

impl ViewSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self { last_fingerprint: Vec::new(), user_scrolled_history: false, last_turn_count: 0 }
    }

    /// Raw scroll-offset observation from the history pane. Crossing the
    /// threshold suppresses auto-scroll until the next question starts.
    pub fn note_history_scroll(&mut self, offset: f64) {
        if offset > HISTORY_SCROLL_THRESHOLD_PX {
            self.user_scrolled_history = true;
        }
    }

    #[must_use]
    pub fn user_scrolled_history(&self) -> bool {
        self.user_scrolled_history
    }

    /// Compute intents for one store transition.
    pub fn observe(&mut self, prev: &Snapshot, next: &Snapshot) -> Vec<ViewIntent> {
        let mut intents = Vec::new();
        let mut reset_recommendation_pane = false;

        // New question: park the card pane at top and re-arm auto-scroll
        // for the upcoming answer.
        if next.turn_count > self.last_turn_count && next.newest_role == Some(Role::User) {
            reset_recommendation_pane = true;
            self.user_scrolled_history = false;
        }

        // Active card set changed. An empty new set clears the fingerprint
        // without animating.
        if next.active_recommendations != self.last_fingerprint {
            if next.active_recommendations.is_empty() {
                self.last_fingerprint.clear();
            } else {
                reset_recommendation_pane = true;
                intents.push(ViewIntent::HighlightRecommendations { duration_ms: HIGHLIGHT_DURATION_MS });
                self.last_fingerprint = next.active_recommendations.clone();
            }
        }

        if reset_recommendation_pane {
            intents.insert(0, ViewIntent::ResetRecommendationScroll);
        }

        // Answer arrived for the newest question: bring that question to
        // the top of the history pane, unless the user scrolled away since
        // asking it. The prev comparison keeps duplicate observations of
        // the same settled state from re-emitting the scroll.
        if next.latest_question_answered
            && !next.busy
            && (prev.busy || !prev.latest_question_answered)
            && !self.user_scrolled_history
        {
            if let Some(turn_index) = next.latest_user_index {
                intents.push(ViewIntent::ScrollHistoryToQuestion {
                    turn_index,
                    settle_delay_ms: SCROLL_SETTLE_DELAY_MS,
                });
            }
        }

        self.last_turn_count = next.turn_count;
        intents
    }
}

impl Default for ViewSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
