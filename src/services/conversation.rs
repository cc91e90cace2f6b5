//! Conversation store — ordered turn history plus derived view state.
//!
//! DESIGN
//! ======
//! The store owns the turn list exclusively. It is append-only except for
//! one in-place mutation: attaching the answer (`summary` +
//! `recommendations`) to the most recently appended user turn. An assistant
//! turn exists in the history only if its answer carried at least one
//! recommendation; prose-only answers live on the user turn so the history
//! pane always shows a question together with its own answer and the
//! recommendation pane never flickers on prose-only turns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advisor::types::{HistoryEntry, Recommendation};

/// View title until a turn supplies one.
pub const DEFAULT_TITLE: &str = "Card Recommendations";

/// Seed suggestions so a fresh session has one-click entry points.
pub const STARTER_SUGGESTIONS: [&str; 3] = [
    "What is the best card for travel rewards?",
    "Which cards have no annual fee?",
    "What should my first credit card be?",
];

// =============================================================================
// TURN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry in the conversation.
///
/// A user turn carries the question as `text`; once its answer arrives the
/// merged prose lands in `summary` and the card list in `recommendations`.
/// An assistant turn carries only `recommendations` (its `text` is empty),
/// except for the synthetic error turn which carries prose and no cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
}

impl Turn {
    fn user(text: String) -> Self {
        Self { id: Uuid::new_v4(), role: Role::User, text, summary: None, recommendations: Vec::new() }
    }

    fn assistant(text: String, recommendations: Vec<Recommendation>) -> Self {
        Self { id: Uuid::new_v4(), role: Role::Assistant, text, summary: None, recommendations }
    }
}

// =============================================================================
// VIEW STATE
// =============================================================================

/// Derived view state, owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub title: String,
    /// Cards of the most recent recommendation-bearing assistant turn.
    /// Retained, not cleared, across prose-only and failed turns.
    pub active_recommendations: Vec<Recommendation>,
    pub suggestions: Vec<String>,
    pub busy: bool,
}

impl ViewState {
    fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            active_recommendations: Vec::new(),
            suggestions: STARTER_SUGGESTIONS.iter().map(ToString::to_string).collect(),
            busy: false,
        }
    }
}

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    pub turns: Vec<Turn>,
    pub view: ViewState,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self { turns: Vec::new(), view: ViewState::new() }
    }

    /// Append a user turn carrying the question. The answer is attached
    /// later via [`Conversation::attach_answer`].
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text.into()));
    }

    /// Attach the answer to the most recently appended user turn, in place.
    pub fn attach_answer(&mut self, summary: String, recommendations: Vec<Recommendation>) {
        if let Some(turn) = self
            .turns
            .last_mut()
            .filter(|t| t.role == Role::User)
        {
            turn.summary = Some(summary);
            turn.recommendations = recommendations;
        }
    }

    /// Append an assistant turn carrying a non-empty card batch. The right
    /// pane shows only structured cards, so its `text` is always empty.
    /// Replaces the active recommendation set.
    pub fn push_assistant(&mut self, recommendations: Vec<Recommendation>) {
        self.view.active_recommendations = recommendations.clone();
        self.turns.push(Turn::assistant(String::new(), recommendations));
    }

    /// Append a synthetic assistant turn carrying an error message. Leaves
    /// the active recommendation set untouched.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.turns.push(Turn::assistant(message.into(), Vec::new()));
    }

    /// The `(role, text)` history sent upstream, excluding the in-flight
    /// question turn. Recommendations are never included.
    #[must_use]
    pub fn prior_history(&self) -> Vec<HistoryEntry> {
        let end = self.turns.len().saturating_sub(1);
        self.turns[..end]
            .iter()
            .map(|t| HistoryEntry { role: t.role.as_str().to_string(), text: t.text.clone() })
            .collect()
    }

    /// Capture the fields the view synchronizer compares across mutations.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let latest_user_index = self.turns.iter().rposition(|t| t.role == Role::User);
        let latest_question_answered = latest_user_index.is_some_and(|i| {
            self.turns[i].summary.is_some() || i + 1 < self.turns.len()
        });
        Snapshot {
            turn_count: self.turns.len(),
            newest_role: self.turns.last().map(|t| t.role),
            busy: self.view.busy,
            active_recommendations: self.view.active_recommendations.clone(),
            latest_user_index,
            latest_question_answered,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Point-in-time view of the store for the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub turn_count: usize,
    pub newest_role: Option<Role>,
    pub busy: bool,
    pub active_recommendations: Vec<Recommendation>,
    /// Index of the most recent user turn, if any.
    pub latest_user_index: Option<usize>,
    /// The most recent question has a summary or a following assistant turn.
    pub latest_question_answered: bool,
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
