//! Turn processor — orchestrates one question/answer cycle.
//!
//! DESIGN
//! ======
//! A turn runs in two phases so the driver can observe each store mutation:
//!
//! 1. [`begin_turn`] validates the submission (no-op and re-entrancy
//!    guards), appends the user turn, and raises `busy`.
//! 2. [`complete_turn`] calls the advisor's ask operation, merges the
//!    answer into the question turn, appends an assistant turn only when
//!    the answer carried recommendations, then calls suggest. It returns
//!    explicit [`TurnEvent`] diffs and clears `busy` on every exit path,
//!    so the input surface is never left locked.
//!
//! Ordering guarantee: the ask result is fully applied before suggest is
//! issued, and both complete (or fail) before `busy` clears. A suggest
//! failure is isolated: the applied ask result stands and the prior
//! suggestion list is retained.

use tracing::{info, warn};

use crate::advisor::types::AdvisorApi;
use crate::services::conversation::Conversation;
use crate::services::merge::merge_recommendations;

/// Leading marker of the synthetic error turn's text.
pub const ANSWER_ERROR_PREFIX: &str = "⚠️";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A submission is already in flight; new submissions are rejected
    /// outright rather than racing with it.
    #[error("a question is already in flight")]
    Busy,
    /// Empty or whitespace-only question text. Ignored silently.
    #[error("question text is empty")]
    EmptyQuestion,
}

impl crate::frame::ErrorCode for SubmitError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy => "E_BUSY",
            Self::EmptyQuestion => "E_EMPTY_QUESTION",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// State diff produced by [`complete_turn`], in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// The ask result was merged into the question turn (and an assistant
    /// turn appended when `recommended > 0`).
    AnswerApplied { recommended: usize },
    /// The ask call failed; a synthetic error turn carries `message`.
    TurnFailed { message: String },
    /// The suggest call succeeded and replaced the suggestion list.
    SuggestionsUpdated,
}

// =============================================================================
// PHASE 1 — SUBMIT
// =============================================================================

/// Validate a submission and post the question turn.
///
/// Typed input and one-click suggested questions share this path.
///
/// # Errors
///
/// [`SubmitError::EmptyQuestion`] for whitespace-only text,
/// [`SubmitError::Busy`] while a turn is in flight. Neither mutates the
/// conversation.
pub fn begin_turn(conversation: &mut Conversation, question: &str) -> Result<(), SubmitError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::EmptyQuestion);
    }
    if conversation.view.busy {
        return Err(SubmitError::Busy);
    }

    conversation.view.busy = true;
    conversation.push_user(trimmed);
    Ok(())
}

// =============================================================================
// PHASE 2 — COMPLETE
// =============================================================================

/// Run the ask/suggest cycle for the question posted by [`begin_turn`].
///
/// Always clears `busy` before returning.
pub async fn complete_turn(
    conversation: &mut Conversation,
    advisor: &dyn AdvisorApi,
    question: &str,
) -> Vec<TurnEvent> {
    let history = conversation.prior_history();
    let mut events = Vec::new();

    match advisor.ask(question, &history).await {
        Ok(reply) => {
            info!(
                recommended = reply.recommendations.len(),
                has_title = reply.title.is_some(),
                "chat: answer received"
            );

            if let Some(title) = reply.title {
                conversation.view.title = title;
            }

            let summary = reply.summary.unwrap_or_default();
            let recommendations = reply.recommendations;
            let display = merge_recommendations(&summary, &recommendations);
            conversation.attach_answer(display, recommendations.clone());
            if !recommendations.is_empty() {
                conversation.push_assistant(recommendations.clone());
            }
            events.push(TurnEvent::AnswerApplied { recommended: recommendations.len() });

            // Suggest runs after every answered turn, including prose-only
            // turns with zero recommendations.
            let summary_arg = (!summary.is_empty()).then_some(summary.as_str());
            match advisor
                .suggest(question, &history, &recommendations, summary_arg)
                .await
            {
                Ok(suggestions) => {
                    conversation.view.suggestions = suggestions;
                    events.push(TurnEvent::SuggestionsUpdated);
                }
                Err(e) => {
                    // Non-fatal: the prior suggestion list stays.
                    warn!(error = %e, "chat: suggest failed");
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "chat: ask failed");
            let message = format!("{ANSWER_ERROR_PREFIX} Sorry, I couldn't answer that question: {e}");
            conversation.push_error(message.clone());
            events.push(TurnEvent::TurnFailed { message });
        }
    }

    conversation.view.busy = false;
    events
}

#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;
