use super::*;

fn rec(name: &str) -> Recommendation {
    Recommendation {
        credit_card_name: name.into(),
        reason: format!("{name} has great rewards"),
        apply_url: format!("https://example.test/{}", name.to_lowercase().replace(' ', "-")),
    }
}

// =========================================================================
// Defaults
// =========================================================================

#[test]
fn new_conversation_defaults() {
    let convo = Conversation::new();
    assert!(convo.turns.is_empty());
    assert_eq!(convo.view.title, DEFAULT_TITLE);
    assert!(convo.view.active_recommendations.is_empty());
    assert_eq!(convo.view.suggestions.len(), STARTER_SUGGESTIONS.len());
    assert!(!convo.view.busy);
}

// =========================================================================
// Mutations
// =========================================================================

#[test]
fn push_user_appends_unanswered_turn() {
    let mut convo = Conversation::new();
    convo.push_user("Best card for travel?");

    assert_eq!(convo.turns.len(), 1);
    let turn = &convo.turns[0];
    assert_eq!(turn.role, Role::User);
    assert_eq!(turn.text, "Best card for travel?");
    assert!(turn.summary.is_none());
    assert!(turn.recommendations.is_empty());
}

#[test]
fn attach_answer_updates_latest_user_turn_in_place() {
    let mut convo = Conversation::new();
    convo.push_user("Best card for travel?");
    convo.attach_answer("I recommend Card A.".into(), vec![rec("Card A")]);

    let turn = &convo.turns[0];
    assert_eq!(turn.summary.as_deref(), Some("I recommend Card A."));
    assert_eq!(turn.recommendations.len(), 1);
    assert_eq!(convo.turns.len(), 1);
}

#[test]
fn attach_answer_without_user_turn_is_a_no_op() {
    let mut convo = Conversation::new();
    convo.attach_answer("orphan".into(), vec![]);
    assert!(convo.turns.is_empty());
}

#[test]
fn push_assistant_carries_cards_and_replaces_active_set() {
    let mut convo = Conversation::new();
    convo.push_user("q1");
    convo.push_assistant(vec![rec("Card A"), rec("Card B")]);

    let turn = convo.turns.last().unwrap();
    assert_eq!(turn.role, Role::Assistant);
    assert!(turn.text.is_empty());
    assert_eq!(turn.recommendations.len(), 2);
    assert_eq!(convo.view.active_recommendations.len(), 2);

    convo.push_user("q2");
    convo.push_assistant(vec![rec("Card C")]);
    assert_eq!(convo.view.active_recommendations, vec![rec("Card C")]);
}

#[test]
fn push_error_keeps_active_recommendations() {
    let mut convo = Conversation::new();
    convo.push_user("q1");
    convo.push_assistant(vec![rec("Card A")]);
    convo.push_user("q2");
    convo.push_error("something went wrong");

    let turn = convo.turns.last().unwrap();
    assert_eq!(turn.role, Role::Assistant);
    assert_eq!(turn.text, "something went wrong");
    assert!(turn.recommendations.is_empty());
    // The right pane keeps showing the last good card set.
    assert_eq!(convo.view.active_recommendations, vec![rec("Card A")]);
}

// =========================================================================
// Upstream history
// =========================================================================

#[test]
fn prior_history_excludes_in_flight_question() {
    let mut convo = Conversation::new();
    convo.push_user("q1");
    convo.push_assistant(vec![rec("Card A")]);
    convo.push_user("q2");

    let history = convo.prior_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, "user");
    assert_eq!(history[0].text, "q1");
    assert_eq!(history[1].role, "assistant");
    assert_eq!(history[1].text, "");
}

#[test]
fn prior_history_of_first_question_is_empty() {
    let mut convo = Conversation::new();
    convo.push_user("q1");
    assert!(convo.prior_history().is_empty());
}

// =========================================================================
// Snapshot
// =========================================================================

#[test]
fn snapshot_tracks_latest_question_state() {
    let mut convo = Conversation::new();
    let snap = convo.snapshot();
    assert_eq!(snap.turn_count, 0);
    assert!(snap.latest_user_index.is_none());
    assert!(!snap.latest_question_answered);

    convo.push_user("q1");
    convo.view.busy = true;
    let snap = convo.snapshot();
    assert_eq!(snap.turn_count, 1);
    assert_eq!(snap.newest_role, Some(Role::User));
    assert!(snap.busy);
    assert_eq!(snap.latest_user_index, Some(0));
    assert!(!snap.latest_question_answered);

    // Prose-only answer: summary attached, no assistant turn.
    convo.attach_answer("prose".into(), vec![]);
    convo.view.busy = false;
    let snap = convo.snapshot();
    assert!(snap.latest_question_answered);

    // Recommendation answer: assistant turn follows the question.
    convo.push_user("q2");
    convo.push_assistant(vec![rec("Card A")]);
    let snap = convo.snapshot();
    assert_eq!(snap.latest_user_index, Some(1));
    assert!(snap.latest_question_answered);
    assert_eq!(snap.active_recommendations, vec![rec("Card A")]);
}

#[test]
fn turn_serialization_omits_absent_answer_fields() {
    let mut convo = Conversation::new();
    convo.push_user("q1");
    let json = serde_json::to_value(&convo.turns[0]).unwrap();
    assert!(json.get("summary").is_none());
    assert!(json.get("recommendations").is_none());
    assert_eq!(json.get("role").and_then(|v| v.as_str()), Some("user"));
}
