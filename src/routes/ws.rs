//! WebSocket handler — drives the conversation engine for one session.
//!
//! DESIGN
//! ======
//! On upgrade, creates a fresh conversation session and enters a `select!`
//! loop:
//! - Incoming client frames are parsed and dispatched by syscall prefix.
//! - Deferred frames (highlight-clear timers) are forwarded to the client.
//!
//! Inbound frames are processed serially, so two turns never interleave
//! their state mutations; the `busy` guard in the turn processor rejects
//! re-entrant submissions on top of that. The handler drives the engine in
//! phases and observes each store transition with the view synchronizer,
//! so the intents for the question mutation and for the settled answer are
//! computed separately, never through implicit subscription.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade, send `session:connected` with `client_id` and seed view state
//! 2. Client sends frames, dispatch returns item/done/error replies
//! 3. Close, session and conversation are dropped

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::frame::{Data, Frame};
use crate::services::conversation::Conversation;
use crate::services::sync::{ViewIntent, ViewSynchronizer};
use crate::services::turn::{self, SubmitError, TurnEvent};
use crate::state::AppState;

// =============================================================================
// SESSION
// =============================================================================

/// Per-connection session: one conversation, one synchronizer. Lives for
/// the lifetime of the socket; nothing persists past disconnect.
pub(crate) struct Session {
    pub client_id: Uuid,
    pub conversation: Conversation,
    pub sync: ViewSynchronizer,
}

impl Session {
    fn new() -> Self {
        Self { client_id: Uuid::new_v4(), conversation: Conversation::new(), sync: ViewSynchronizer::new() }
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let mut session = Session::new();

    // Channel for frames produced outside the dispatch path (highlight-clear
    // timers).
    let (deferred_tx, mut deferred_rx) = mpsc::channel::<Frame>(16);

    let welcome = Frame::request("session:connected", Data::new())
        .with_data("client_id", session.client_id.to_string())
        .with_data("title", session.conversation.view.title.clone())
        .with_data("suggestions", json!(session.conversation.view.suggestions));
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }

    info!(client_id = %session.client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        let frames = process_inbound_text(&state, &mut session, &deferred_tx, &text).await;
                        for frame in frames {
                            if send_frame(&mut socket, &frame).await.is_err() {
                                return;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = deferred_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(client_id = %session.client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse and process one inbound text frame and return frames for the
/// client. Extracted from the socket loop so tests can exercise dispatch
/// end-to-end without a live socket.
async fn process_inbound_text(
    state: &AppState,
    session: &mut Session,
    deferred_tx: &mpsc::Sender<Frame>,
    text: &str,
) -> Vec<Frame> {
    let req: Frame = match serde_json::from_str(text) {
        Ok(r) => r,
        Err(e) => {
            warn!(client_id = %session.client_id, error = %e, "ws: invalid inbound frame");
            let err = Frame::request("gateway:error", Data::new()).with_data("message", format!("invalid json: {e}"));
            return vec![err];
        }
    };

    info!(client_id = %session.client_id, id = %req.id, syscall = %req.syscall, status = ?req.status, "ws: recv frame");

    match req.prefix() {
        "chat" => handle_chat(state, session, deferred_tx, &req).await,
        "view" => handle_view(session, &req),
        other => vec![req.error(format!("unknown prefix: {other}"))],
    }
}

// =============================================================================
// CHAT HANDLERS
// =============================================================================

async fn handle_chat(
    state: &AppState,
    session: &mut Session,
    deferred_tx: &mpsc::Sender<Frame>,
    req: &Frame,
) -> Vec<Frame> {
    let op = req.syscall.split_once(':').map_or("", |(_, op)| op);

    match op {
        "submit" => handle_submit(state, session, deferred_tx, req).await,
        _ => vec![req.error(format!("unknown chat op: {op}"))],
    }
}

/// One full turn: post the question, run ask/suggest, and report each
/// store transition (with its view intents) as an item frame.
async fn handle_submit(
    state: &AppState,
    session: &mut Session,
    deferred_tx: &mpsc::Sender<Frame>,
    req: &Frame,
) -> Vec<Frame> {
    let Some(advisor) = &state.advisor else {
        return vec![req.error("advisor backend not configured")];
    };

    let question = req
        .data
        .get("text")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();

    let prev = session.conversation.snapshot();
    if let Err(e) = turn::begin_turn(&mut session.conversation, &question) {
        return match e {
            // Whitespace-only input is ignored silently.
            SubmitError::EmptyQuestion => vec![req.done()],
            SubmitError::Busy => vec![req.error_from(&e)],
        };
    }

    info!(client_id = %session.client_id, question_len = question.len(), "chat: question received");

    let mut frames = Vec::new();

    let posted = session.conversation.snapshot();
    let intents = session.sync.observe(&prev, &posted);
    frames.push(req.item(phase_data("question", &session.conversation, &intents)));

    let events = turn::complete_turn(&mut session.conversation, advisor.as_ref(), &question).await;

    let settled = session.conversation.snapshot();
    let intents = session.sync.observe(&posted, &settled);
    schedule_highlight_clear(deferred_tx, &intents);
    frames.push(req.item(phase_data("answer", &session.conversation, &intents)));

    if events.contains(&TurnEvent::SuggestionsUpdated) {
        let mut data = Data::new();
        data.insert("phase".into(), json!("suggestions"));
        data.insert("suggestions".into(), json!(session.conversation.view.suggestions));
        frames.push(req.item(data));
    }

    frames.push(req.done());
    frames
}

// =============================================================================
// VIEW HANDLERS
// =============================================================================

/// Raw scroll-offset observations. Only the history pane feeds the
/// synchronizer; the engine never reacts to recommendation-pane scrolling.
fn handle_view(session: &mut Session, req: &Frame) -> Vec<Frame> {
    let op = req.syscall.split_once(':').map_or("", |(_, op)| op);

    match op {
        "scrolled" => {
            let pane = req.data.get("pane").and_then(|v| v.as_str()).unwrap_or("");
            let offset = req
                .data
                .get("offset")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            if pane == "history" {
                session.sync.note_history_scroll(offset);
            }
            vec![req.done()]
        }
        _ => vec![req.error(format!("unknown view op: {op}"))],
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn phase_data(phase: &str, conversation: &Conversation, intents: &[ViewIntent]) -> Data {
    let mut data = Data::new();
    data.insert("phase".into(), json!(phase));
    data.insert("state".into(), json!(conversation));
    data.insert("intents".into(), json!(intents));
    data
}

/// For every highlight intent, spawn a fire-and-forget timer that clears
/// the animation client-side after its fixed duration.
fn schedule_highlight_clear(deferred_tx: &mpsc::Sender<Frame>, intents: &[ViewIntent]) {
    for intent in intents {
        if let ViewIntent::HighlightRecommendations { duration_ms } = intent {
            let tx = deferred_tx.clone();
            let duration = Duration::from_millis(*duration_ms);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                let frame = Frame::request("view:highlight", Data::new()).with_data("active", false);
                let _ = tx.send(frame).await;
            });
        }
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    if frame.status == crate::frame::Status::Error {
        let code = frame
            .data
            .get("code")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        let message = frame
            .data
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        warn!(id = %frame.id, syscall = %frame.syscall, code, message, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
