//! Conversation engine services.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the engine logic so the WebSocket route can stay
//! focused on protocol translation: the store holds the turns, the turn
//! processor orchestrates a question/answer cycle against the advisor, the
//! merger reconciles prose with card lists, and the view synchronizer
//! turns store transitions into pane intents.

pub mod conversation;
pub mod merge;
pub mod sync;
pub mod turn;
