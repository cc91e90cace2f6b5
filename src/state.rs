//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only the advisor backend handle: each WebSocket connection owns
//! its conversation session outright, so there is no cross-connection
//! state and nothing survives a disconnect.

use std::sync::Arc;

use crate::advisor::AdvisorApi;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    /// Optional advisor backend. `None` if advisor env vars are not configured.
    pub advisor: Option<Arc<dyn AdvisorApi>>,
}

impl AppState {
    #[must_use]
    pub fn new(advisor: Option<Arc<dyn AdvisorApi>>) -> Self {
        Self { advisor }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    /// Create a test `AppState` with no advisor backend.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None)
    }

    /// Create a test `AppState` with a mock advisor.
    #[must_use]
    pub fn test_app_state_with_advisor(advisor: Arc<dyn AdvisorApi>) -> AppState {
        AppState::new(Some(advisor))
    }
}
