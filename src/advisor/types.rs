//! Advisor types — backend-neutral value types and errors.
//!
//! The advisor backend answers card questions ("ask") and proposes follow-up
//! questions ("suggest"). Everything the engine knows about it goes through
//! the [`AdvisorApi`] trait so tests can substitute mocks.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by advisor backend operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required base URL environment variable is not set.
    #[error("missing base URL: env var {var} not set")]
    MissingBaseUrl { var: String },

    /// The HTTP request to the advisor backend failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The advisor backend returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The advisor backend response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The advisor backend answered with an `error` field in the body.
    #[error("upstream error: {message}")]
    Upstream { message: String, details: Option<String> },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::frame::ErrorCode for AdvisorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingBaseUrl { .. } => "E_MISSING_BASE_URL",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::Upstream { .. } => "E_UPSTREAM",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// VALUE TYPES
// =============================================================================

/// One recommended credit card. Immutable value; identity for matching and
/// de-duplication is the lowercase-normalized card name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub credit_card_name: String,
    pub reason: String,
    pub apply_url: String,
}

impl Recommendation {
    /// Matching key: lowercase card name.
    #[must_use]
    pub fn matching_key(&self) -> String {
        self.credit_card_name.to_lowercase()
    }
}

/// One `(role, text)` pair of the conversation history sent upstream.
/// Recommendations are never included in what is sent upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub text: String,
}

/// Parsed reply from an ask call.
#[derive(Debug, Clone, Default)]
pub struct AskReply {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

// =============================================================================
// ADVISOR API TRAIT
// =============================================================================

/// Backend-neutral async trait for the ask/suggest collaborators.
/// Enables mocking in tests.
#[async_trait::async_trait]
pub trait AdvisorApi: Send + Sync {
    /// Answer a card question given the prior conversation.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] if the request fails, the backend
    /// reports an error, or the response body is not valid JSON.
    async fn ask(&self, question: &str, history: &[HistoryEntry]) -> Result<AskReply, AdvisorError>;

    /// Propose follow-up questions for the turn that just completed.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] on transport or parse failure. Callers
    /// treat this as non-fatal.
    async fn suggest(
        &self,
        question: &str,
        history: &[HistoryEntry],
        recommendations: &[Recommendation],
        summary: Option<&str>,
    ) -> Result<Vec<String>, AdvisorError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
