//! Advisor — HTTP backend adapter for the ask/suggest collaborators.
//!
//! DESIGN
//! ======
//! The engine never talks HTTP directly: it holds an `Arc<dyn AdvisorApi>`
//! and the concrete [`http::HttpAdvisor`] is wired in at startup from
//! environment variables. Missing configuration is non-fatal at boot; the
//! chat surface reports it per-request instead.

pub mod config;
pub mod http;
pub mod types;

pub use types::AdvisorApi;

use config::AdvisorConfig;
use http::HttpAdvisor;
use types::AdvisorError;

/// Build an advisor client from environment variables.
///
/// # Errors
///
/// Returns an error if `ADVISOR_BASE_URL` is absent/empty or the HTTP
/// client fails to build.
pub fn from_env() -> Result<HttpAdvisor, AdvisorError> {
    let config = AdvisorConfig::from_env()?;
    HttpAdvisor::new(config)
}
