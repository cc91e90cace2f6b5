//! HTTP advisor client.
//!
//! Thin reqwest wrapper for `POST {base}/ask` and `POST {base}/suggest`.
//! Pure parsing in `parse_ask_reply`/`parse_suggest_reply` for testability.
//!
//! Parsing is deliberately lenient: a `recommendations` field that is not a
//! list, or list entries without a usable card name, degrade to "no
//! recommendations" instead of failing the turn.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::config::AdvisorConfig;
use super::types::{AdvisorApi, AdvisorError, AskReply, HistoryEntry, Recommendation};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpAdvisor {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AdvisorError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url, api_key: config.api_key })
    }

    /// Return the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, AdvisorError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AdvisorError::ApiRequest(e.to_string()))?;
        if status != 200 {
            return Err(AdvisorError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AdvisorApi for HttpAdvisor {
    async fn ask(&self, question: &str, history: &[HistoryEntry]) -> Result<AskReply, AdvisorError> {
        let body = AskRequest { question, history };
        let text = self.send_json("/ask", &body).await?;
        parse_ask_reply(&text)
    }

    async fn suggest(
        &self,
        question: &str,
        history: &[HistoryEntry],
        recommendations: &[Recommendation],
        summary: Option<&str>,
    ) -> Result<Vec<String>, AdvisorError> {
        let body = SuggestRequest { question, history, recommendations, summary };
        let text = self.send_json("/suggest", &body).await?;
        parse_suggest_reply(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    history: &'a [HistoryEntry],
}

#[derive(Serialize)]
struct SuggestRequest<'a> {
    question: &'a str,
    history: &'a [HistoryEntry],
    recommendations: &'a [Recommendation],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_ask_reply(json: &str) -> Result<AskReply, AdvisorError> {
    let value: Value = serde_json::from_str(json).map_err(|e| AdvisorError::ApiParse(e.to_string()))?;

    // A present `error` field is a failure regardless of HTTP status.
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        let details = value
            .get("details")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        return Err(AdvisorError::Upstream { message: message.to_string(), details });
    }

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let summary = value
        .get("summary")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let recommendations = parse_recommendations(value.get("recommendations"));

    Ok(AskReply { title, summary, recommendations })
}

/// Lenient recommendation extraction. Anything that is not an array yields
/// an empty list; entries without a non-empty `credit_card_name` are skipped.
fn parse_recommendations(value: Option<&Value>) -> Vec<Recommendation> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let name = item.get("credit_card_name").and_then(Value::as_str)?;
            if name.trim().is_empty() {
                return None;
            }
            Some(Recommendation {
                credit_card_name: name.to_string(),
                reason: item
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                apply_url: item
                    .get("apply_url")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn parse_suggest_reply(json: &str) -> Result<Vec<String>, AdvisorError> {
    let value: Value = serde_json::from_str(json).map_err(|e| AdvisorError::ApiParse(e.to_string()))?;

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        let details = value
            .get("details")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        return Err(AdvisorError::Upstream { message: message.to_string(), details });
    }

    let Some(items) = value.get("suggestions").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(ToString::to_string)
        .collect())
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
