use super::*;
use crate::frame::ErrorCode;

// =========================================================================
// Recommendation
// =========================================================================

#[test]
fn matching_key_is_lowercased_name() {
    let rec = Recommendation {
        credit_card_name: "Chase Sapphire Preferred".into(),
        reason: "strong travel rewards".into(),
        apply_url: "https://example.test/sapphire".into(),
    };
    assert_eq!(rec.matching_key(), "chase sapphire preferred");
}

#[test]
fn recommendation_serde_round_trip() {
    let rec = Recommendation {
        credit_card_name: "Card A".into(),
        reason: "no annual fee".into(),
        apply_url: "https://example.test/a".into(),
    };
    let json = serde_json::to_string(&rec).unwrap();
    let restored: Recommendation = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, rec);
}

#[test]
fn recommendation_equality_is_field_sensitive() {
    let a = Recommendation {
        credit_card_name: "Card A".into(),
        reason: "no annual fee".into(),
        apply_url: "https://example.test/a".into(),
    };
    let mut b = a.clone();
    assert_eq!(a, b);
    b.reason = "trimmed".into();
    assert_ne!(a, b);
}

// =========================================================================
// AdvisorError codes
// =========================================================================

#[test]
fn error_codes_are_grepable() {
    let err = AdvisorError::ApiResponse { status: 502, body: "bad gateway".into() };
    assert_eq!(err.error_code(), "E_API_RESPONSE");

    let err = AdvisorError::Upstream { message: "model unavailable".into(), details: None };
    assert_eq!(err.error_code(), "E_UPSTREAM");
    assert!(err.to_string().contains("model unavailable"));
}

#[test]
fn transport_and_server_errors_are_retryable() {
    assert!(AdvisorError::ApiRequest("timed out".into()).retryable());
    assert!(AdvisorError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(AdvisorError::ApiResponse { status: 503, body: String::new() }.retryable());
    assert!(!AdvisorError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!AdvisorError::ApiParse("bad json".into()).retryable());
    assert!(!AdvisorError::Upstream { message: "nope".into(), details: None }.retryable());
}
