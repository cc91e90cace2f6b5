use super::*;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Env vars are process-global; serialize the tests that touch them.
fn env_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

unsafe fn clear_advisor_env() {
    unsafe {
        std::env::remove_var("ADVISOR_BASE_URL");
        std::env::remove_var("ADVISOR_API_KEY");
        std::env::remove_var("ADVISOR_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("ADVISOR_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_lock();
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_BASE_URL", "https://advisor.example.test/api/");
    }

    let cfg = AdvisorConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://advisor.example.test/api");
    assert_eq!(cfg.api_key, None);
    assert_eq!(
        cfg.timeouts,
        AdvisorTimeouts {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    );

    unsafe { clear_advisor_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_BASE_URL", "https://advisor.example.test");
        std::env::set_var("ADVISOR_API_KEY", "sk-test");
        std::env::set_var("ADVISOR_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("ADVISOR_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = AdvisorConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://advisor.example.test");
    assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
    assert_eq!(cfg.timeouts, AdvisorTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_advisor_env() };
}

#[test]
fn from_env_missing_base_url_errors() {
    let _guard = env_lock();
    unsafe { clear_advisor_env() };

    let err = AdvisorConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("ADVISOR_BASE_URL"));
}

#[test]
fn from_env_empty_base_url_errors() {
    let _guard = env_lock();
    unsafe {
        clear_advisor_env();
        std::env::set_var("ADVISOR_BASE_URL", "");
    }

    let err = AdvisorConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("empty"));

    unsafe { clear_advisor_env() };
}
