//! Centralized configuration (environment variables + defaults).

use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite-preview-09-2025";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:millet_marketplace.db?mode=rwc";
pub const DEFAULT_SERVICE_API_KEY: &str = "default-insecure-key";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 10;

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Credential pool for the generative-language provider.
///
/// `GEMINI_API_KEYS` is a comma-separated list; `GEMINI_API_KEY` is only consulted
/// when the list yields nothing. An empty result is a valid "unconfigured" state.
pub fn gemini_api_keys() -> Vec<String> {
    parse_key_list(
        std::env::var("GEMINI_API_KEYS").ok().as_deref(),
        std::env::var("GEMINI_API_KEY").ok().as_deref(),
    )
}

/// Splits a comma-separated key list, trimming entries and dropping empties.
pub fn parse_key_list(list: Option<&str>, single: Option<&str>) -> Vec<String> {
    let keys: Vec<String> = list
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if !keys.is_empty() {
        return keys;
    }
    single
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| vec![k.to_string()])
        .unwrap_or_default()
}

pub fn gemini_model() -> String {
    var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

pub fn gemini_base_url() -> String {
    var("GEMINI_BASE_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Upper bound for a single provider attempt.
pub fn attempt_timeout() -> Duration {
    Duration::from_secs(parse_secs(
        var("GEMINI_ATTEMPT_TIMEOUT_SECS").as_deref(),
        DEFAULT_ATTEMPT_TIMEOUT_SECS,
    ))
}

fn parse_secs(raw: Option<&str>, default: u64) -> u64 {
    match raw {
        None => default,
        Some(v) => match v.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!("Invalid GEMINI_ATTEMPT_TIMEOUT_SECS value {v:?}, using default: {default}");
                default
            }
        },
    }
}

/// Catalog database URL. Defaults to a local SQLite file created on first use.
pub fn database_url() -> String {
    var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Shared secret expected in the `X-API-Key` header.
pub fn service_api_key() -> String {
    var("SERVICE_API_KEY").unwrap_or_else(|| {
        warn!("SERVICE_API_KEY not set, using the insecure default key");
        DEFAULT_SERVICE_API_KEY.to_string()
    })
}

pub fn bind_addr() -> String {
    var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_list_is_trimmed_and_filtered() {
        let keys = parse_key_list(Some(" a , ,b,, c "), Some("single"));
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn single_key_is_used_when_list_is_empty() {
        assert_eq!(parse_key_list(Some(" , "), Some(" solo ")), vec!["solo"]);
        assert_eq!(parse_key_list(None, Some("solo")), vec!["solo"]);
    }

    #[test]
    fn no_keys_means_unconfigured() {
        assert!(parse_key_list(None, None).is_empty());
        assert!(parse_key_list(Some(""), Some("  ")).is_empty());
    }

    #[test]
    fn timeout_falls_back_on_garbage() {
        assert_eq!(parse_secs(None, 10), 10);
        assert_eq!(parse_secs(Some("3"), 10), 3);
        assert_eq!(parse_secs(Some("0"), 10), 10);
        assert_eq!(parse_secs(Some("soon"), 10), 10);
    }
}
