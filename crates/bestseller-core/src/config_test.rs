use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.domain, "shopee.co.th");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 20);
    assert_eq!(cfg.retry_delay_ms, 800);
    assert_eq!(cfg.page_delay_ms, 800);
    assert_eq!(cfg.shop_lookup_delay_ms, 200);
    assert_eq!(cfg.max_attempts, 6);
}

#[test]
fn build_app_config_reads_domain_override() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_DOMAIN", "shopee.sg");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.domain, "shopee.sg");
    assert_eq!(cfg.base_url(), "https://shopee.sg");
    assert!(cfg.is_known_domain());
}

#[test]
fn build_app_config_strips_scheme_and_path_from_domain() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_DOMAIN", "https://Shopee.VN/some/path");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.domain, "shopee.vn");
}

#[test]
fn build_app_config_accepts_unknown_domain() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_DOMAIN", "marketplace.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.domain, "marketplace.example.com");
    assert!(!cfg.is_known_domain());
}

#[test]
fn build_app_config_rejects_empty_domain() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_DOMAIN", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BESTSELLER_DOMAIN"),
        "expected InvalidEnvVar(BESTSELLER_DOMAIN), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_delay_overrides() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_RETRY_DELAY_MS", "1500");
    map.insert("BESTSELLER_PAGE_DELAY_MS", "0");
    map.insert("BESTSELLER_SHOP_LOOKUP_DELAY_MS", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_delay_ms, 1500);
    assert_eq!(cfg.page_delay_ms, 0);
    assert_eq!(cfg.shop_lookup_delay_ms, 50);
}

#[test]
fn build_app_config_rejects_invalid_retry_delay() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_RETRY_DELAY_MS", "0.8s");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BESTSELLER_RETRY_DELAY_MS"),
        "expected InvalidEnvVar(BESTSELLER_RETRY_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BESTSELLER_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BESTSELLER_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_attempts() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BESTSELLER_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(BESTSELLER_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_user_agent_and_language() {
    let mut map = HashMap::new();
    map.insert("BESTSELLER_USER_AGENT", "custom-agent/2.0");
    map.insert("BESTSELLER_ACCEPT_LANGUAGE", "en-US,en;q=0.9");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
    assert_eq!(cfg.accept_language, "en-US,en;q=0.9");
}

#[test]
fn parse_domain_keeps_bare_host() {
    assert_eq!(parse_domain("shopee.com.my").unwrap(), "shopee.com.my");
}
