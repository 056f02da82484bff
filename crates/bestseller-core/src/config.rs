use crate::app_config::{AppConfig, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; missing ones fall back to [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let domain = parse_domain(&or_default("BESTSELLER_DOMAIN", &defaults.domain))?;
    let log_level = or_default("BESTSELLER_LOG_LEVEL", &defaults.log_level);
    let user_agent = or_default("BESTSELLER_USER_AGENT", DEFAULT_USER_AGENT);
    let accept_language = or_default("BESTSELLER_ACCEPT_LANGUAGE", &defaults.accept_language);

    let request_timeout_secs =
        parse_u64("BESTSELLER_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let retry_delay_ms = parse_u64("BESTSELLER_RETRY_DELAY_MS", defaults.retry_delay_ms)?;
    let page_delay_ms = parse_u64("BESTSELLER_PAGE_DELAY_MS", defaults.page_delay_ms)?;
    let shop_lookup_delay_ms = parse_u64(
        "BESTSELLER_SHOP_LOOKUP_DELAY_MS",
        defaults.shop_lookup_delay_ms,
    )?;

    let max_attempts = parse_u64("BESTSELLER_MAX_ATTEMPTS", u64::from(defaults.max_attempts))?;
    let max_attempts = u32::try_from(max_attempts)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| ConfigError::InvalidEnvVar {
            var: "BESTSELLER_MAX_ATTEMPTS".to_string(),
            reason: format!("must be between 1 and {}, got {max_attempts}", u32::MAX),
        })?;

    let config = AppConfig {
        domain,
        log_level,
        request_timeout_secs,
        user_agent,
        accept_language,
        retry_delay_ms,
        page_delay_ms,
        shop_lookup_delay_ms,
        max_attempts,
    };

    if !config.is_known_domain() {
        tracing::warn!(
            domain = %config.domain,
            "BESTSELLER_DOMAIN is not a known storefront; the search API may not answer"
        );
    }

    Ok(config)
}

/// Accepts a bare host, or a URL from which the host is taken.
///
/// `"https://shopee.sg/"` and `"shopee.sg"` both yield `"shopee.sg"`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for an empty host or one containing
/// whitespace.
pub fn parse_domain(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar {
            var: "BESTSELLER_DOMAIN".to_string(),
            reason: format!("\"{raw}\" is not a host name"),
        });
    }
    Ok(host)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
