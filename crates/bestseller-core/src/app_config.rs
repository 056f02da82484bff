/// Regional storefronts the search API is known to answer on.
///
/// Any other host is still accepted by the loader, with a warning.
pub const KNOWN_DOMAINS: &[&str] = &[
    "shopee.co.th",
    "shopee.sg",
    "shopee.vn",
    "shopee.co.id",
    "shopee.com.my",
    "shopee.ph",
    "shopee.tw",
    "shopee.com.br",
    "shopee.com.mx",
    "shopee.cl",
    "shopee.com.co",
];

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Storefront host, e.g. `"shopee.co.th"`. Requests go to `https://{domain}`.
    pub domain: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    /// Base delay for the retry backoff schedule.
    pub retry_delay_ms: u64,
    /// Pause after every fetched search page.
    pub page_delay_ms: u64,
    /// Pause between shop-name lookups.
    pub shop_lookup_delay_ms: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
}

impl AppConfig {
    /// Base URL for every API call and product link on the configured storefront.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain)
    }

    #[must_use]
    pub fn is_known_domain(&self) -> bool {
        KNOWN_DOMAINS.contains(&self.domain.as_str())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            domain: "shopee.co.th".to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "th-TH,th;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            retry_delay_ms: 800,
            page_delay_ms: 800,
            shop_lookup_delay_ms: 200,
            max_attempts: 6,
        }
    }
}
