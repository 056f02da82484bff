//! HTTP client for the marketplace's internal search API.

mod fetch_all;

use std::time::Duration;

use bestseller_core::{AppConfig, QueryDescriptor, StopSignal};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ScraperError;
use crate::query::{search_params, shop_detail_params, SEARCH_PATH, SHOP_DETAIL_PATH};
use crate::rate_limit::{retry_with_backoff, RetryPolicy};
use crate::types::ShopDetailResponse;

/// Tunables for a [`MarketplaceClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
    pub retry: RetryPolicy,
    /// Pause after every fetched search page.
    pub page_delay: Duration,
    /// Pause after every shop-name lookup.
    pub shop_lookup_delay: Duration,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            retry: RetryPolicy::new(
                config.max_attempts,
                Duration::from_millis(config.retry_delay_ms),
            ),
            page_delay: Duration::from_millis(config.page_delay_ms),
            shop_lookup_delay: Duration::from_millis(config.shop_lookup_delay_ms),
        }
    }
}

/// HTTP client for one storefront's `search_items` and `get_shop_detail`
/// endpoints.
///
/// Every request runs through [`retry_with_backoff`]: 429s and transport
/// failures are retried with a linear backoff, and the caller's
/// [`StopSignal`] is checked before each attempt. Requests are strictly
/// sequential; one client belongs to one acquisition run.
pub struct MarketplaceClient {
    pub(super) client: Client,
    /// Scheme + host, no trailing slash, e.g. `"https://shopee.co.th"`.
    pub(super) base_url: String,
    pub(super) retry: RetryPolicy,
    pub(super) page_delay: Duration,
    pub(super) shop_lookup_delay: Duration,
}

impl MarketplaceClient {
    /// Creates a client for the storefront named in `config`.
    ///
    /// # Errors
    ///
    /// See [`MarketplaceClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(&config.base_url(), ClientSettings::from_config(config))
    }

    /// Creates a client against an explicit base URL (a storefront origin, or
    /// a mock server in tests).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse or has
    ///   no host.
    /// - [`ScraperError::InvalidHeader`] if the user agent or accept-language
    ///   is not a valid header value.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn with_base_url(base_url: &str, settings: ClientSettings) -> Result<Self, ScraperError> {
        let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.host_str().is_none() {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL has no host".to_owned(),
            });
        }
        let origin = parsed.origin().ascii_serialization();

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(REFERER, header_value("referer", &format!("{origin}/"))?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value("accept-language", &settings.accept_language)?,
        );
        // Validated here so a bad value fails construction, not every request.
        header_value("user-agent", &settings.user_agent)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: origin,
            retry: settings.retry,
            page_delay: settings.page_delay,
            shop_lookup_delay: settings.shop_lookup_delay,
        })
    }

    /// Storefront origin used for requests and product links.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one GET with retry, returning the parsed JSON body.
    ///
    /// Returns `Ok(None)` when `stop` is set before an attempt, or when the
    /// API kept answering 429 through every attempt.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Network`] after the last attempt fails with a
    ///   transport failure.
    /// - [`ScraperError::InvalidBaseUrl`] if the endpoint URL cannot be built.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        stop: &StopSignal,
    ) -> Result<Option<Value>, ScraperError> {
        let url = self.endpoint(path, params)?;
        retry_with_backoff(&self.retry, stop, || {
            let url = url.clone();
            async move { self.get_once(url).await }
        })
        .await
    }

    /// Fetches one page of search results as raw `items` elements.
    ///
    /// A missing or `null` `items` field, a stopped run, and a response that
    /// stayed rate limited all yield an empty page.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::get_json`] errors.
    pub async fn search_page(
        &self,
        query: &QueryDescriptor,
        page: u32,
        stop: &StopSignal,
    ) -> Result<Vec<Value>, ScraperError> {
        let params = search_params(query, page);
        let body = self.get_json(SEARCH_PATH, &params, stop).await?;
        Ok(extract_items(body))
    }

    /// Looks up a shop's display name. Best effort: any failure, including a
    /// network error after all retries, is logged and yields `None`.
    pub async fn shop_name(&self, shop_id: u64, stop: &StopSignal) -> Option<String> {
        let body = match self
            .get_json(SHOP_DETAIL_PATH, &shop_detail_params(shop_id), stop)
            .await
        {
            Ok(body) => body?,
            Err(e) => {
                tracing::warn!(shop_id, error = %e, "shop name lookup failed");
                return None;
            }
        };

        match serde_json::from_value::<ShopDetailResponse>(body) {
            Ok(detail) => detail.into_name(),
            Err(e) => {
                tracing::debug!(shop_id, error = %e, "unexpected shop detail shape");
                None
            }
        }
    }

    async fn get_once(&self, url: Url) -> Result<Value, ScraperError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("response from {}", url.path()),
            source: e,
        })
    }

    /// Builds the full request URL for `path` with `params` appended.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if the joined URL does not
    /// parse.
    fn endpoint(&self, path: &str, params: &[(&'static str, String)]) -> Result<Url, ScraperError> {
        let raw = format!("{}{path}", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: format!("cannot join \"{path}\": {e}"),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}

/// Pulls the `items` array out of a search response body.
fn extract_items(body: Option<Value>) -> Vec<Value> {
    match body {
        Some(Value::Object(mut map)) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
