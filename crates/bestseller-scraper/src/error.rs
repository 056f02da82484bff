use bestseller_core::InputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("network error after {attempts} attempts: {source}")]
    Network {
        attempts: u32,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("malformed search item: {reason}")]
    MalformedRecord { reason: String },

    #[error(transparent)]
    InvalidQuery(#[from] InputError),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}

impl ScraperError {
    /// Failures of a single request attempt that a retry may fix: network
    /// errors, non-2xx statuses other than 429, and bodies that are not JSON
    /// (anti-bot challenge pages land here).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::Deserialize { .. }
        )
    }
}
