use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Caller-level validation failures, raised before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("could not resolve a shop id from \"{0}\"")]
    UnresolvableShop(String),

    #[error("could not resolve a category id from \"{0}\"")]
    UnresolvableCategory(String),

    #[error("invalid price bound \"{0}\": expected a non-negative integer")]
    InvalidPrice(String),

    #[error("invalid query \"{label}\": {reason}")]
    InvalidQuery { label: String, reason: String },
}
