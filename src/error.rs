use thiserror::Error;

/// Errors returned by [`MexcClient`](crate::MexcClient) and its helpers.
#[derive(Debug, Error)]
pub enum MexcError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange rejected the request with a `{code, msg}` body.
    #[error("MEXC API error ({status}): code={code} msg={msg}")]
    Api { status: u16, code: i64, msg: String },

    /// Non-success status whose body was not a recognisable API error.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("API key and secret are required for signed endpoints")]
    MissingCredentials,

    #[error("maximum number of symbols exceeded: got {0}, only 5 are allowed")]
    TooManySymbols(usize),

    #[error("asset not found in account balances: {0}")]
    AssetNotFound(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("invalid URL: {0}")]
    Url(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MexcError>;
