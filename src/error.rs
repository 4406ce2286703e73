use thiserror::Error;

/// Result type alias for calls to external text services
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of the external correction and lemmatization services
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Response rejected: {0}")]
    Rejected(String),
}
