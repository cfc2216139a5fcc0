use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The query cannot be sent (empty inventor name).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Upstream failed on every attempt (non-success status, timeout or
    /// connection error; these are not distinguished).
    #[error("patent source unavailable after {attempts} attempts: {message}")]
    SourceUnavailable { attempts: u32, message: String },

    /// Upstream answered 2xx but the body is not the expected JSON.
    #[error("unexpected patent source response: {0}")]
    Parse(String),

    /// Client could not be built (bad base URL, TLS init).
    #[error("source client configuration error: {0}")]
    Config(String),
}
