use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// No saved access token, or the API refused the one we sent.
    #[error("not authenticated: run `patfolio login` first")]
    NotAuthenticated,

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}: {1}")]
    Http(u16, String),

    /// A payload failed local checks, or the API answered 400/422.
    #[error("{0}")]
    Validation(String),

    /// One creation call failed. The batch keeps going.
    #[error("upload of {number} rejected: {reason}")]
    UploadRejected { number: String, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}
