use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconError>;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Target inventor name is empty or whitespace only.
    #[error("target inventor name is empty")]
    EmptyTarget,
    /// Vocabulary TOML parse / deserialization error.
    #[error("vocabulary parse error: {0}")]
    VocabularyParse(String),
    /// Vocabulary validation error (blank label, duplicate label, blank keyword).
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),
}
