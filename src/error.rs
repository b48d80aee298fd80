// Error taxonomy for the voting core
// Every failure carries its kind so callers (CLI, HTTP adapter) can map it

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input, detected before any store mutation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("character not found: {0}")]
    NotFound(String),

    /// Duplicate character during ingestion
    #[error("character already exists: {0}")]
    Conflict(String),

    /// Underlying persistence failure, always propagated
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("both winner and loser must be provided")]
    MissingOperand,

    #[error("a character cannot vote against itself")]
    SelfVote,

    #[error("unknown filter field '{0}'")]
    UnknownFilter(String),

    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },

    #[error("bloodline {bloodline} does not belong to race {race}")]
    BloodlineMismatch { bloodline: String, race: String },

    #[error("row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    /// Request body or query string could not be decoded
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Coarse error kind, stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Store => "store",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Store(_) => ErrorKind::Store,
        }
    }

    pub fn invalid_field(field: &str, value: &str) -> Self {
        Error::Validation(ValidationError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
