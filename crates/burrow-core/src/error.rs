use thiserror::Error;

/// Errors related to the core functionality of the URL shortener service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Failures raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The short code is already mapped to a different original URL.
    #[error("short code already taken: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage i/o failed: {0}")]
    Io(String),
    #[error("snapshot serialization failed: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Errors surfaced by the [`Shortener`](crate::Shortener) contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("original url is empty")]
    EmptyInput,
    #[error("no entry for short code {short_code}")]
    NoEntry { short_code: String },
    /// Not a failure of the store: the URL was shortened before and
    /// `short_code` is the code it already has.
    #[error("original url {original_url} is already shortened as {short_code}")]
    OriginalUrlExists {
        original_url: String,
        short_code: String,
    },
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ShortenerError {
    /// HTTP status the transport layer answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ShortenerError::EmptyInput | ShortenerError::InvalidShortCode(_) => 400,
            ShortenerError::NoEntry { .. } => 404,
            ShortenerError::OriginalUrlExists { .. } => 409,
            ShortenerError::Storage(_) => 500,
        }
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}
