use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Result of [`Shortener::create_or_reuse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortened {
    /// A new short code was minted for the URL.
    Created(ShortCode),
    /// The URL had been shortened before; this is its existing code.
    Existing(ShortCode),
}

impl Shortened {
    pub fn code(&self) -> &ShortCode {
        match self {
            Shortened::Created(code) | Shortened::Existing(code) => code,
        }
    }

    pub fn into_code(self) -> ShortCode {
        match self {
            Shortened::Created(code) | Shortened::Existing(code) => code,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Shortened::Created(_))
    }

    /// HTTP status the transport layer answers with: 201 or 409.
    pub fn status_code(&self) -> u16 {
        match self {
            Shortened::Created(_) => 201,
            Shortened::Existing(_) => 409,
        }
    }
}

/// One row of a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub correlation_id: String,
    pub original_url: String,
}

/// One row of a batch response, in the same position as its [`BatchItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub correlation_id: String,
    pub short_code: ShortCode,
    pub created: bool,
}

/// The resolution contract consumed by the request layer.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Resolves a short code to the original URL.
    /// Returns `Err(NoEntry)` if the code is unknown.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;

    /// Resolves a raw lookup key as received from a client.
    ///
    /// A key that is not a well-formed short code can never have been
    /// stored, so it is reported as `Err(NoEntry)` like any unknown code.
    async fn resolve_key(&self, key: &str) -> Result<String> {
        match ShortCode::new(key) {
            Ok(code) => self.resolve(&code).await,
            Err(_) => Err(ShortenerError::NoEntry {
                short_code: key.to_string(),
            }),
        }
    }

    /// Returns the URL's existing code, or mints and stores a new one.
    async fn create_or_reuse(&self, original_url: &str) -> Result<Shortened>;

    /// Like [`create_or_reuse`](Shortener::create_or_reuse), but an already
    /// shortened URL is reported as `Err(OriginalUrlExists)`.
    async fn shorten(&self, original_url: &str) -> Result<ShortCode>;

    /// Returns the short code the URL is stored under, if any.
    async fn lookup_by_original_url(&self, original_url: &str) -> Result<Option<ShortCode>>;

    /// Shortens every item, preserving input order in the output.
    async fn create_batch(&self, items: Vec<BatchItem>) -> Result<Vec<BatchEntry>>;

    /// Called exactly once at orderly shutdown.
    async fn finalize(&self) -> Result<()>;
}
