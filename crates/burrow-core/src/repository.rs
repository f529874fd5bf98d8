use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping between a short code and the URL it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub short_code: ShortCode,
    pub original_url: String,
}

/// Outcome of [`Repository::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mapping was stored under the requested code.
    Inserted,
    /// The original URL was already mapped; nothing was written.
    Existing(ShortCode),
}

/// Storage contract shared by every backend.
///
/// Backends own the mapping set exclusively and must keep short codes unique.
/// Idempotency per original URL relies on [`insert_if_absent`] being atomic:
/// between the check for an existing mapping and the write, no other caller
/// may map the same URL.
///
/// [`insert_if_absent`]: Repository::insert_if_absent
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Returns the original URL stored under `code`, or `None` if unknown.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Reverse lookup: the short code an original URL is stored under.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<ShortCode>>;

    /// Maps `code` to `original_url` unless the URL is already mapped.
    ///
    /// Returns `Err(StorageError::Conflict)` if `code` is already taken by a
    /// different URL. An existing mapping is never overwritten.
    async fn insert_if_absent(&self, code: &ShortCode, original_url: &str)
        -> Result<InsertOutcome>;

    /// Number of stored mappings.
    async fn len(&self) -> Result<usize>;

    /// Flushes whatever the backend still holds only in memory.
    ///
    /// Called once at orderly shutdown.
    async fn finalize(&self) -> Result<()> {
        Ok(())
    }
}
