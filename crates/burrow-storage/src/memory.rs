use async_trait::async_trait;
use burrow_core::repository::{InsertOutcome, Mapping, Repository, Result};
use burrow_core::{ShortCode, StorageError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::trace;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
///
/// A reverse index (original URL -> code) sits next to the forward map so
/// reuse checks don't scan every entry. Inserts hold the reverse entry for
/// the URL while claiming the forward slot, which makes the check-then-insert
/// atomic per URL. Lock order is always reverse, then forward.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    forward: DashMap<ShortCode, String>,
    reverse: DashMap<String, ShortCode>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from previously stored mappings.
    ///
    /// Older snapshots may hold the same URL under several codes. All codes
    /// keep resolving; reverse lookups return the first one seen.
    pub fn from_mappings(mappings: impl IntoIterator<Item = Mapping>) -> Self {
        let repo = Self::new();
        for Mapping {
            short_code,
            original_url,
        } in mappings
        {
            repo.reverse
                .entry(original_url.clone())
                .or_insert_with(|| short_code.clone());
            repo.forward.insert(short_code, original_url);
        }
        repo
    }

    /// Copies out every stored mapping, ordered by short code.
    pub fn mappings(&self) -> Vec<Mapping> {
        let mut mappings: Vec<Mapping> = self
            .forward
            .iter()
            .map(|entry| Mapping {
                short_code: entry.key().clone(),
                original_url: entry.value().clone(),
            })
            .collect();
        mappings.sort_by(|a, b| a.short_code.cmp(&b.short_code));
        mappings
    }

    pub(crate) fn lookup(&self, code: &ShortCode) -> Option<String> {
        self.forward.get(code).map(|url| url.value().clone())
    }

    pub(crate) fn lookup_reverse(&self, original_url: &str) -> Option<ShortCode> {
        self.reverse.get(original_url).map(|code| code.value().clone())
    }

    pub(crate) fn insert(&self, code: &ShortCode, original_url: &str) -> Result<InsertOutcome> {
        let slot = match self.reverse.entry(original_url.to_owned()) {
            Entry::Occupied(existing) => {
                return Ok(InsertOutcome::Existing(existing.get().clone()));
            }
            Entry::Vacant(slot) => slot,
        };

        match self.forward.entry(code.clone()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(forward) => {
                forward.insert(original_url.to_owned());
            }
        }
        slot.insert(code.clone());

        trace!(code = %code, "stored mapping");
        Ok(InsertOutcome::Inserted)
    }

    /// Undoes an insert of `code -> original_url`. Other mappings are left alone.
    pub(crate) fn remove(&self, code: &ShortCode, original_url: &str) {
        self.reverse.remove_if(original_url, |_, stored| stored == code);
        self.forward.remove_if(code, |_, stored| stored == original_url);
        trace!(code = %code, "removed mapping");
    }

    pub(crate) fn count(&self) -> usize {
        self.forward.len()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self.lookup(code))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        Ok(self.lookup_reverse(original_url))
    }

    async fn insert_if_absent(
        &self,
        code: &ShortCode,
        original_url: &str,
    ) -> Result<InsertOutcome> {
        self.insert(code, original_url)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.count())
    }
}
