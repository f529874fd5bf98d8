use crate::memory::InMemoryRepository;
use crate::snapshot::{read_snapshot, write_snapshot, Snapshot};
use async_trait::async_trait;
use burrow_core::repository::{InsertOutcome, Repository, Result};
use burrow_core::ShortCode;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// An in-memory repository that mirrors itself to a JSON snapshot file.
///
/// Every successful insert rewrites the whole snapshot on the calling task.
/// Writes are serialized, and each one copies the mapping set after taking
/// the write lock, so the last write on disk holds every completed insert.
#[derive(Debug)]
pub struct FileRepository {
    memory: InMemoryRepository,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRepository {
    /// Opens a repository backed by the snapshot at `path`.
    ///
    /// With `restore` set, an existing non-empty snapshot is loaded; a missing
    /// or empty file yields an empty store. A malformed snapshot is an error.
    pub fn open(path: impl Into<PathBuf>, restore: bool) -> Result<Self> {
        let path = path.into();

        let memory = if restore {
            match read_snapshot(&path)? {
                Some(snapshot) => {
                    info!(
                        path = %path.display(),
                        mappings = snapshot.len(),
                        "restored snapshot"
                    );
                    InMemoryRepository::from_mappings(snapshot.into_mappings())
                }
                None => {
                    debug!(path = %path.display(), "no snapshot to restore");
                    InMemoryRepository::new()
                }
            }
        } else {
            InMemoryRepository::new()
        };

        Ok(Self {
            memory,
            path,
            write_lock: Mutex::new(()),
        })
    }

    fn persist(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let snapshot: Snapshot = self.memory.mappings().into_iter().collect();
        write_snapshot(&self.path, &snapshot)?;
        debug!(path = %self.path.display(), mappings = snapshot.len(), "wrote snapshot");
        Ok(())
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self.memory.lookup(code))
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<ShortCode>> {
        Ok(self.memory.lookup_reverse(original_url))
    }

    /// A new mapping only stays once the snapshot holding it is on disk.
    async fn insert_if_absent(
        &self,
        code: &ShortCode,
        original_url: &str,
    ) -> Result<InsertOutcome> {
        let outcome = self.memory.insert(code, original_url)?;
        if outcome == InsertOutcome::Inserted {
            if let Err(err) = self.persist() {
                warn!(code = %code, error = %err, "snapshot write failed, dropping mapping");
                self.memory.remove(code, original_url);
                return Err(err);
            }
        }
        Ok(outcome)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.memory.count())
    }

    async fn finalize(&self) -> Result<()> {
        info!(path = %self.path.display(), "writing final snapshot");
        self.persist()
    }
}
