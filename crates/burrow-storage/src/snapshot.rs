//! JSON snapshot of the full mapping set.
//!
//! The document is a single object whose `Addresses` field maps short codes
//! to original URLs:
//!
//! ```json
//! {"Addresses":{"EwHXdJfB":"https://practicum.yandex.ru/"}}
//! ```
//!
//! Unknown top-level fields are ignored when reading.

use burrow_core::repository::{Mapping, Result};
use burrow_core::{ShortCode, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "Addresses", default)]
    pub addresses: BTreeMap<ShortCode, String>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn into_mappings(self) -> impl Iterator<Item = Mapping> {
        self.addresses
            .into_iter()
            .map(|(short_code, original_url)| Mapping {
                short_code,
                original_url,
            })
    }
}

impl FromIterator<Mapping> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
        Self {
            addresses: iter
                .into_iter()
                .map(|m| (m.short_code, m.original_url))
                .collect(),
        }
    }
}

/// Reads the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist or holds nothing but
/// whitespace.
pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&bytes).map(Some).map_err(|e| {
        StorageError::InvalidData(format!("snapshot '{}' is malformed: {e}", path.display()))
    })
}

/// Replaces the snapshot at `path` with `snapshot`.
///
/// The document is written to a sibling temp file, fsynced, then renamed
/// over `path`, so readers see either the old or the new snapshot.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let data =
        serde_json::to_vec(snapshot).map_err(|e| StorageError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)?;
    file.write_all(&data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
