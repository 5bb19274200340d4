//! Cache store persisting one JSON document per key in a directory.

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::cache::{CacheEntry, CacheError, CacheStore};

/// A [`CacheStore`] that keeps each entry in `<directory>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    directory: PathBuf,
}

impl FileCacheStore {
    /// Opens a store rooted at `directory`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        debug!(directory = directory.display().to_string(); "Opened file cache store");
        Ok(Self { directory })
    }

    /// Returns the directory holding the cache documents
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document for `key`.
    ///
    /// Keys are restricted to ASCII letters, digits, `-` and `_` so they can
    /// never escape the cache directory.
    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl CacheStore for FileCacheStore {
    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key)?;
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    /// Replaces the document for the entry's key, keeping the stored
    /// `createdAt` if a readable entry exists.
    ///
    /// The carry-over is a read followed by a rename, not a transaction: with
    /// concurrent writers the last rename wins and may record its own
    /// creation time instead of the original one.
    fn upsert_entry(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let path = self.entry_path(entry.cache_key())?;

        let entry = match self.read_entry(entry.cache_key()) {
            Ok(Some(existing)) => {
                let created_at = existing.created_at();
                entry.with_created_at(created_at)
            }
            Ok(None) => entry,
            Err(CacheError::Serialization(err)) => {
                warn!(path = path.display().to_string(), err:%; "Replacing unreadable cache document");
                entry
            }
            Err(err) => return Err(err),
        };

        let temp_file = NamedTempFile::new_in(&self.directory)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, &entry)?;
            writer.flush()?;
        }
        temp_file.persist(&path)?;

        debug!(path = path.display().to_string(); "Cache document written");
        Ok(())
    }

    fn delete_entry(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
