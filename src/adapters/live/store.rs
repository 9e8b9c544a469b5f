//! Live key-value store keeping one file per key in a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::store::{KeyValueStore, StoreResult};

/// Directory-backed store. The directory is created on first write.
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.dir.join(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(std::fs::write(self.dir.join(key), value)?)
    }

    fn clear(&self) -> StoreResult<()> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_creates_directory_and_get_reads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(tmp.path().join("nested").join(".cache"));

        store.put("a.json", "{\"x\":1}").unwrap();

        assert_eq!(store.get("a.json").unwrap().as_deref(), Some("{\"x\":1}"));
        assert!(store.dir().join("a.json").is_file());
    }

    #[test]
    fn missing_entry_and_missing_directory_are_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(tmp.path().join("absent"));
        assert_eq!(store.get("a.json").unwrap(), None);
    }

    #[test]
    fn clear_removes_files_and_tolerates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(tmp.path().join(".cache"));
        store.clear().unwrap();

        store.put("a.json", "1").unwrap();
        store.put("b.json", "2").unwrap();
        store.clear().unwrap();

        assert_eq!(store.get("a.json").unwrap(), None);
        assert_eq!(store.get("b.json").unwrap(), None);
        assert!(store.dir().is_dir());
    }
}
