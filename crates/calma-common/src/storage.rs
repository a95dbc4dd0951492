/// File-backed key-value store with graceful reads.
///
/// Each key maps to one JSON document at `<dir>/<key>.json`. Reads degrade
/// gracefully: a missing file or an I/O failure logs a warning and returns
/// `None`, and callers fall through to their empty state. Writes replace the
/// whole document atomically — the value is written to a temp file in the
/// same directory and renamed over the target, so readers never observe a
/// partial write.
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::CommonError;

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CommonError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CommonError::Storage {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Read the raw document stored under `key`. Returns `None` if the key
    /// has never been written or the file cannot be read.
    pub fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        fs::read_to_string(&path)
            .inspect_err(|e| warn!(error = %e, key, "store read failed"))
            .ok()
    }

    /// Replace the document stored under `key` with `value`.
    pub fn write(&self, key: &str, value: &str) -> Result<(), CommonError> {
        let storage_err = |source| CommonError::Storage {
            key: key.to_string(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(storage_err)?;
        tmp.write_all(value.as_bytes()).map_err(storage_err)?;
        tmp.persist(self.path_for(key))
            .map_err(|e| storage_err(e.error))?;
        Ok(())
    }

    /// Whether a document exists under `key`, without reading it.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.read("nunca_escrito"), None);
        assert!(!store.contains("nunca_escrito"));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.write("clave", r#"{"a":1}"#).unwrap();
        assert_eq!(store.read("clave").as_deref(), Some(r#"{"a":1}"#));
        assert!(store.contains("clave"));
    }

    #[test]
    fn write_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        store.write("clave", "primero").unwrap();
        store.write("clave", "segundo").unwrap();
        assert_eq!(store.read("clave").as_deref(), Some("segundo"));
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let store = JsonStore::open(&nested).unwrap();
        store.write("clave", "valor").unwrap();
        assert!(nested.join("clave.json").exists());
    }
}
