//! Directory-backed key-value store: one JSON file per key.

use crate::{KeyValueStore, StoreError};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Stores each key as `<dir>/<key>.json`. Writes go through a temporary file
/// and a rename, so a reader never sees a half-written snapshot.
///
/// Keys are used verbatim as file names, so only non-empty keys made of
/// `[A-Za-z0-9._-]` (and not starting with `.`) are accepted. Distinct keys
/// therefore never share a file.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn write_then_rename(tmp_path: &Path, final_path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    fs::rename(tmp_path, final_path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let final_path = self.path_for(key)?;
        let mut tmp_name = final_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        if let Err(e) = write_then_rename(&tmp_path, &final_path, value) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get("911SimulatorState").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("911SimulatorState", "first").unwrap();
        store.set("911SimulatorState", "second").unwrap();
        assert_eq!(
            store.get("911SimulatorState").unwrap().as_deref(),
            Some("second")
        );
        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        // A directory squatting on the target path makes the rename fail.
        fs::create_dir(dir.path().join("state.json")).unwrap();
        fs::write(dir.path().join("state.json").join("keep"), "x").unwrap();

        assert!(matches!(store.set("state", "{}"), Err(StoreError::Io(_))));
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("saves").join("slot1");
        let mut store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn keys_that_would_collide_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("a_b", "underscore").unwrap();
        for key in ["a b", "../evil", "", ".hidden", "slot/2"] {
            assert!(
                matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))),
                "key {key:?} accepted"
            );
            assert!(matches!(store.get(key), Err(StoreError::InvalidKey(_))));
        }
        assert_eq!(store.get("a_b").unwrap().as_deref(), Some("underscore"));
        assert_eq!(
            store.path_for("slot-2.v1").unwrap(),
            dir.path().join("slot-2.v1.json")
        );
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set("state", "{\"budget\":1}").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"budget\":1}"));
    }
}
