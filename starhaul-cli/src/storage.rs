use starhaul_game::GameStorage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("save file {path} could not be {action}: {source}")]
pub struct StorageError {
    path: PathBuf,
    action: &'static str,
    #[source]
    source: io::Error,
}

impl StorageError {
    fn new(path: &Path, action: &'static str, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            action,
            source,
        }
    }
}

/// One pretty-printed JSON file per slot under a save directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    #[must_use]
    pub fn backup_path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json.bak"))
    }
}

impl GameStorage for FileStorage {
    type Error = StorageError;

    fn load_snapshot(&self, slot: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(slot);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::new(&path, "read", err)),
        }
    }

    fn save_snapshot(&self, slot: &str, raw: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir).map_err(|err| StorageError::new(&self.dir, "created", err))?;
        let path = self.path_for(slot);
        fs::write(&path, raw).map_err(|err| StorageError::new(&path, "written", err))
    }

    fn delete_save(&self, slot: &str) -> Result<(), Self::Error> {
        let path = self.path_for(slot);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                Err(StorageError::new(&path, "deleted", err))
            }
            _ => Ok(()),
        }
    }

    fn backup_corrupt(&self, slot: &str) -> Result<(), Self::Error> {
        let path = self.path_for(slot);
        fs::copy(&path, self.backup_path_for(slot))
            .map(drop)
            .map_err(|err| StorageError::new(&path, "backed up", err))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "starhaul-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_is_no_save() {
        let storage = FileStorage::new(temp_dir("missing"));
        assert!(storage.load_snapshot("game_state").unwrap().is_none());
        storage.delete_save("game_state").unwrap();
    }

    #[test]
    fn save_overwrites_and_delete_removes() {
        let storage = FileStorage::new(temp_dir("save"));
        storage.save_snapshot("game_state", "{\"a\":1}").unwrap();
        storage.save_snapshot("game_state", "{\"b\":2}").unwrap();
        assert_eq!(
            storage.load_snapshot("game_state").unwrap().as_deref(),
            Some("{\"b\":2}")
        );
        storage.delete_save("game_state").unwrap();
        assert!(!storage.path_for("game_state").exists());
    }

    #[test]
    fn corrupt_file_is_copied_aside() {
        let storage = FileStorage::new(temp_dir("backup"));
        storage.save_snapshot("game_state", "{\"meta\":").unwrap();
        storage.backup_corrupt("game_state").unwrap();
        let backup = fs::read_to_string(storage.backup_path_for("game_state")).unwrap();
        assert_eq!(backup, "{\"meta\":");
    }
}
