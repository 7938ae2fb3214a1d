//! Crash-safe TOML file with an exclusive writer lock.

use autotrans_core::TranslateError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for TranslateError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => TranslateError::from(e),
            AtomicTomlError::Parse(e) => TranslateError::from(e),
            AtomicTomlError::Serialize(e) => TranslateError::from(e),
            AtomicTomlError::Lock(message) => TranslateError::io(message),
        }
    }
}

/// A TOML file that is replaced as a whole on every write.
///
/// Writes go to a sibling temp file which is fsynced and then renamed over
/// the target, so readers see either the old or the new content. `update`
/// additionally holds an exclusive lock on `<file>.lock` for the
/// read-modify-write.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// A missing or blank file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under the file lock. A missing file starts from
    /// `default_value`. Returns the value that was written.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T, AtomicTomlError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)?;

        Ok(data)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no file name")
        })?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock on `<path>.lock`, released on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Prefs {
        target: String,
        enabled: bool,
    }

    #[test]
    fn test_load_missing_and_blank_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        let file = AtomicTomlFile::<Prefs>::new(path.clone());

        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.toml");
        let file = AtomicTomlFile::<Prefs>::new(path.clone());

        let prefs = Prefs {
            target: "ja".to_string(),
            enabled: true,
        };
        file.save(&prefs).unwrap();

        assert_eq!(file.load().unwrap(), Some(prefs));
        assert!(!temp_dir.path().join("nested").join(".prefs.toml.tmp").exists());
    }

    #[test]
    fn test_update_starts_from_default_and_releases_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        let file = AtomicTomlFile::<Prefs>::new(path.clone());

        let written = file
            .update(Prefs::default(), |prefs| prefs.target = "de".to_string())
            .unwrap();
        assert_eq!(written.target, "de");

        file.update(Prefs::default(), |prefs| prefs.enabled = true)
            .unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.target, "de");
        assert!(loaded.enabled);
        assert!(!path.with_extension("lock").exists());
    }

    #[test]
    fn test_parse_error_maps_to_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.toml");
        fs::write(&path, "target = [").unwrap();

        let err = AtomicTomlFile::<Prefs>::new(path).load().unwrap_err();
        assert!(matches!(err, AtomicTomlError::Parse(_)));
        assert!(TranslateError::from(err).is_serialization());
    }
}
