//! TOML-backed settings store.

use crate::paths::AutotransPaths;
use crate::storage::AtomicTomlFile;
use autotrans_core::error::{Result, TranslateError};
use autotrans_core::settings::{SettingsStore, TranslateSettings};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// [`SettingsStore`] persisted to `settings.toml`.
///
/// The file is read once and cached; every write goes through the atomic
/// file and refreshes the cache. A file that cannot be read or parsed is
/// reported once as a warning and treated as defaults, so a corrupted
/// settings file never stops the engine.
///
/// # Example
///
/// ```ignore
/// use autotrans_infrastructure::TomlSettingsStore;
///
/// let store = TomlSettingsStore::new()?;
/// store.update(&mut |s| s.received_output = "ja".to_string())?;
/// ```
pub struct TomlSettingsStore {
    file: AtomicTomlFile<TranslateSettings>,
    cache: RwLock<Option<TranslateSettings>>,
}

impl TomlSettingsStore {
    /// Opens the store at the platform settings path.
    pub fn new() -> Result<Self> {
        let path = AutotransPaths::settings_file()
            .map_err(|e| TranslateError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path.into()),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn store_cache(&self, settings: &TranslateSettings) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(settings.clone());
    }

    fn load(&self) -> TranslateSettings {
        match self.file.load() {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(
                    "Failed to read settings from {}: {}. Using defaults.",
                    self.file.path().display(),
                    err
                );
                TranslateSettings::default()
            }
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn get(&self) -> TranslateSettings {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.as_ref() {
                return cached.clone();
            }
        }

        let loaded = self.load();
        self.store_cache(&loaded);
        loaded
    }

    fn set(&self, settings: TranslateSettings) -> Result<()> {
        self.file.save(&settings)?;
        self.store_cache(&settings);
        Ok(())
    }

    /// Read-modify-write against the file under its lock, so two processes
    /// editing different keys do not lose each other's change.
    fn update(&self, f: &mut dyn FnMut(&mut TranslateSettings)) -> Result<()> {
        let written = self.file.update(TranslateSettings::default(), |settings| f(settings))?;
        self.store_cache(&written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_is_refreshed_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlSettingsStore::with_path(temp_dir.path().join("settings.toml"));

        assert_eq!(store.get(), TranslateSettings::default());

        store
            .update(&mut |s| s.received_output = "fr".to_string())
            .unwrap();
        assert_eq!(store.get().received_output, "fr");
    }

    #[test]
    fn test_corrupted_file_reads_as_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "service = 42").unwrap();

        let store = TomlSettingsStore::with_path(&path);
        assert_eq!(store.get(), TranslateSettings::default());
    }
}
