//! Location of autotrans files on disk.
//!
//! ```text
//! <config_dir>/autotrans/     # ~/.config/autotrans on Linux
//! └── settings.toml           # TranslateSettings
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "autotrans";
const SETTINGS_FILE: &str = "settings.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot find the platform config directory")]
    ConfigDirNotFound,
}

pub struct AutotransPaths;

impl AutotransPaths {
    /// Platform config directory for autotrans (XDG on Linux, Application
    /// Support on macOS, AppData on Windows).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn settings_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }
}
