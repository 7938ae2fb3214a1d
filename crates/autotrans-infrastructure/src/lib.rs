//! Infrastructure for autotrans: settings persistence and HTTP translation
//! providers.

pub mod paths;
pub mod providers;
pub mod storage;
pub mod toml_settings_store;

pub use crate::paths::AutotransPaths;
pub use crate::providers::{ConfiguredProvider, DeeplProvider, GoogleTranslateProvider};
pub use crate::toml_settings_store::TomlSettingsStore;
