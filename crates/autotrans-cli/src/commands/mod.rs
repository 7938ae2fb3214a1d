use anyhow::{Context, Result};
use autotrans_application::{EngineCollaborators, SessionEngine};
use autotrans_infrastructure::{ConfiguredProvider, TomlSettingsStore};
use std::path::PathBuf;
use std::sync::Arc;

pub mod config;
mod headless;
pub mod session;
pub mod translate;

/// Settings store and engine shared by every command.
pub struct App {
    pub settings: Arc<TomlSettingsStore>,
    pub engine: Arc<SessionEngine>,
}

impl App {
    pub fn open(settings_path: Option<PathBuf>) -> Result<Self> {
        let settings = match settings_path {
            Some(path) => TomlSettingsStore::with_path(path),
            None => TomlSettingsStore::new().context("Failed to locate the settings file")?,
        };
        let settings = Arc::new(settings);
        tracing::debug!("Using settings at {}", settings.path().display());

        let deps = EngineCollaborators::new(
            Arc::new(ConfiguredProvider::new(settings.clone())),
            Arc::new(headless::HeadlessView),
            Arc::new(headless::NoMessages),
            Arc::new(headless::PrintRenderer),
            settings.clone(),
        );

        Ok(Self {
            engine: SessionEngine::new(deps),
            settings,
        })
    }
}
