use super::App;
use anyhow::{Result, anyhow};
use autotrans_core::settings::SettingsStore;

pub fn show(app: &App) {
    let settings = app.settings.get();

    println!("# {}", app.settings.path().display());
    println!("service         = {}", settings.service);
    println!(
        "deeplApiKey     = {}",
        settings.deepl_api_key.as_deref().map(mask).unwrap_or_else(|| "(not set)".to_string())
    );
    println!("receivedInput   = {}", settings.received_input);
    println!("receivedOutput  = {}", settings.received_output);
    println!("sentInput       = {}", settings.sent_input);
    println!("sentOutput      = {}", settings.sent_output);
    println!("autoTranslate   = {}", settings.auto_translate);
}

pub fn set(app: &App, key: &str, value: &str) -> Result<()> {
    let mut settings = app.settings.get();
    settings.set_by_key(key, value).map_err(|e| anyhow!(e))?;
    app.settings.set(settings)?;
    println!("{} updated", key);
    Ok(())
}

/// Keeps the last four characters of an API key.
fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .skip(key.chars().count().saturating_sub(4))
        .collect();
    format!("****{}", tail)
}
