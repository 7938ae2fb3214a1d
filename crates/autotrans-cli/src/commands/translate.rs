use super::App;
use anyhow::{Context, Result};
use autotrans_core::translation::Direction;

pub async fn run(app: &App, direction: Direction, text: &str) -> Result<()> {
    let result = app
        .engine
        .translate_one(direction, text)
        .await
        .with_context(|| format!("Failed to translate ({} direction)", direction))?;

    println!("{}", result.text);
    if let Some(language) = result.detected_language {
        tracing::info!("Detected source language: {}", language);
    }
    Ok(())
}
