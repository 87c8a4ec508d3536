//! Models command - List models the configured backend serves.

use anyhow::{Context, Result};

use super::{engine, print_json, GlobalArgs};

pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let engine = engine(global)?;
    let models = engine
        .available_models()
        .await
        .context("Failed to list models")?;
    print_json(&models)
}
