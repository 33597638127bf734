//! Command handlers

pub mod check_config;
pub mod run;

use anyhow::Context;
use endorsement_registry::RegistryConfig;
use std::path::Path;

/// Load a registry config and apply `ENDORSE_*` environment overrides.
pub fn load_config(path: &Path) -> anyhow::Result<RegistryConfig> {
    let mut config = RegistryConfig::load_from_file(path)
        .with_context(|| format!("loading registry config {}", path.display()))?;
    config
        .merge_with_env()
        .context("applying environment overrides")?;
    Ok(config)
}
