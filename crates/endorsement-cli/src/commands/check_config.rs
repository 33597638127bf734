// Registry config validation

use super::load_config;
use endorsement_registry::Identity;
use std::path::Path;

/// Load `config_path` and print the settings a registry would start with.
pub fn check_config(config_path: &Path, creator: Option<Identity>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let creator = creator.unwrap_or_default();

    println!("Registry ID:      {}", config.registry_id);
    match config.controller {
        Some(controller) => println!("Controller:       {controller}"),
        None => println!("Controller:       {creator} (creator)"),
    }
    println!("Initial requests: {}", config.initial_requests.len());
    for identity in &config.initial_requests {
        println!("  - {identity}");
    }

    tracing::debug!(path = %config_path.display(), "config ok");
    Ok(())
}
