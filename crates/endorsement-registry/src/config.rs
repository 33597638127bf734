//! Registry configuration
//!
//! Creation-time settings, loadable from TOML:
//!
//! ```toml
//! registry_id = "0x1111111111111111111111111111111111111111"
//! controller = "0x2222222222222222222222222222222222222222"
//! initial_requests = [
//!     "0x3333333333333333333333333333333333333333",
//! ]
//! ```

use crate::error::ConfigError;
use crate::identifiers::Identity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding `registry_id`
pub const ENV_REGISTRY_ID: &str = "ENDORSE_REGISTRY_ID";
/// Environment variable overriding `controller`
pub const ENV_CONTROLLER: &str = "ENDORSE_CONTROLLER";

/// Configuration for creating an endorsement registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// The registry's own identity, used when it endorses another registry
    pub registry_id: Identity,

    /// Initial controller; the creator when unset
    pub controller: Option<Identity>,

    /// Identities seeded directly into `Requested`
    pub initial_requests: Vec<Identity>,
}

impl RegistryConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `ENDORSE_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `ENDORSE_*` overrides from an explicit set of variables
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                ENV_REGISTRY_ID => self.registry_id = parse_override(&key, &value)?,
                ENV_CONTROLLER => self.controller = Some(parse_override(&key, &value)?),
                _ => {}
            }
        }
        Ok(())
    }

    /// Controller the registry starts with when created by `creator`
    pub fn resolved_controller(&self, creator: Identity) -> Identity {
        self.controller.unwrap_or(creator)
    }

    /// Builder-style helper to set the controller
    pub fn with_controller(mut self, controller: Identity) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Builder-style helper to set the seed list
    pub fn with_initial_requests(mut self, identities: impl IntoIterator<Item = Identity>) -> Self {
        self.initial_requests = identities.into_iter().collect();
        self
    }

    /// Builder-style helper to set the registry identity
    pub fn with_registry_id(mut self, registry_id: Identity) -> Self {
        self.registry_id = registry_id;
        self
    }
}

fn parse_override(field: &str, value: &str) -> Result<Identity, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidIdentity {
            field: field.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn addr(seed: u8) -> String {
        Identity::from_seed(seed).to_string()
    }

    #[test]
    fn test_parse_full_config() {
        let text = format!(
            "registry_id = \"{}\"\ncontroller = \"{}\"\ninitial_requests = [\"{}\", \"{}\"]\n",
            addr(1),
            addr(2),
            addr(3),
            addr(3)
        );
        let config = RegistryConfig::from_toml_str(&text).unwrap();

        assert_eq!(config.registry_id, Identity::from_seed(1));
        assert_eq!(config.controller, Some(Identity::from_seed(2)));
        assert_eq!(config.initial_requests.len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
        assert_eq!(
            config.resolved_controller(Identity::from_seed(9)),
            Identity::from_seed(9)
        );
    }

    #[test]
    fn test_rejects_unknown_and_malformed_fields() {
        assert!(matches!(
            RegistryConfig::from_toml_str("blacklist = []"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RegistryConfig::from_toml_str("controller = \"0x12\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RegistryConfig::default();
        config
            .merge_with_vars(vec![
                (ENV_CONTROLLER.to_string(), addr(4)),
                (ENV_REGISTRY_ID.to_string(), addr(5)),
                ("UNRELATED".to_string(), "x".to_string()),
            ])
            .unwrap();
        assert_eq!(config.controller, Some(Identity::from_seed(4)));
        assert_eq!(config.registry_id, Identity::from_seed(5));

        let err = config
            .merge_with_vars(vec![(ENV_CONTROLLER.to_string(), "nope".to_string())])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentity { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_requests = [\"{}\"]", addr(6)).unwrap();

        let config = RegistryConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.initial_requests, vec![Identity::from_seed(6)]);

        let missing = RegistryConfig::load_from_file(Path::new("/nonexistent/registry.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
