//! Configuration schema for lazydep
//!
//! Configuration is stored at `~/.config/lazydep/config.toml`

use crate::package::PackageManager;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Package cache settings
    pub cache: CacheConfig,

    /// Package registry settings
    pub registry: RegistryConfig,

    /// Installer settings
    pub installer: InstallerConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging of installs and removals
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Package cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory holding one slot per package
    pub package_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            package_path: std::env::temp_dir().join("lazydep"),
        }
    }
}

/// Registry configuration
///
/// An empty `url` is filled lazily by asking the package manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub url: String,
}

impl RegistryConfig {
    /// Whether the URL still needs discovery
    pub fn is_unresolved(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// Installer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Package manager used for installs and registry discovery
    pub package_manager: PackageManager,

    /// Default number of forced reinstalls after a load failure
    pub max_retries: u32,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::Npm,
            max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[registry]"));
        assert!(toml.contains("package_manager = \"npm\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.registry.is_unresolved());
        assert_eq!(config.installer.max_retries, 3);
        assert!(config.cache.package_path.ends_with("lazydep"));
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [cache]
            package_path = "/tmp/cache"

            [installer]
            package_manager = "pnpm"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.package_path, PathBuf::from("/tmp/cache"));
        assert_eq!(config.installer.package_manager, PackageManager::Pnpm);
        assert_eq!(config.installer.max_retries, 3); // default preserved
    }

    #[test]
    fn unknown_package_manager_rejected() {
        let toml = r#"
            [installer]
            package_manager = "bun"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
