//! Configuration schema for Stockpot
//!
//! Configuration is stored at `~/.config/stockpot/config.toml`, with an
//! optional project-local `.stockpot.toml` layered on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Catalog repository settings
    pub catalog: CatalogConfig,

    /// Target project conventions
    pub project: ProjectConfig,

    /// Package manager used to install unit dependencies
    pub package_manager: PackageManagerConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Record provisioning runs in the history log
    pub history_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            history_log: true,
        }
    }
}

/// Catalog repository settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Git URL of the catalog (SSH or HTTPS, passed to git as-is)
    pub url: String,

    /// Directory name of the local mirror inside the temp directory
    pub cache_name: String,

    /// Explicit mirror location (overrides `cache_name`)
    pub cache_dir: Option<PathBuf>,

    /// File suffix identifying dependency manifests inside units
    pub manifest_suffix: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: "git@github.com:BlueChilli/ChilliSource.Front.Modules.git".to_string(),
            cache_name: "stockpot-catalog".to_string(),
            cache_dir: None,
            manifest_suffix: ".packages".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Location of the local catalog mirror
    pub fn cache_path(&self) -> PathBuf {
        match self.cache_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::temp_dir().join(&self.cache_name),
        }
    }
}

/// Target project conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory under the project root that receives units
    pub source_dir: String,

    /// Entries that must exist in the project root before provisioning
    pub markers: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_dir: "src".to_string(),
            markers: vec![
                "node_modules".to_string(),
                "src".to_string(),
                "public".to_string(),
            ],
        }
    }
}

/// Package manager settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManagerConfig {
    /// Program to run
    pub program: String,

    /// Arguments placed before the dependency list
    pub add_args: Vec<String>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: "yarn".to_string(),
            add_args: vec!["add".to_string()],
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
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[package_manager]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.manifest_suffix, ".packages");
        assert_eq!(config.package_manager.program, "yarn");
        assert_eq!(config.project.markers, vec!["node_modules", "src", "public"]);
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [package_manager]
            program = "npm"
            add_args = ["install", "--save"]
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.package_manager.program, "npm");
        assert_eq!(config.package_manager.add_args, vec!["install", "--save"]);
        assert_eq!(config.project.source_dir, "src"); // default preserved
    }

    #[test]
    fn cache_path_defaults_to_temp_dir() {
        let catalog = CatalogConfig::default();
        assert_eq!(
            catalog.cache_path(),
            std::env::temp_dir().join("stockpot-catalog")
        );
    }

    #[test]
    fn cache_dir_overrides_cache_name() {
        let catalog = CatalogConfig {
            cache_dir: Some(PathBuf::from("/var/cache/catalog")),
            ..CatalogConfig::default()
        };
        assert_eq!(catalog.cache_path(), PathBuf::from("/var/cache/catalog"));
    }
}
