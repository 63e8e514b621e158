use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "alva.config.json";

/// File extension of project files
pub const PROJECT_EXTENSION: &str = "alva";

/// Alva configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name of the first page in new projects
    #[serde(default = "default_page_name")]
    pub default_page_name: String,

    /// Drop selection, highlight and drag state when writing project files
    #[serde(default = "default_true")]
    pub strip_transient_on_save: bool,
}

fn default_page_name() -> String {
    "Page".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_name: default_page_name(),
            strip_transient_on_save: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "defaultPageName": "Home",
            "stripTransientOnSave": false
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_page_name, "Home");
        assert!(!config.strip_transient_on_save);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_page_name, "Page");
        assert!(config.strip_transient_on_save);
    }

    #[test]
    fn test_load_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }
}
