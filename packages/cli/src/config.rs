use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path to the serialized document, relative to the project root
    #[serde(default = "default_document")]
    pub document: String,
}

fn default_document() -> String {
    "site.json".to_string()
}

impl Config {
    /// Load config from a directory, falling back to defaults when no
    /// config file exists
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the document file
    pub fn document_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.document)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{ "document": "pages/home.json" }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.document, "pages/home.json");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document, "site.json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.document, "site.json");
    }
}
