use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "navboard.config.json";

/// Navboard configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// User whose record is loaded and saved
    pub user_id: String,

    /// Directory holding one persisted record per user
    pub store_dir: String,

    /// Local mirror of the page-config map
    pub mirror_file: String,

    /// Directory the source files live in; the only place sync may write
    pub source_dir: String,

    pub sidebar_file: String,
    pub page_file: String,

    /// Dev endpoint address
    pub host: String,
    pub port: u16,

    /// Write source files after every confirm
    pub sync_on_confirm: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn store_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    pub fn mirror_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.mirror_file)
    }

    pub fn source_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.source_dir)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            store_dir: ".navboard/records".to_string(),
            mirror_file: ".navboard/page-configs.json".to_string(),
            source_dir: "src/config".to_string(),
            sidebar_file: "sidebar.ts".to_string(),
            page_file: "page1.ts".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5174,
            sync_on_confirm: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "userId": "alice",
            "sourceDir": "app/config",
            "port": 8080,
            "syncOnConfirm": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.source_dir, "app/config");
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert!(config.sync_on_confirm);
        // Unset fields keep their defaults
        assert_eq!(config.sidebar_file, "sidebar.ts");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.user_id, "local");
        assert_eq!(config.page_file, "page1.ts");
        assert!(!config.sync_on_confirm);
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        assert_eq!(Config::load(cwd).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"userId":"bob"}"#).unwrap();
        let config = Config::load(cwd).unwrap();
        assert_eq!(config.user_id, "bob");
        assert_eq!(
            config.store_path(cwd),
            dir.path().join(".navboard/records")
        );
    }
}
