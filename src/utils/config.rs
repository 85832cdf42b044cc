use crate::models::types::GlobalConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct ConfigManager {
    pub global: GlobalConfig,
    config_path: String,
}

impl ConfigManager {
    pub fn new(config_path: &str) -> Result<Self, ConfigError> {
        let mut manager = Self {
            global: GlobalConfig::default(),
            config_path: config_path.to_string(),
        };

        manager.load_config()?;
        Ok(manager)
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        if Path::new(&self.config_path).exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let config_data: ConfigData = serde_json::from_str(&content)?;

            self.global = config_data.global.unwrap_or_default();
        } else {
            self.save_config()?;
        }

        Ok(())
    }

    fn save_config(&self) -> Result<(), ConfigError> {
        let config_data = ConfigData {
            global: Some(self.global.clone()),
        };

        let content = serde_json::to_string_pretty(&config_data)?;
        fs::write(&self.config_path, content)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigData {
    global: Option<GlobalConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("staff-bot-{}-{}.json", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_config_manager_creates_defaults() {
        let path = temp_path("defaults");
        let _ = fs::remove_file(&path);

        let config = ConfigManager::new(&path).expect("Failed to create ConfigManager in test");
        assert_eq!(config.global.prefix, "!");
        assert!(Path::new(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_config_manager_reads_existing_file() {
        let path = temp_path("existing");
        fs::write(
            &path,
            r#"{ "global": { "prefix": "?", "owners": [42], "startup_notification": false } }"#,
        )
        .unwrap();

        let config = ConfigManager::new(&path).unwrap();
        assert_eq!(config.global.prefix, "?");
        assert_eq!(config.global.owners, vec![42]);
        assert!(!config.global.startup_notification);
        assert_eq!(config.global.log_file.as_deref(), Some("bot.log"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_config_manager_rejects_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(ConfigManager::new(&path), Err(ConfigError::Serde(_))));

        let _ = fs::remove_file(&path);
    }
}
