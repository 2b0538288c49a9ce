use anyhow::Result;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use uuid::Uuid;

use crate::core::bluetooth::{DEVICE_NAME_FILTERS, OPTIONAL_SERVICE_UUIDS};
use crate::utils::ensure_directory_exists;

const CONFIG_FILE_NAME: &str = "session_config.json";

/// Device-selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Exact peripheral names the picker may select
    pub name_filters: Vec<String>,
    /// Services the session intends to access after connecting
    pub optional_service_uuids: Vec<Uuid>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            name_filters: DEVICE_NAME_FILTERS.iter().map(|s| s.to_string()).collect(),
            optional_service_uuids: OPTIONAL_SERVICE_UUIDS.to_vec(),
        }
    }
}

impl SessionConfig {
    /// Loads the config from a configuration file.
    pub async fn load_config(config_dir: &Path) -> Result<Self> {
        let file_path = config_dir.join(CONFIG_FILE_NAME);
        let file_path_str = file_path.to_string_lossy().into_owned();

        if !file_path.exists() {
            warn!(
                "Session config file not found at {:?}, using default.",
                file_path_str
            );
            return Ok(Self::default());
        }

        let config_json = fs::read_to_string(file_path).await?;
        let config: Self = serde_json::from_str(&config_json)?;

        info!("Session config loaded from {:?}", file_path_str);
        Ok(config)
    }

    /// Saves the current config to a configuration file.
    pub async fn save_config(&self, config_dir: &Path) -> Result<()> {
        ensure_directory_exists(config_dir).await?;

        let file_path = config_dir.join(CONFIG_FILE_NAME);
        let file_path_str = file_path.to_string_lossy().into_owned();

        let config_json = match serde_json::to_string_pretty(&self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize session config to JSON: {}", e);
                return Err(e.into());
            }
        };

        fs::write(file_path, config_json).await?;
        info!("Session config saved to {:?}", file_path_str);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_carries_the_name_allow_list() {
        let config = SessionConfig::default();
        assert_eq!(
            config.name_filters,
            vec!["P2PSRV1", "HRSTM", "DT_SERVER", "STM_OTA", "MyCST"]
        );
        assert_eq!(config.optional_service_uuids.len(), 4);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!(
            "gatt-explorer-config-test-{}",
            std::process::id()
        ));
        let config = SessionConfig {
            name_filters: vec!["HRSTM".to_string()],
            optional_service_uuids: OPTIONAL_SERVICE_UUIDS[..1].to_vec(),
        };
        config.save_config(&dir).await.expect("save should succeed");

        let loaded = SessionConfig::load_config(&dir)
            .await
            .expect("load should succeed");
        assert_eq!(loaded.name_filters, config.name_filters);
        assert_eq!(loaded.optional_service_uuids, config.optional_service_uuids);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_default() {
        let dir = std::env::temp_dir().join("gatt-explorer-missing-config");
        let config = SessionConfig::load_config(&dir)
            .await
            .expect("fallback should succeed");
        assert_eq!(config.name_filters.len(), 5);
    }
}
