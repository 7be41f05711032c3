use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use factlens_cdp_adapter::ChromiumConfig;
use factlens_chat_driver::DriverProfile;
use factlens_orchestrator::OrchestratorConfig;

const STORE_FILE: &str = "store.json";

/// Top-level `config.yaml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub helper: ChromiumConfig,
    pub orchestrator: OrchestratorConfig,
    pub driver: DriverProfile,
    pub storage: StorageConfig,
    pub relay: RelayConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key-value store file. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("factlens");
        path.push(STORE_FILE);
        path
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub bind: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
helper:
  headless: true
orchestrator:
  timeout_ms: 1500
storage:
  path: /tmp/factlens.json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.helper.headless);
        assert_eq!(config.orchestrator.timeout_ms, 1500);
        assert_eq!(config.orchestrator.prompt_cap_chars, 5000);
        assert_eq!(config.driver, DriverProfile::default());
        assert_eq!(config.relay.bind, "127.0.0.1:8787");
        assert_eq!(
            config.storage.resolved_path(),
            PathBuf::from("/tmp/factlens.json")
        );
    }

    #[test]
    fn default_store_lives_under_factlens() {
        let path = StorageConfig::default().resolved_path();
        assert!(path.ends_with("factlens/store.json"));
    }
}
