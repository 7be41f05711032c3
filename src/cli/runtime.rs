use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => Some(path.clone()),
        None => default_config_path(),
    };

    match config_path {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;
            info!("Loaded configuration from: {}", path.display());
            Ok(LoadedConfig {
                config,
                path: Some(path),
            })
        }
        Some(path) => {
            warn!("Config file not found, using defaults: {}", path.display());
            Ok(LoadedConfig {
                config: Config::default(),
                path: None,
            })
        }
        None => {
            warn!("No config directory available, using defaults");
            Ok(LoadedConfig {
                config: Config::default(),
                path: None,
            })
        }
    }
}

// Priority: ./config/config.yaml > <config dir>/factlens/config.yaml
fn default_config_path() -> Option<PathBuf> {
    let local_config = PathBuf::from("config/config.yaml");
    if local_config.exists() {
        return Some(local_config);
    }
    let mut path = dirs::config_dir()?;
    path.push("factlens");
    path.push("config.yaml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "relay:\n  bind: 0.0.0.0:9000\n").unwrap();

        let loaded = load_config(Some(&path)).await.unwrap();
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.relay.bind, "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn missing_explicit_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let loaded = load_config(Some(&path)).await.unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.config, Config::default());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "relay: [unclosed").unwrap();

        assert!(load_config(Some(&path)).await.is_err());
    }
}
