use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;
use tracing::info;

use factlens_cdp_adapter::ChromiumHost;
use factlens_orchestrator::{FactCheckOrchestrator, HelperHost, JsonFileStore, KeyValueStore};

use crate::config::Config;

/// Shared services for one process. The browser is launched on first use.
pub struct AppContext {
    config: Arc<Config>,
    store: Arc<dyn KeyValueStore>,
    host: OnceCell<Arc<ChromiumHost>>,
    orchestrator: OnceCell<Arc<FactCheckOrchestrator>>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let path = config.storage.resolved_path();
        info!(store = %path.display(), "using key-value store");
        Self {
            store: Arc::new(JsonFileStore::new(path)),
            config: Arc::new(config),
            host: OnceCell::new(),
            orchestrator: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub async fn host(&self) -> Result<Arc<ChromiumHost>> {
        self.host
            .get_or_try_init(|| async {
                let host = ChromiumHost::launch(
                    self.config.helper.clone(),
                    self.config.driver.clone(),
                )
                .await
                .context("Failed to launch Chromium")?;
                Ok::<_, anyhow::Error>(Arc::new(host))
            })
            .await
            .map(Arc::clone)
    }

    pub async fn orchestrator(&self) -> Result<Arc<FactCheckOrchestrator>> {
        self.orchestrator
            .get_or_try_init(|| async {
                let host: Arc<dyn HelperHost> = self.host().await?;
                Ok::<_, anyhow::Error>(Arc::new(FactCheckOrchestrator::new(
                    host,
                    self.store(),
                    self.config.orchestrator.clone(),
                )))
            })
            .await
            .map(Arc::clone)
    }

    /// Close the browser if it was ever launched.
    pub async fn shutdown(&self) {
        if let Some(host) = self.host.get() {
            host.shutdown().await;
        }
    }
}
