use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use factlens_chat_driver::{ChatDriver, DriverProfile};
use factlens_core_types::{DriverCommand, DriverEvent, HelperHandle, SurfaceEvent};
use factlens_event_bus::Outbox;
use factlens_orchestrator::{HelperHost, HostError};

use crate::config::ChromiumConfig;
use crate::detect::detect_chrome_executable;
use crate::dom::ChromiumDom;
use crate::error::AdapterError;

const SURFACE_EVENT_CAPACITY: usize = 64;

struct Surface {
    page: Page,
    cancel: CancellationToken,
    commands: Option<mpsc::Sender<DriverCommand>>,
}

/// [`HelperHost`] whose surfaces are tabs of one launched Chromium.
pub struct ChromiumHost {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    surfaces: Arc<DashMap<HelperHandle, Surface>>,
    events: broadcast::Sender<SurfaceEvent>,
    profile: DriverProfile,
    config: ChromiumConfig,
}

impl ChromiumHost {
    pub async fn launch(config: ChromiumConfig, profile: DriverProfile) -> Result<Self, AdapterError> {
        let browser_config = browser_config(&config)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|err| AdapterError::Launch(err.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(error = %err, "cdp handler event error");
                }
            }
            debug!("cdp handler finished");
        });

        let (events, _) = broadcast::channel(SURFACE_EVENT_CAPACITY);
        info!(headless = config.headless, "chromium launched");
        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            surfaces: Arc::new(DashMap::new()),
            events,
            profile,
            config,
        })
    }

    /// Close every surface and the browser.
    pub async fn shutdown(&self) {
        let handles: Vec<HelperHandle> = self.surfaces.iter().map(|e| e.key().clone()).collect();
        for handle in handles {
            let _ = self.close_surface(&handle).await;
        }
        let mut browser = self.browser.lock().await;
        if let Err(err) = browser.close().await {
            warn!(error = %err, "browser close failed");
        }
        let _ = browser.wait().await;
        self.handler.abort();
    }

    /// Report `LoadComplete` after the first navigation, then watch for the
    /// tab going away underneath us.
    fn watch_surface(&self, handle: HelperHandle, page: Page, cancel: CancellationToken) {
        let events = self.events.clone();
        let surfaces = Arc::clone(&self.surfaces);
        let interval = self.config.watch_interval();
        tokio::spawn(async move {
            let loaded = tokio::select! {
                _ = cancel.cancelled() => return,
                nav = page.wait_for_navigation() => nav.is_ok(),
            };
            if loaded {
                debug!(helper = %handle, "surface loaded");
                let _ = events.send(SurfaceEvent::LoadComplete(handle.clone()));
            }

            loop {
                if loaded {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = sleep(interval) => {}
                    }
                }
                if !loaded || page.url().await.is_err() {
                    if let Some((_, surface)) = surfaces.remove(&handle) {
                        surface.cancel.cancel();
                        info!(helper = %handle, "surface closed outside the orchestrator");
                        let _ = events.send(SurfaceEvent::Removed(handle.clone()));
                    }
                    return;
                }
            }
        });
    }
}

#[async_trait]
impl HelperHost for ChromiumHost {
    #[instrument(skip(self))]
    async fn open_surface(&self, url: &str) -> Result<HelperHandle, HostError> {
        let page = self
            .browser
            .lock()
            .await
            .new_page(url)
            .await
            .map_err(|err| HostError::Open(err.to_string()))?;
        let handle = HelperHandle::new();
        let cancel = CancellationToken::new();
        self.surfaces.insert(
            handle.clone(),
            Surface {
                page: page.clone(),
                cancel: cancel.clone(),
                commands: None,
            },
        );
        self.watch_surface(handle.clone(), page, cancel);
        Ok(handle)
    }

    async fn surface_exists(&self, handle: &HelperHandle) -> bool {
        let page = match self.surfaces.get(handle) {
            Some(surface) => surface.page.clone(),
            None => return false,
        };
        page.url().await.is_ok()
    }

    async fn inject_driver(
        &self,
        handle: &HelperHandle,
        outbox: Outbox<DriverEvent>,
    ) -> Result<(), HostError> {
        let (tx, rx) = mpsc::channel(4);
        let (page, cancel) = {
            let mut surface = self
                .surfaces
                .get_mut(handle)
                .ok_or_else(|| HostError::UnknownSurface(handle.to_string()))?;
            if surface.commands.is_some() {
                return Err(HostError::Injection("driver already running".to_string()));
            }
            surface.commands = Some(tx);
            (surface.page.clone(), surface.cancel.clone())
        };

        let dom = Arc::new(ChromiumDom::new(page));
        let profile = self.profile.clone();
        let helper = handle.clone();
        tokio::spawn(async move {
            let mut driver = ChatDriver::new(dom, profile, outbox);
            tokio::select! {
                _ = cancel.cancelled() => debug!(helper = %helper, "driver cancelled"),
                state = driver.run(rx) => debug!(helper = %helper, %state, "driver finished"),
            }
        });
        Ok(())
    }

    async fn send_command(
        &self,
        handle: &HelperHandle,
        command: DriverCommand,
    ) -> Result<(), HostError> {
        let sender = self
            .surfaces
            .get(handle)
            .and_then(|surface| surface.commands.clone())
            .ok_or_else(|| HostError::Command(format!("no driver running in {handle}")))?;
        sender
            .send(command)
            .await
            .map_err(|_| HostError::Command("driver stopped listening".to_string()))
    }

    async fn close_surface(&self, handle: &HelperHandle) -> Result<(), HostError> {
        let Some((_, surface)) = self.surfaces.remove(handle) else {
            debug!(helper = %handle, "surface already closed");
            return Ok(());
        };
        surface.cancel.cancel();
        surface
            .page
            .close()
            .await
            .map_err(|err| HostError::Close(err.to_string()))
    }

    fn surface_events(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }
}

impl Drop for ChromiumHost {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn browser_config(config: &ChromiumConfig) -> Result<BrowserConfig, AdapterError> {
    let executable = config
        .chrome_path
        .clone()
        .or_else(detect_chrome_executable)
        .ok_or(AdapterError::ChromeNotFound)?;

    let mut builder = BrowserConfig::builder()
        .chrome_executable(executable)
        .launch_timeout(config.launch_timeout())
        .request_timeout(config.request_timeout())
        .args(vec![
            "--disable-background-timer-throttling",
            "--disable-default-apps",
            "--disable-dev-shm-usage",
            "--no-first-run",
            "--no-default-browser-check",
        ]);
    if !config.headless {
        builder = builder.with_head();
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }
    if let Some(dir) = &config.user_data_dir {
        builder = builder.user_data_dir(dir);
    }
    builder.build().map_err(AdapterError::Config)
}
