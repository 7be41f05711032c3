use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, instrument, warn};

use factlens_core_types::{
    DriverCommand, DriverEvent, ElementRole, Envelope, HelperHandle, SurfaceEvent,
};
use factlens_event_bus::{EventBus, InMemoryBus, Outbox, ScopedReceiver};

use crate::config::OrchestratorConfig;
use crate::credentials::{load_credentials, persist_credentials, CredentialBundle};
use crate::errors::FactCheckError;
use crate::ports::HelperHost;
use crate::prompt::format_prompt;
use crate::session::{SessionGuard, LAST_SESSION_KEY};
use crate::status::{FactCheckStatus, StatusListener};
use crate::store::KeyValueStore;

const BUS_CAPACITY: usize = 64;

pub struct FactCheckOrchestrator {
    host: Arc<dyn HelperHost>,
    store: Arc<dyn KeyValueStore>,
    config: OrchestratorConfig,
    driver_bus: Arc<InMemoryBus<Envelope<DriverEvent>>>,
    status_bus: Arc<InMemoryBus<FactCheckStatus>>,
    in_progress: AtomicBool,
}

impl FactCheckOrchestrator {
    pub fn new(
        host: Arc<dyn HelperHost>,
        store: Arc<dyn KeyValueStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            host,
            store,
            config,
            driver_bus: InMemoryBus::new(BUS_CAPACITY),
            status_bus: InMemoryBus::new(BUS_CAPACITY),
            in_progress: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub fn add_status_listener(&self) -> StatusListener {
        StatusListener::new(self.status_bus.subscribe())
    }

    /// Fact-check with explicit credentials, or the ones in the store.
    pub async fn check_text(
        &self,
        text: &str,
        credentials: Option<&CredentialBundle>,
    ) -> Result<String, FactCheckError> {
        if let Some(bundle) = credentials {
            return self.perform_fact_check(text, Some(bundle)).await;
        }
        if self.is_busy() {
            return Err(FactCheckError::ConcurrentSessionRejected);
        }
        let stored = load_credentials(self.store.as_ref()).await?;
        self.perform_fact_check(text, stored.as_ref()).await
    }

    /// Run one full session against the helper surface.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn perform_fact_check(
        &self,
        text: &str,
        credentials: Option<&CredentialBundle>,
    ) -> Result<String, FactCheckError> {
        let guard = SessionGuard::acquire(&self.in_progress).ok_or_else(|| {
            warn!("rejecting request, a session is already running");
            FactCheckError::ConcurrentSessionRejected
        })?;

        if text.trim().is_empty() {
            return Err(FactCheckError::InvalidInput);
        }
        let Some(credentials) = credentials.filter(|c| c.is_present()) else {
            return Err(FactCheckError::MissingCredentials);
        };

        info!(session = %guard.id, "fact-check session starting");
        self.publish_status(FactCheckStatus::Starting).await;

        let prompt = format_prompt(text, self.config.prompt_cap_chars);
        let outcome = self.run_session(prompt, credentials).await;

        let record = match &outcome {
            Ok(result) => {
                info!(session = %guard.id, chars = result.chars().count(), "fact-check completed");
                self.publish_status(FactCheckStatus::Completed).await;
                guard.finish(Ok(result.as_str()))
            }
            Err(err) => {
                error!(session = %guard.id, error = %err, "fact-check failed");
                self.publish_status(FactCheckStatus::Error {
                    message: err.to_string(),
                })
                .await;
                guard.finish(Err(&err.to_string()))
            }
        };
        match serde_json::to_value(&record) {
            Ok(value) => {
                if let Err(err) = self.store.set(LAST_SESSION_KEY, value).await {
                    warn!(error = %err, "could not record last session");
                }
            }
            Err(err) => warn!(error = %err, "could not encode last session"),
        }

        outcome
    }

    async fn run_session(
        &self,
        prompt: String,
        credentials: &CredentialBundle,
    ) -> Result<String, FactCheckError> {
        persist_credentials(self.store.as_ref(), credentials).await?;

        let mut surface_events = self.host.surface_events();
        let driver_events = self.driver_bus.subscribe();
        let mut lease = SurfaceLease::new(Arc::clone(&self.host));

        let outcome = timeout(
            self.config.timeout(),
            self.drive(&prompt, &mut lease.handle, &mut surface_events, driver_events),
        )
        .await
        .unwrap_or_else(|_| {
            warn!(timeout_ms = self.config.timeout_ms, "fact-check deadline expired");
            Err(FactCheckError::Timeout(self.config.timeout_ms))
        });

        lease.close().await;
        outcome
    }

    async fn drive(
        &self,
        prompt: &str,
        opened: &mut Option<HelperHandle>,
        surface_events: &mut broadcast::Receiver<SurfaceEvent>,
        driver_events: broadcast::Receiver<Envelope<DriverEvent>>,
    ) -> Result<String, FactCheckError> {
        let handle = self
            .host
            .open_surface(&self.config.target_url)
            .await
            .map_err(|err| FactCheckError::HelperSurfaceUnavailable(err.to_string()))?;
        *opened = Some(handle.clone());
        info!(helper = %handle, url = %self.config.target_url, "helper surface opened");

        let mut driver_events = ScopedReceiver::new(driver_events, handle.clone());

        loop {
            tokio::select! {
                surface = surface_events.recv() => match surface {
                    Ok(SurfaceEvent::LoadComplete(loaded)) if loaded == handle => {
                        self.inject(&handle).await?;
                    }
                    Ok(SurfaceEvent::Removed(removed)) if removed == handle => {
                        return Err(FactCheckError::HelperSurfaceUnavailable(
                            "helper surface was closed before a response arrived".to_string(),
                        ));
                    }
                    Ok(other) => debug!(helper = %other.handle(), "ignoring foreign surface event"),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "surface events lagged"),
                    Err(RecvError::Closed) => {
                        return Err(FactCheckError::HelperSurfaceUnavailable(
                            "helper host shut down".to_string(),
                        ));
                    }
                },
                event = driver_events.recv() => match event {
                    Some(DriverEvent::Ready) => {
                        debug!(helper = %handle, "driver ready, sending prompt");
                        self.host
                            .send_command(
                                &handle,
                                DriverCommand::PerformFactCheck { text: prompt.to_string() },
                            )
                            .await
                            .map_err(|err| FactCheckError::HelperSurfaceUnavailable(err.to_string()))?;
                    }
                    Some(DriverEvent::FactCheckResult { result }) => return Ok(result),
                    Some(DriverEvent::FactCheckError { error, role }) => {
                        return Err(driver_failure(error, role));
                    }
                    None => {
                        return Err(FactCheckError::HelperSurfaceUnavailable(
                            "driver channel closed".to_string(),
                        ));
                    }
                },
            }
        }
    }

    async fn inject(&self, handle: &HelperHandle) -> Result<(), FactCheckError> {
        if !self.host.surface_exists(handle).await {
            return Err(FactCheckError::HelperSurfaceUnavailable(
                "helper surface disappeared after loading".to_string(),
            ));
        }
        sleep(self.config.settle()).await;
        let outbox = Outbox::new(handle.clone(), Arc::clone(&self.driver_bus));
        self.host
            .inject_driver(handle, outbox)
            .await
            .map_err(|err| FactCheckError::HelperSurfaceUnavailable(err.to_string()))?;
        debug!(helper = %handle, "driver injected");
        Ok(())
    }

    async fn publish_status(&self, status: FactCheckStatus) {
        if self.status_bus.publish(status).await.is_err() {
            debug!("no status listeners registered");
        }
    }
}

/// Owns the opened surface for one session. Closed explicitly on every
/// completed path; if the session future is dropped first, the close runs on
/// a spawned task instead.
struct SurfaceLease {
    host: Arc<dyn HelperHost>,
    handle: Option<HelperHandle>,
}

impl SurfaceLease {
    fn new(host: Arc<dyn HelperHost>) -> Self {
        Self { host, handle: None }
    }

    async fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            close_surface(self.host.as_ref(), &handle).await;
        }
    }
}

impl Drop for SurfaceLease {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        warn!(helper = %handle, "session abandoned, closing helper surface in background");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let host = Arc::clone(&self.host);
                runtime.spawn(async move { close_surface(host.as_ref(), &handle).await });
            }
            Err(_) => error!(helper = %handle, "no runtime left to close helper surface"),
        }
    }
}

async fn close_surface(host: &dyn HelperHost, handle: &HelperHandle) {
    debug!(helper = %handle, "closing helper surface");
    if let Err(err) = host.close_surface(handle).await {
        warn!(helper = %handle, error = %err, "helper surface close failed");
    }
}

fn driver_failure(error: String, role: Option<ElementRole>) -> FactCheckError {
    match role {
        Some(role @ (ElementRole::Input | ElementRole::Submit | ElementRole::Response)) => {
            FactCheckError::ElementNotFound { role }
        }
        _ => FactCheckError::Agent(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LastSessionRecord;
    use crate::store::InMemoryStore;
    use crate::testing::{DriverScript, FakeHost};
    use serde_json::json;
    use std::time::Duration;

    fn orchestrator(host: Arc<FakeHost>) -> (Arc<FactCheckOrchestrator>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let orch = FactCheckOrchestrator::new(host, store.clone(), OrchestratorConfig::default());
        (Arc::new(orch), store)
    }

    fn creds() -> CredentialBundle {
        CredentialBundle::from_token("token")
    }

    #[tokio::test(start_paused = true)]
    async fn normal_completion_closes_once() {
        let host = Arc::new(FakeHost::new(DriverScript::Respond("Claim 1: ok True".into())));
        let (orch, store) = orchestrator(host.clone());

        let out = orch.perform_fact_check("The sky is green.", Some(&creds())).await;

        assert_eq!(out, Ok("Claim 1: ok True".to_string()));
        assert_eq!(host.opened().len(), 1);
        assert_eq!(host.close_count(&host.opened()[0]), 1);
        let sent = host.commands();
        assert_eq!(sent.len(), 1);
        let DriverCommand::PerformFactCheck { text } = &sent[0];
        assert!(text.contains("The sky is green."));
        assert_eq!(
            store.get("grok_auth_tokens").await.unwrap(),
            Some(json!({ "accessToken": "token" }))
        );
        assert!(!orch.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_error_closes_once() {
        let host = Arc::new(FakeHost::new(DriverScript::Fail {
            error: "input element not found".into(),
            role: Some(ElementRole::Input),
        }));
        let (orch, _) = orchestrator(host.clone());

        let out = orch.perform_fact_check("text", Some(&creds())).await;

        assert_eq!(
            out,
            Err(FactCheckError::ElementNotFound {
                role: ElementRole::Input
            })
        );
        assert_eq!(host.close_count(&host.opened()[0]), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn login_error_is_agent_error() {
        let host = Arc::new(FakeHost::new(DriverScript::Fail {
            error: "please sign in".into(),
            role: Some(ElementRole::Login),
        }));
        let (orch, _) = orchestrator(host);
        let out = orch.perform_fact_check("text", Some(&creds())).await;
        assert_eq!(out, Err(FactCheckError::Agent("please sign in".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_closes_once() {
        let host = Arc::new(FakeHost::new(DriverScript::Silent));
        let (orch, _) = orchestrator(host.clone());

        let out = orch.perform_fact_check("text", Some(&creds())).await;

        assert_eq!(out, Err(FactCheckError::Timeout(60_000)));
        assert_eq!(host.close_count(&host.opened()[0]), 1);
        assert!(!orch.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn user_closing_surface_closes_once() {
        let host = Arc::new(FakeHost::new(DriverScript::ClosedByUser));
        let (orch, _) = orchestrator(host.clone());

        let out = orch.perform_fact_check("text", Some(&creds())).await;

        assert!(matches!(out, Err(FactCheckError::HelperSurfaceUnavailable(_))));
        assert_eq!(host.close_count(&host.opened()[0]), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn surface_removed_while_waiting_closes_once() {
        let host = Arc::new(FakeHost::new(DriverScript::ClosedAfterPrompt));
        let (orch, _) = orchestrator(host.clone());

        let out = orch.perform_fact_check("text", Some(&creds())).await;

        assert!(matches!(out, Err(FactCheckError::HelperSurfaceUnavailable(_))));
        assert_eq!(host.commands().len(), 1);
        assert_eq!(host.close_count(&host.opened()[0]), 1);
        assert!(!orch.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_caller_still_closes_surface() {
        let host = Arc::new(FakeHost::new(DriverScript::Silent));
        let (orch, _) = orchestrator(host.clone());

        let task = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.perform_fact_check("text", Some(&creds())).await })
        };
        sleep(Duration::from_secs(5)).await;
        assert_eq!(host.commands().len(), 1);
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        sleep(Duration::from_secs(120)).await;

        assert!(!orch.is_busy());
        assert_eq!(host.opened().len(), 1);
        assert_eq!(host.close_count(&host.opened()[0]), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unsettled_response_is_agent_error() {
        let host = Arc::new(FakeHost::new(DriverScript::Fail {
            error: "response did not settle within 55000ms".into(),
            role: None,
        }));
        let (orch, _) = orchestrator(host.clone());
        let out = orch.perform_fact_check("text", Some(&creds())).await;
        assert_eq!(
            out,
            Err(FactCheckError::Agent("response did not settle within 55000ms".into()))
        );
        assert_eq!(host.close_count(&host.opened()[0]), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn open_failure_needs_no_close() {
        let host = Arc::new(FakeHost::new(DriverScript::Respond("x".into())).failing_open());
        let (orch, _) = orchestrator(host.clone());
        let out = orch.perform_fact_check("text", Some(&creds())).await;
        assert!(matches!(out, Err(FactCheckError::HelperSurfaceUnavailable(_))));
        assert!(host.opened().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_request_is_rejected() {
        let host = Arc::new(FakeHost::new(DriverScript::Silent));
        let (orch, _) = orchestrator(host.clone());

        let first = {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move { orch.perform_fact_check("first", Some(&creds())).await })
        };
        while !orch.is_busy() {
            tokio::task::yield_now().await;
        }

        let second = orch.perform_fact_check("second", Some(&creds())).await;
        assert_eq!(second, Err(FactCheckError::ConcurrentSessionRejected));

        assert_eq!(first.await.unwrap(), Err(FactCheckError::Timeout(60_000)));
        assert_eq!(host.opened().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn preconditions_open_nothing() {
        let host = Arc::new(FakeHost::new(DriverScript::Respond("x".into())));
        let (orch, _) = orchestrator(host.clone());

        assert_eq!(
            orch.perform_fact_check("   ", Some(&creds())).await,
            Err(FactCheckError::InvalidInput)
        );
        assert_eq!(
            orch.perform_fact_check("text", None).await,
            Err(FactCheckError::MissingCredentials)
        );
        assert_eq!(
            orch.perform_fact_check("text", Some(&CredentialBundle::from_token(""))).await,
            Err(FactCheckError::MissingCredentials)
        );
        assert!(host.opened().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn foreign_driver_messages_are_ignored() {
        let host = Arc::new(
            FakeHost::new(DriverScript::Respond("genuine".into())).with_forged_reply("forged"),
        );
        let (orch, _) = orchestrator(host);
        let out = orch.perform_fact_check("text", Some(&creds())).await;
        assert_eq!(out, Ok("genuine".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn status_listener_sees_lifecycle() {
        let host = Arc::new(FakeHost::new(DriverScript::Respond("done".into())));
        let (orch, _) = orchestrator(host);
        let mut listener = orch.add_status_listener();

        orch.perform_fact_check("text", Some(&creds())).await.unwrap();

        assert_eq!(listener.try_next(), Some(FactCheckStatus::Starting));
        assert_eq!(listener.try_next(), Some(FactCheckStatus::Completed));
        assert_eq!(listener.try_next(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn last_session_is_recorded() {
        let host = Arc::new(FakeHost::new(DriverScript::Silent));
        let (orch, store) = orchestrator(host);
        let _ = orch.perform_fact_check("text", Some(&creds())).await;

        let value = store.get(LAST_SESSION_KEY).await.unwrap().unwrap();
        let record: LastSessionRecord = serde_json::from_value(value).unwrap();
        assert!(!record.success);
        assert_eq!(record.error.as_deref(), Some("fact-check timed out after 60000ms"));
    }
}
