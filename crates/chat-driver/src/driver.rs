//! The driver state machine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use factlens_core_types::{DriverCommand, DriverEvent, ElementRole};
use factlens_event_bus::Outbox;

use crate::errors::DriverError;
use crate::ports::DomPort;
use crate::profile::{DriverProfile, ResponseProbe, SelectorProbe};
use crate::stability::StabilityTracker;
use crate::state::DriverState;
use crate::wait::{poll_until, PollError};

pub struct ChatDriver {
    dom: Arc<dyn DomPort>,
    profile: DriverProfile,
    outbox: Outbox<DriverEvent>,
    state: DriverState,
    history: Vec<DriverState>,
}

impl ChatDriver {
    pub fn new(dom: Arc<dyn DomPort>, profile: DriverProfile, outbox: Outbox<DriverEvent>) -> Self {
        Self {
            dom,
            profile,
            outbox,
            state: DriverState::WaitingForInput,
            history: vec![DriverState::WaitingForInput],
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[DriverState] {
        &self.history
    }

    /// Announce readiness, serve one command, report its outcome.
    #[instrument(skip_all, fields(helper = %self.outbox.sender()))]
    pub async fn run(&mut self, mut commands: mpsc::Receiver<DriverCommand>) -> DriverState {
        self.emit(DriverEvent::Ready).await;

        let Some(command) = commands.recv().await else {
            debug!("command channel closed before any request");
            return self.state;
        };

        let DriverCommand::PerformFactCheck { text } = command;
        match self.perform(&text).await {
            Ok(result) => {
                self.transition(DriverState::Emitted);
                info!(chars = result.chars().count(), "response captured");
                self.emit(DriverEvent::FactCheckResult { result }).await;
            }
            Err(err) => {
                warn!(error = %err, state = %self.state, "fact-check failed");
                self.transition(DriverState::Error);
                self.emit(err.to_event()).await;
            }
        }
        self.state
    }

    async fn perform(&mut self, prompt: &str) -> Result<String, DriverError> {
        self.check_page().await?;
        self.check_login().await?;

        let input = self.discover(ElementRole::Input, &self.profile.input).await?;
        self.write_prompt(&input, prompt).await?;
        self.transition(DriverState::InputReady);

        sleep(Duration::from_millis(self.profile.input_settle_ms)).await;
        let submit = self.discover(ElementRole::Submit, &self.profile.submit).await?;
        self.dom.click(&submit).await?;
        self.transition(DriverState::Submitted);

        let probe = self.discover_response().await?;
        self.transition(DriverState::WaitingForResponse);
        sleep(Duration::from_millis(self.profile.initial_response_delay_ms)).await;
        self.await_stability(&probe).await?;
        self.transition(DriverState::Stable);

        let raw = self
            .dom
            .last_group_text(&probe.group_selector, &probe.item_selector)
            .await?;
        raw.map(|text| normalize_response(&text))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| DriverError::ElementNotFound {
                role: ElementRole::Response,
                tried: vec![probe.items_selector()],
            })
    }

    async fn check_page(&self) -> Result<(), DriverError> {
        if self.profile.expected_host.is_empty() {
            return Ok(());
        }
        let url = self.dom.current_url().await?;
        if url.contains(&self.profile.expected_host) {
            Ok(())
        } else {
            Err(DriverError::WrongPage(url))
        }
    }

    /// A visible login control means signed out. Probe errors are inconclusive.
    async fn check_login(&self) -> Result<(), DriverError> {
        for selector in &self.profile.login_indicators {
            match self.dom.exists(selector).await {
                Ok(true) => {
                    info!(selector = %selector, "login indicator present");
                    return Err(DriverError::NotLoggedIn);
                }
                Ok(false) => {}
                Err(err) => debug!(selector = %selector, error = %err, "login probe inconclusive"),
            }
        }
        Ok(())
    }

    /// First probe whose selector appears within its own timeout.
    async fn discover(
        &self,
        role: ElementRole,
        probes: &[SelectorProbe],
    ) -> Result<String, DriverError> {
        let interval = self.profile.poll_interval();
        for probe in probes {
            let dom = &self.dom;
            let selector = probe.selector.as_str();
            let found = poll_until(
                move || async move { dom.exists(selector).await.map(|hit| hit.then_some(())) },
                interval,
                probe.timeout(),
            )
            .await;
            match found {
                Ok(()) => {
                    debug!(%role, selector, "element located");
                    return Ok(probe.selector.clone());
                }
                Err(PollError::Timeout(_)) => debug!(%role, selector, "selector timed out"),
                Err(PollError::Probe(err)) => {
                    debug!(%role, selector, error = %err, "selector probe failed")
                }
            }
        }
        Err(DriverError::ElementNotFound {
            role,
            tried: probes.iter().map(|p| p.selector.clone()).collect(),
        })
    }

    async fn discover_response(&self) -> Result<ResponseProbe, DriverError> {
        let interval = self.profile.poll_interval();
        for probe in &self.profile.response {
            let dom = &self.dom;
            let selector = probe.group_selector.as_str();
            let found = poll_until(
                move || async move { dom.exists(selector).await.map(|hit| hit.then_some(())) },
                interval,
                probe.timeout(),
            )
            .await;
            if found.is_ok() {
                debug!(selector, "response region located");
                return Ok(probe.clone());
            }
        }
        Err(DriverError::ElementNotFound {
            role: ElementRole::Response,
            tried: self
                .profile
                .response
                .iter()
                .map(|p| p.group_selector.clone())
                .collect(),
        })
    }

    /// Native insertion, then value assignment, then raw text content.
    async fn write_prompt(&self, selector: &str, prompt: &str) -> Result<(), DriverError> {
        self.dom.focus(selector).await?;
        match self.dom.insert_text(selector, prompt).await {
            Ok(()) => return Ok(()),
            Err(err) => debug!(error = %err, "native insertion failed, assigning value"),
        }
        match self.dom.set_value(selector, prompt).await {
            Ok(()) => return Ok(()),
            Err(err) => debug!(error = %err, "value assignment failed, setting text content"),
        }
        self.dom.set_text_content(selector, prompt).await?;
        Ok(())
    }

    async fn await_stability(&self, probe: &ResponseProbe) -> Result<(), DriverError> {
        let tracker = Mutex::new(StabilityTracker::new(self.profile.stability_threshold));
        let tracker = &tracker;
        let dom = &self.dom;
        let items = probe.items_selector();
        let items = items.as_str();
        let timeout_ms = self.profile.stability_timeout_ms;

        poll_until(
            move || async move {
                let count = dom.count(items).await?;
                let mut guard = tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let stable = guard.observe(count);
                debug!(count, quiet_polls = guard.stable_polls(), "response poll");
                Ok::<_, factlens_core_types::CoreError>(stable.then_some(()))
            },
            self.profile.poll_interval(),
            Duration::from_millis(timeout_ms),
        )
        .await
        .map_err(|err| match err {
            PollError::Timeout(_) => DriverError::Unstable(timeout_ms),
            PollError::Probe(err) => DriverError::from(err),
        })
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = %self.state, to = %next, "driver transition");
        self.state = next;
        self.history.push(next);
    }

    async fn emit(&self, event: DriverEvent) {
        if let Err(err) = self.outbox.emit(event).await {
            warn!(error = %err, "no orchestrator listening");
        }
    }
}

/// Unify line endings, collapse horizontal whitespace, keep at most one blank
/// line between paragraphs.
pub fn normalize_response(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    let mut pending_blank = false;
    for line in unified.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&line);
    }
    out
}
