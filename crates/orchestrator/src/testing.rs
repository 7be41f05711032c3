//! In-memory [`HelperHost`] for exercising the orchestrator without a browser.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use factlens_core_types::{DriverCommand, DriverEvent, ElementRole, HelperHandle, SurfaceEvent};
use factlens_event_bus::Outbox;

use crate::errors::HostError;
use crate::ports::HelperHost;

/// How the fake driver behaves once it receives its command.
#[derive(Clone, Debug)]
pub enum DriverScript {
    Respond(String),
    Fail {
        error: String,
        role: Option<ElementRole>,
    },
    /// Loads and reports ready, then never answers.
    Silent,
    /// The surface is removed right after opening.
    ClosedByUser,
    /// The prompt is delivered, then the surface is removed while the
    /// session waits for an answer.
    ClosedAfterPrompt,
}

pub struct FakeHost {
    script: DriverScript,
    fail_open: bool,
    forged_reply: Option<String>,
    events: broadcast::Sender<SurfaceEvent>,
    opened: Mutex<Vec<HelperHandle>>,
    closes: Mutex<HashMap<HelperHandle, usize>>,
    outboxes: Mutex<HashMap<HelperHandle, Outbox<DriverEvent>>>,
    commands: Mutex<Vec<DriverCommand>>,
}

impl FakeHost {
    pub fn new(script: DriverScript) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            script,
            fail_open: false,
            forged_reply: None,
            events,
            opened: Mutex::new(Vec::new()),
            closes: Mutex::new(HashMap::new()),
            outboxes: Mutex::new(HashMap::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Every `open_surface` call fails.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Before answering, a different surface publishes `reply` on the same bus.
    pub fn with_forged_reply(mut self, reply: impl Into<String>) -> Self {
        self.forged_reply = Some(reply.into());
        self
    }

    pub fn opened(&self) -> Vec<HelperHandle> {
        self.opened.lock().clone()
    }

    pub fn close_count(&self, handle: &HelperHandle) -> usize {
        self.closes.lock().get(handle).copied().unwrap_or(0)
    }

    pub fn commands(&self) -> Vec<DriverCommand> {
        self.commands.lock().clone()
    }

    fn outbox(&self, handle: &HelperHandle) -> Result<Outbox<DriverEvent>, HostError> {
        self.outboxes
            .lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| HostError::UnknownSurface(handle.to_string()))
    }
}

#[async_trait]
impl HelperHost for FakeHost {
    async fn open_surface(&self, _url: &str) -> Result<HelperHandle, HostError> {
        if self.fail_open {
            return Err(HostError::Open("browser unavailable".to_string()));
        }
        let handle = HelperHandle::new();
        self.opened.lock().push(handle.clone());
        let event = match self.script {
            DriverScript::ClosedByUser => SurfaceEvent::Removed(handle.clone()),
            _ => SurfaceEvent::LoadComplete(handle.clone()),
        };
        let _ = self.events.send(event);
        Ok(handle)
    }

    async fn surface_exists(&self, handle: &HelperHandle) -> bool {
        self.opened.lock().contains(handle) && self.close_count(handle) == 0
    }

    async fn inject_driver(
        &self,
        handle: &HelperHandle,
        outbox: Outbox<DriverEvent>,
    ) -> Result<(), HostError> {
        self.outboxes.lock().insert(handle.clone(), outbox.clone());
        outbox
            .emit(DriverEvent::Ready)
            .await
            .map_err(|err| HostError::Injection(err.to_string()))
    }

    async fn send_command(
        &self,
        handle: &HelperHandle,
        command: DriverCommand,
    ) -> Result<(), HostError> {
        self.commands.lock().push(command);
        let outbox = self.outbox(handle)?;

        if let Some(forged) = &self.forged_reply {
            let intruder = outbox.with_sender(HelperHandle::from("intruder"));
            let _ = intruder
                .emit(DriverEvent::FactCheckResult {
                    result: forged.clone(),
                })
                .await;
        }

        let reply = match &self.script {
            DriverScript::Respond(result) => DriverEvent::FactCheckResult {
                result: result.clone(),
            },
            DriverScript::Fail { error, role } => DriverEvent::FactCheckError {
                error: error.clone(),
                role: *role,
            },
            DriverScript::ClosedAfterPrompt => {
                let _ = self.events.send(SurfaceEvent::Removed(handle.clone()));
                return Ok(());
            }
            DriverScript::Silent | DriverScript::ClosedByUser => return Ok(()),
        };
        outbox
            .emit(reply)
            .await
            .map_err(|err| HostError::Command(err.to_string()))
    }

    async fn close_surface(&self, handle: &HelperHandle) -> Result<(), HostError> {
        *self.closes.lock().entry(handle.clone()).or_insert(0) += 1;
        self.outboxes.lock().remove(handle);
        Ok(())
    }

    fn surface_events(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }
}
