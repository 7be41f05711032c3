//! Typed messages exchanged between contexts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::HelperHandle;

/// Which part of the agent UI a driver failed to resolve.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementRole {
    Input,
    Submit,
    Response,
    Login,
}

impl ElementRole {
    pub fn name(&self) -> &'static str {
        match self {
            ElementRole::Input => "input",
            ElementRole::Submit => "submit",
            ElementRole::Response => "response",
            ElementRole::Login => "login",
        }
    }
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orchestrator → driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum DriverCommand {
    PerformFactCheck { text: String },
}

/// Driver → orchestrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DriverEvent {
    Ready,
    FactCheckResult {
        result: String,
    },
    FactCheckError {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<ElementRole>,
    },
}

/// A message stamped with the helper surface it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<E> {
    pub sender: HelperHandle,
    pub event: E,
}

impl<E> Envelope<E> {
    pub fn new(sender: HelperHandle, event: E) -> Self {
        Self { sender, event }
    }
}

/// Lifecycle notifications raised by a helper host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface finished loading its document.
    LoadComplete(HelperHandle),
    /// The surface disappeared without the orchestrator closing it.
    Removed(HelperHandle),
}

impl SurfaceEvent {
    pub fn handle(&self) -> &HelperHandle {
        match self {
            SurfaceEvent::LoadComplete(handle) | SurfaceEvent::Removed(handle) => handle,
        }
    }
}

/// Inbound request to the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckRequest {
    pub text: String,
}

/// Reply to a [`FactCheckRequest`]. Errors never cross the boundary any other way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FactCheckResponse {
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}
