use std::fmt;

use serde::Serialize;

/// Driver progress through one fact-check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    WaitingForInput,
    InputReady,
    Submitted,
    WaitingForResponse,
    Stable,
    Emitted,
    Error,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::WaitingForInput => "waiting_for_input",
            DriverState::InputReady => "input_ready",
            DriverState::Submitted => "submitted",
            DriverState::WaitingForResponse => "waiting_for_response",
            DriverState::Stable => "stable",
            DriverState::Emitted => "emitted",
            DriverState::Error => "error",
        };
        f.write_str(name)
    }
}
