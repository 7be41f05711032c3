//! Driver for the agent chat UI running inside a helper surface.
//!
//! The driver only talks to the page through [`DomPort`] and to the
//! orchestrator through the event bus, so it runs unchanged against a real
//! browser tab or a scripted fake.

pub mod driver;
pub mod errors;
pub mod ports;
pub mod profile;
pub mod stability;
pub mod state;
pub mod wait;

pub use driver::{normalize_response, ChatDriver};
pub use errors::DriverError;
pub use ports::DomPort;
pub use profile::{DriverProfile, ResponseProbe, SelectorProbe};
pub use stability::StabilityTracker;
pub use state::DriverState;
pub use wait::{poll_until, PollError};
