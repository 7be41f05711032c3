//! Fact-check orchestration.
//!
//! [`FactCheckOrchestrator`] owns the whole session: it validates the request,
//! hands credentials to the helper context through the key-value store, opens
//! a helper surface, injects the chat driver and relays the driver's answer.
//! The browser and the store are reached only through the ports in
//! [`ports`] and [`store`].

pub mod config;
pub mod credentials;
pub mod errors;
pub mod orchestrator;
pub mod ports;
pub mod prompt;
pub mod session;
pub mod status;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::OrchestratorConfig;
pub use credentials::{
    load_credentials, persist_credentials, save_credentials, CredentialBundle,
};
pub use errors::{FactCheckError, HostError, StoreError};
pub use orchestrator::FactCheckOrchestrator;
pub use ports::HelperHost;
pub use prompt::format_prompt;
pub use session::LastSessionRecord;
pub use status::{FactCheckStatus, StatusListener};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore};
