use thiserror::Error;

use factlens_core_types::{CoreError, DriverEvent, ElementRole};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("{role} element not found (tried {} selectors)", tried.len())]
    ElementNotFound {
        role: ElementRole,
        tried: Vec<String>,
    },
    #[error("not signed in to the agent; please sign in and try again")]
    NotLoggedIn,
    #[error("helper page is not the agent page: {0}")]
    WrongPage(String),
    #[error("page scripting failed: {0}")]
    Dom(String),
    #[error("response did not settle within {0}ms")]
    Unstable(u64),
    #[error("orchestrator channel closed")]
    ChannelClosed,
}

impl DriverError {
    /// The UI role this failure is about, if any.
    pub fn role(&self) -> Option<ElementRole> {
        match self {
            DriverError::ElementNotFound { role, .. } => Some(*role),
            DriverError::NotLoggedIn => Some(ElementRole::Login),
            _ => None,
        }
    }

    pub fn to_event(&self) -> DriverEvent {
        DriverEvent::FactCheckError {
            error: self.to_string(),
            role: self.role(),
        }
    }
}

impl From<CoreError> for DriverError {
    fn from(err: CoreError) -> Self {
        DriverError::Dom(err.to_string())
    }
}
