use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Progress notifications for UI listeners.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FactCheckStatus {
    Starting,
    Completed,
    Error { message: String },
}

/// A registered status listener. Dropping it unregisters.
pub struct StatusListener {
    inner: broadcast::Receiver<FactCheckStatus>,
}

impl StatusListener {
    pub(crate) fn new(inner: broadcast::Receiver<FactCheckStatus>) -> Self {
        Self { inner }
    }

    /// Next status, skipping over any the listener was too slow to see.
    pub async fn next(&mut self) -> Option<FactCheckStatus> {
        loop {
            match self.inner.recv().await {
                Ok(status) => return Some(status),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_next(&mut self) -> Option<FactCheckStatus> {
        self.inner.try_recv().ok()
    }
}
