use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use factlens_core_types::SessionId;

/// Store key of the last-session summary.
pub const LAST_SESSION_KEY: &str = "factlens_last_session";

/// Summary of the most recent session, kept for the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSessionRecord {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Holds the in-progress flag for one session and clears it on drop.
pub(crate) struct SessionGuard<'a> {
    flag: &'a AtomicBool,
    pub(crate) id: SessionId,
    pub(crate) started_at: DateTime<Utc>,
}

impl<'a> SessionGuard<'a> {
    /// `None` when another session already holds the flag.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                id: SessionId::new(),
                started_at: Utc::now(),
            })
    }

    pub(crate) fn finish(&self, outcome: Result<&str, &str>) -> LastSessionRecord {
        LastSessionRecord {
            session_id: self.id.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            success: outcome.is_ok(),
            error: outcome.err().map(str::to_string),
        }
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
