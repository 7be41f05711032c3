use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Page the helper surface opens.
    pub target_url: String,
    /// Global deadline covering surface open through driver answer.
    pub timeout_ms: u64,
    /// Prompt content is cut after this many characters.
    pub prompt_cap_chars: usize,
    /// Pause between page load and driver injection.
    pub settle_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            target_url: "https://x.com/i/grok".to_string(),
            timeout_ms: 60_000,
            prompt_cap_chars: 5_000,
            settle_ms: 1_000,
        }
    }
}

impl OrchestratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
