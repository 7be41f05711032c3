use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser launch settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromiumConfig {
    /// The agent page needs a signed-in profile, so this defaults to a
    /// visible window.
    pub headless: bool,
    /// Explicit browser binary. Detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Profile directory holding the agent's login session.
    pub user_data_dir: Option<PathBuf>,
    pub no_sandbox: bool,
    pub launch_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// How often an open tab is checked for having been closed by the user.
    pub watch_interval_ms: u64,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_path: None,
            user_data_dir: None,
            no_sandbox: false,
            launch_timeout_ms: 20_000,
            request_timeout_ms: 30_000,
            watch_interval_ms: 1_000,
        }
    }
}

impl ChromiumConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let cfg: ChromiumConfig =
            serde_yaml::from_str("headless: true\nchrome_path: /usr/bin/chromium\n").unwrap();
        assert!(cfg.headless);
        assert_eq!(cfg.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(cfg.launch_timeout(), Duration::from_secs(20));
    }
}
