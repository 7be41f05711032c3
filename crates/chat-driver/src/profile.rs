//! Selector chains and timing for one agent UI, kept as data so a page
//! redesign is a config change.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One candidate selector and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorProbe {
    pub selector: String,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl SelectorProbe {
    pub fn new(selector: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            selector: selector.into(),
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Response region: message groups and the text items inside them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseProbe {
    pub group_selector: String,
    #[serde(default = "default_item_selector")]
    pub item_selector: String,
    #[serde(default = "default_response_timeout_ms")]
    pub timeout_ms: u64,
}

impl ResponseProbe {
    pub fn new(group: impl Into<String>, item: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            group_selector: group.into(),
            item_selector: item.into(),
            timeout_ms,
        }
    }

    /// Selector matching every message item on the page.
    pub fn items_selector(&self) -> String {
        format!("{} {}", self.group_selector, self.item_selector)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverProfile {
    /// Fragment the helper page URL must contain. Empty disables the check.
    pub expected_host: String,
    pub input: Vec<SelectorProbe>,
    pub submit: Vec<SelectorProbe>,
    pub response: Vec<ResponseProbe>,
    /// Any of these present means the user is signed out.
    pub login_indicators: Vec<String>,
    pub poll_interval_ms: u64,
    pub stability_threshold: u32,
    pub initial_response_delay_ms: u64,
    pub input_settle_ms: u64,
    pub stability_timeout_ms: u64,
}

impl Default for DriverProfile {
    fn default() -> Self {
        let input = [
            r#"[data-testid="tweetTextarea"]"#,
            r#"textarea[placeholder*="Ask"]"#,
            ".grok-input",
            r#"div[role="textbox"]"#,
            r#"div[contenteditable="true"]"#,
            "textarea",
        ];
        let submit = [
            r#"[data-testid="tweetButton"]"#,
            r#"button[aria-label*="Send"]"#,
            "button.send-button",
            "button:has(svg)",
            "button.grok-submit-button",
        ];
        let response = [
            ".group",
            r#"[data-testid="grokResponse"]"#,
            ".grok-response",
            ".response-container",
            r#"article[role="article"]"#,
        ];
        Self {
            expected_host: "x.com".to_string(),
            input: input
                .iter()
                .map(|s| SelectorProbe::new(*s, default_probe_timeout_ms()))
                .collect(),
            submit: submit
                .iter()
                .map(|s| SelectorProbe::new(*s, default_probe_timeout_ms()))
                .collect(),
            response: response
                .iter()
                .map(|s| ResponseProbe::new(*s, "p", default_response_timeout_ms()))
                .collect(),
            login_indicators: vec![
                r#"[data-testid="loginButton"]"#.to_string(),
                r#"[data-testid="login"]"#.to_string(),
                r#"[data-testid="signIn"]"#.to_string(),
                ".login-button".to_string(),
                ".signin-btn".to_string(),
            ],
            poll_interval_ms: 500,
            stability_threshold: 5,
            initial_response_delay_ms: 1000,
            input_settle_ms: 2000,
            stability_timeout_ms: 55_000,
        }
    }
}

impl DriverProfile {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_response_timeout_ms() -> u64 {
    10_000
}

fn default_item_selector() -> String {
    "p".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_agent_ui() {
        let profile = DriverProfile::default();
        assert_eq!(profile.input.len(), 6);
        assert_eq!(profile.submit[0].selector, r#"[data-testid="tweetButton"]"#);
        assert_eq!(profile.response[0].items_selector(), ".group p");
        assert_eq!(profile.poll_interval(), Duration::from_millis(500));
        assert_eq!(profile.stability_threshold, 5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "stability_threshold: 3\ninput:\n  - selector: textarea\n";
        let profile: DriverProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.stability_threshold, 3);
        assert_eq!(profile.input, vec![SelectorProbe::new("textarea", 5_000)]);
        assert_eq!(profile.submit.len(), 5);
    }
}
