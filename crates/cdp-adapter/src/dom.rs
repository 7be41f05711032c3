use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use factlens_chat_driver::DomPort;
use factlens_core_types::CoreError;

use crate::scripts;

/// [`DomPort`] over one Chromium tab.
#[derive(Clone)]
pub struct ChromiumDom {
    page: Page,
}

impl ChromiumDom {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, CoreError> {
        trace!(script = %script, "evaluating");
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|err| CoreError::new(format!("evaluate failed: {err}")))?;
        decode(result.value())
    }

    /// Scripts returning `false` mean the element was missing or refused.
    async fn eval_action(&self, script: String, what: &str, selector: &str) -> Result<(), CoreError> {
        if self.eval::<bool>(script).await? {
            Ok(())
        } else {
            Err(CoreError::new(format!("{what} failed on {selector}")))
        }
    }
}

#[async_trait]
impl DomPort for ChromiumDom {
    async fn current_url(&self) -> Result<String, CoreError> {
        self.eval(scripts::current_url()).await
    }

    async fn exists(&self, selector: &str) -> Result<bool, CoreError> {
        self.eval(scripts::exists(selector)).await
    }

    async fn count(&self, selector: &str) -> Result<usize, CoreError> {
        self.eval(scripts::count(selector)).await
    }

    async fn focus(&self, selector: &str) -> Result<(), CoreError> {
        self.eval_action(scripts::focus(selector), "focus", selector)
            .await
    }

    async fn insert_text(&self, selector: &str, text: &str) -> Result<(), CoreError> {
        self.eval_action(scripts::insert_text(selector, text), "insertText", selector)
            .await
    }

    async fn set_value(&self, selector: &str, text: &str) -> Result<(), CoreError> {
        self.eval_action(scripts::set_value(selector, text), "value assignment", selector)
            .await
    }

    async fn set_text_content(&self, selector: &str, text: &str) -> Result<(), CoreError> {
        self.eval_action(
            scripts::set_text_content(selector, text),
            "textContent assignment",
            selector,
        )
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), CoreError> {
        self.eval_action(scripts::click(selector), "click", selector)
            .await
    }

    async fn last_group_text(
        &self,
        group_selector: &str,
        item_selector: &str,
    ) -> Result<Option<String>, CoreError> {
        self.eval(scripts::last_group_text(group_selector, item_selector))
            .await
    }
}

/// A script returning `null` comes back with no value at all.
fn decode<T: DeserializeOwned>(value: Option<&Value>) -> Result<T, CoreError> {
    let value = value.cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|err| CoreError::new(format!("unexpected script result: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_value_decodes_as_none() {
        assert_eq!(decode::<Option<String>>(None), Ok(None));
        assert_eq!(decode::<Option<String>>(Some(&Value::Null)), Ok(None));
        assert_eq!(
            decode::<Option<String>>(Some(&json!("answer"))),
            Ok(Some("answer".to_string()))
        );
    }

    #[test]
    fn mistyped_value_is_an_error() {
        assert!(decode::<bool>(None).is_err());
        assert!(decode::<usize>(Some(&json!("three"))).is_err());
    }
}
