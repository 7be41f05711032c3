use async_trait::async_trait;

use factlens_core_types::CoreError;

/// Page operations the driver needs from its host surface.
///
/// Selectors are CSS. Every call addresses the first match unless stated
/// otherwise.
#[async_trait]
pub trait DomPort: Send + Sync {
    async fn current_url(&self) -> Result<String, CoreError>;
    async fn exists(&self, selector: &str) -> Result<bool, CoreError>;
    async fn count(&self, selector: &str) -> Result<usize, CoreError>;
    async fn focus(&self, selector: &str) -> Result<(), CoreError>;
    /// Native text insertion into the focused element.
    async fn insert_text(&self, selector: &str, text: &str) -> Result<(), CoreError>;
    /// Assign `.value` and dispatch a bubbling `input` event.
    async fn set_value(&self, selector: &str, text: &str) -> Result<(), CoreError>;
    /// Assign `.textContent` directly.
    async fn set_text_content(&self, selector: &str, text: &str) -> Result<(), CoreError>;
    async fn click(&self, selector: &str) -> Result<(), CoreError>;
    /// Joined text of every `item_selector` inside the last `group_selector`
    /// match, one item per line.
    async fn last_group_text(
        &self,
        group_selector: &str,
        item_selector: &str,
    ) -> Result<Option<String>, CoreError>;
}
