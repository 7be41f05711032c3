//! Credential bundle handed from the auth collaborator to the helper context.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::StoreError;
use crate::store::KeyValueStore;

/// Key the helper context reads its tokens from.
pub const HANDOFF_KEY: &str = "grok_auth_tokens";

pub const ACCESS_TOKEN_KEY: &str = "twitter_access_token";
pub const ACCESS_TOKEN_SECRET_KEY: &str = "twitter_access_token_secret";
pub const BEARER_TOKEN_KEY: &str = "twitter_bearer_token";
pub const TOKENS_OBJECT_KEY: &str = "twitter_tokens";

/// Opaque to the core: only presence of the access token is checked.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBundle {
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl CredentialBundle {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            access_token_secret: None,
            bearer_token: None,
        }
    }

    pub fn is_present(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_token", &"<redacted>")
            .field(
                "access_token_secret",
                &self.access_token_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Individual token keys first, then the `twitter_tokens` object.
pub async fn load_credentials(
    store: &dyn KeyValueStore,
) -> Result<Option<CredentialBundle>, StoreError> {
    let access = string_value(store.get(ACCESS_TOKEN_KEY).await?);
    if let Some(access_token) = access {
        debug!("credentials found under individual keys");
        return Ok(Some(CredentialBundle {
            access_token,
            access_token_secret: string_value(store.get(ACCESS_TOKEN_SECRET_KEY).await?),
            bearer_token: string_value(store.get(BEARER_TOKEN_KEY).await?),
        }));
    }

    let Some(object) = store.get(TOKENS_OBJECT_KEY).await? else {
        return Ok(None);
    };
    let bundle = serde_json::from_value::<CredentialBundle>(object).ok();
    Ok(bundle.filter(CredentialBundle::is_present))
}

pub async fn persist_credentials(
    store: &dyn KeyValueStore,
    bundle: &CredentialBundle,
) -> Result<(), StoreError> {
    store.set(HANDOFF_KEY, serde_json::to_value(bundle)?).await
}

/// Store `bundle` where [`load_credentials`] looks for it.
pub async fn save_credentials(
    store: &dyn KeyValueStore,
    bundle: &CredentialBundle,
) -> Result<(), StoreError> {
    store
        .set(TOKENS_OBJECT_KEY, serde_json::to_value(bundle)?)
        .await
}

fn string_value(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}
