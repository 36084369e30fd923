use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ConfigError;
use crate::types::{EventType, Webhook};

/// Immutable view of the full webhook configuration, read fresh at the
/// start of each dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookSnapshot {
    /// Webhook definitions keyed by their unique name.
    pub webhooks: HashMap<String, Webhook>,
}

impl WebhookSnapshot {
    /// Build a validated snapshot.
    pub fn from_webhooks<I>(webhooks: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, Webhook)>,
    {
        let snapshot = Self {
            webhooks: webhooks.into_iter().collect(),
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check snapshot invariants: every webhook has at least one matcher
    /// and allows at least one attempt. Run this after deserializing
    /// externally stored configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, webhook) in &self.webhooks {
            if webhook.on.is_empty() {
                return Err(ConfigError::NoMatchers {
                    webhook: name.clone(),
                });
            }
            if webhook.retry.max_attempts == 0 {
                return Err(ConfigError::ZeroAttempts {
                    webhook: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Webhooks whose matchers accept the given event type.
    pub fn matching(&self, event_type: &EventType) -> Vec<(&str, &Webhook)> {
        self.webhooks
            .iter()
            .filter(|(_, webhook)| webhook.matches(event_type))
            .map(|(name, webhook)| (name.as_str(), webhook))
            .collect()
    }
}

/// Read-only, hot-reloadable source of webhook configuration.
///
/// The dispatcher calls `snapshot` once per event, so edits take effect on
/// the next event without a restart.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn snapshot(&self) -> Arc<WebhookSnapshot>;
}

/// In-memory `ConfigSource` whose snapshot can be swapped at runtime.
pub struct SharedConfig {
    inner: RwLock<Arc<WebhookSnapshot>>,
}

impl SharedConfig {
    pub fn new(snapshot: WebhookSnapshot) -> Self {
        Self {
            inner: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Atomically replace the configuration. In-flight dispatches keep the
    /// snapshot they already hold.
    pub async fn replace(&self, snapshot: WebhookSnapshot) {
        let mut guard = self.inner.write().await;
        *guard = Arc::new(snapshot);
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(WebhookSnapshot::default())
    }
}

#[async_trait]
impl ConfigSource for SharedConfig {
    async fn snapshot(&self) -> Arc<WebhookSnapshot> {
        self.inner.read().await.clone()
    }
}
