use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::Event;

type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type Handler = Arc<dyn Fn(Event) -> HandlerFuture + Send + Sync>;

/// In-process publish/subscribe bus with a registry of named handlers.
///
/// Delivery to handlers is at-least-once and unordered: each handler runs
/// as its own spawned task, independent of publisher progress and of the
/// other handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<String, Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `subscriber_id`.
    ///
    /// Idempotent: re-subscribing under the same id replaces the previous
    /// handler, it never duplicates delivery.
    pub async fn subscribe<F, Fut>(&self, subscriber_id: impl Into<String>, handler: F)
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |event| -> HandlerFuture { Box::pin(handler(event)) });
        let mut guard = self.handlers.write().await;
        guard.insert(subscriber_id.into(), handler);
    }

    /// Remove a subscription. Returns whether it existed.
    pub async fn unsubscribe(&self, subscriber_id: &str) -> bool {
        let mut guard = self.handlers.write().await;
        guard.remove(subscriber_id).is_some()
    }

    /// Publish an event to every registered handler.
    ///
    /// Returns as soon as the handler tasks are spawned; the publisher
    /// never waits on handler completion.
    pub async fn publish(&self, event: Event) {
        let handlers: Vec<Handler> = {
            let guard = self.handlers.read().await;
            guard.values().cloned().collect()
        };

        for handler in handlers {
            let event = event.clone();
            tokio::spawn(async move {
                handler(event).await;
            });
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.handlers.read().await.len()
    }
}
