use std::sync::Arc;

use crate::bus::EventBus;
use crate::config::ConfigSource;
use crate::delivery::DeliveryExecutor;
use crate::types::{Event, Webhook};

#[cfg(feature = "metrics")]
fn metric_inc(name: &'static str) {
    metrics::increment_counter!(name);
}

#[cfg(not(feature = "metrics"))]
fn metric_inc(_name: &'static str) {}

/// Stable subscriber identity under which the dispatcher registers on the
/// event bus. Re-attaching replaces the registration.
pub const SUBSCRIBER_ID: &str = "webhook-dispatcher";

/// Matches incoming events against the current webhook configuration and
/// fans out one independent delivery per match.
///
/// The dispatcher performs no I/O itself: it reads a fresh configuration
/// snapshot, computes the matching set, and spawns deliveries. It never
/// waits for a delivery and no delivery failure reaches the caller.
pub struct WebhookDispatcher {
    config: Arc<dyn ConfigSource>,
    executor: Arc<DeliveryExecutor>,
}

impl WebhookDispatcher {
    pub fn new(config: Arc<dyn ConfigSource>, executor: Arc<DeliveryExecutor>) -> Self {
        Self { config, executor }
    }

    /// Subscribe to the bus under [`SUBSCRIBER_ID`]. Idempotent.
    pub async fn attach(self: &Arc<Self>, bus: &EventBus) {
        let dispatcher = Arc::clone(self);
        bus.subscribe(SUBSCRIBER_ID, move |event| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                dispatcher.handle(event).await;
            }
        })
        .await;
    }

    /// Handle one event: snapshot the configuration, spawn one delivery
    /// per matching webhook, return without waiting for any of them.
    pub async fn handle(&self, event: Event) {
        let snapshot = self.config.snapshot().await;

        for (name, webhook) in snapshot.matching(&event.event_type) {
            metric_inc("webhook.dispatch.matched");
            tracing::debug!(
                webhook = name,
                event_type = %event.event_type,
                "webhook matched, starting delivery"
            );
            self.spawn_delivery(name.to_string(), webhook.clone(), event.clone());
        }
    }

    /// Start one supervised fire-and-forget delivery.
    ///
    /// The supervisor awaits the delivery task only to log a panic; it is
    /// itself spawned, so neither the publisher nor sibling deliveries
    /// ever block on it.
    fn spawn_delivery(&self, name: String, webhook: Webhook, event: Event) {
        let executor = Arc::clone(&self.executor);
        let task_name = name.clone();

        let task = tokio::spawn(async move {
            executor
                .deliver(&task_name, &event, &webhook.call, &webhook.retry)
                .await;
        });

        tokio::spawn(async move {
            if let Err(err) = task.await {
                metric_inc("webhook.dispatch.task_failed");
                tracing::error!(
                    webhook = %name,
                    error = %err,
                    "webhook delivery task aborted"
                );
            }
        });
    }
}
