use std::sync::Arc;
use std::time::Duration;

use webhook_notifier::{
    CallSpec, DeliveryExecutor, Event, EventBus, ReqwestTransport, RetryPolicy, SharedConfig,
    Webhook, WebhookDispatcher, WebhookSnapshot,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let snapshot = WebhookSnapshot::from_webhooks(vec![(
        "notify".to_string(),
        Webhook::new(CallSpec::new("https://example.com/webhook").with_secret("supersecret"))
            .on("DownloadCompleted")
            .with_retry(RetryPolicy::new(3, 5_000)),
    )])
    .expect("valid configuration");

    let config = Arc::new(SharedConfig::new(snapshot));
    let transport = Arc::new(ReqwestTransport::new().expect("http client"));
    let executor = Arc::new(DeliveryExecutor::new(transport));
    let dispatcher = Arc::new(WebhookDispatcher::new(config, executor));

    let bus = EventBus::new();
    dispatcher.attach(&bus).await;

    bus.publish(
        Event::new("DownloadCompleted")
            .with_field("name", "archive.tar")
            .with_field("size_bytes", 1_048_576i64),
    )
    .await;

    // Deliveries are fire-and-forget; give them a moment before exiting.
    tokio::time::sleep(Duration::from_secs(2)).await;
}
