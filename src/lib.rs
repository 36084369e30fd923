//! An in-process event-to-webhook notification dispatcher.
//!
//! When the host application publishes a domain event, this crate forwards
//! it as an HTTP POST to every user-configured webhook whose matchers
//! accept the event's type, each delivery independently retried and
//! isolated from the others' failures.
//!
//! ## Guarantees
//! - Per-webhook failure isolation
//! - Bounded retry with capped, increasing backoff
//! - Deterministic, HTML-safe payload encoding
//! - Configuration edits observed on the next event, without restart
//!
//! ## Non-Guarantees
//! - Durability across restarts (delivery is best-effort)
//! - Exactly-once delivery
//! - Ordering between webhooks or between events
//!
//! The event bus and configuration source ship as simple in-process
//! implementations; both are injected, so hosts with their own bus or
//! options store implement `ConfigSource` / call `handle` directly.

mod browse;
mod bus;
mod config;
mod delivery;
mod dispatcher;
mod encoder;
mod error;
mod retry;
mod signing;
mod transport;
mod types;

pub use browse::{BrowseError, DirEntryInfo, DirectoryBrowser, EnumerationOptions};
pub use bus::EventBus;
pub use config::{ConfigSource, SharedConfig, WebhookSnapshot};
pub use delivery::DeliveryExecutor;
pub use dispatcher::{WebhookDispatcher, SUBSCRIBER_ID};
pub use encoder::encode_event;
pub use error::{ConfigError, DeliveryOutcome, FailureReason, TransportError};
pub use retry::{retry_with_backoff, tokio_delay, Backoff, DelayFn, DelayFuture, RetryOutcome};
pub use signing::{compute_signature, verify_signature, SIGNATURE_HEADER};
pub use transport::{HttpTransport, OutboundRequest, ReqwestTransport};
pub use types::{CallSpec, Event, EventType, FieldValue, Header, Matcher, RetryPolicy, Webhook};
