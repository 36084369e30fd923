use std::sync::Arc;
use std::time::Instant;

use crate::encoder::encode_event;
use crate::error::{DeliveryOutcome, FailureReason};
use crate::retry::{retry_with_backoff, tokio_delay, Backoff, DelayFn, RetryOutcome};
use crate::signing::{compute_signature, SIGNATURE_HEADER};
use crate::transport::{HttpTransport, OutboundRequest};
use crate::types::{CallSpec, Event, Header, RetryPolicy};

#[cfg(feature = "metrics")]
fn metric_inc(name: &'static str) {
    metrics::increment_counter!(name);
}

#[cfg(not(feature = "metrics"))]
fn metric_inc(_name: &'static str) {}

/// Performs one bounded-retry delivery of one (event, webhook) pair.
///
/// All outcomes are terminal at this layer: the executor logs success or
/// exhaustion and reports the result, it never returns an error.
pub struct DeliveryExecutor {
    transport: Arc<dyn HttpTransport>,
    backoff: Backoff,
    delay: DelayFn,
}

impl DeliveryExecutor {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            backoff: Backoff::default(),
            delay: tokio_delay(),
        }
    }

    /// Override the backoff schedule. The per-webhook `maxDelayMillis`
    /// still caps every delay.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the inter-attempt delay function. Tests use this to record
    /// delays instead of sleeping.
    pub fn with_delay_fn(mut self, delay: DelayFn) -> Self {
        self.delay = delay;
        self
    }

    /// Deliver `event` to one webhook, retrying per `retry`.
    pub async fn deliver(
        &self,
        name: &str,
        event: &Event,
        call: &CallSpec,
        retry: &RetryPolicy,
    ) -> DeliveryOutcome {
        let body = encode_event(event);
        let headers = request_headers(call, &body);
        let max_attempts = retry.max_attempts.max(1);
        let backoff = self.backoff.capped_at(retry.max_delay());
        let started = Instant::now();

        let outcome = retry_with_backoff(
            max_attempts,
            &backoff,
            &self.delay,
            |_attempt| {
                let request = OutboundRequest {
                    url: call.url.clone(),
                    headers: headers.clone(),
                    body: body.clone(),
                    timeout: call.timeout(),
                    ignore_certificate_errors: call.ignore_certificate_errors,
                };
                async move {
                    match self.transport.execute(request).await {
                        Ok(status) if (200..300).contains(&status) => Ok(status),
                        Ok(status) => Err(FailureReason::Status(status)),
                        Err(err) => Err(FailureReason::from(err)),
                    }
                }
            },
            |_| true,
            |attempt, err| {
                // Single-attempt webhooks get only the terminal record.
                if max_attempts > 1 {
                    metric_inc("webhook.delivery.attempt_failed");
                    tracing::warn!(
                        webhook = name,
                        event_type = %event.event_type,
                        attempt,
                        error = %err,
                        "webhook delivery attempt failed, will retry"
                    );
                }
            },
        )
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            RetryOutcome::Success { value: status, attempts } => {
                metric_inc("webhook.delivery.success");
                tracing::info!(
                    webhook = name,
                    event_type = %event.event_type,
                    status,
                    attempts,
                    elapsed_ms,
                    "webhook delivered"
                );
                DeliveryOutcome::Delivered { status, attempts }
            }
            RetryOutcome::Exhausted { last_error, attempts } => {
                metric_inc("webhook.delivery.exhausted");
                tracing::warn!(
                    webhook = name,
                    event_type = %event.event_type,
                    attempts,
                    elapsed_ms,
                    error = %last_error,
                    "webhook delivery exhausted"
                );
                DeliveryOutcome::Exhausted { last_error, attempts }
            }
        }
    }
}

fn request_headers(call: &CallSpec, body: &str) -> Vec<Header> {
    let mut headers = call.headers.clone();
    if let Some(ref secret) = call.secret {
        headers.push(Header {
            name: SIGNATURE_HEADER.to_string(),
            value: compute_signature(secret, body.as_bytes()),
        });
    }
    headers
}
