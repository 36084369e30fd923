use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Boxed future returned by an injected delay function.
pub type DelayFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Injectable inter-attempt delay. Production code sleeps; tests record.
pub type DelayFn = Arc<dyn Fn(Duration) -> DelayFuture + Send + Sync>;

/// The default delay function: `tokio::time::sleep`.
pub fn tokio_delay() -> DelayFn {
    Arc::new(|duration| -> DelayFuture { Box::pin(tokio::time::sleep(duration)) })
}

/// Capped exponential backoff schedule with bounded jitter.
///
/// The delay before attempt `n + 1` is `base * 2^(n - 1)` plus up to
/// `jitter`, clamped so it never exceeds `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
    pub jitter: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_secs(30),
            jitter: Duration::from_millis(250),
        }
    }
}

impl Backoff {
    /// Same schedule with a different cap.
    pub fn capped_at(&self, max: Duration) -> Self {
        Self {
            base: self.base.min(max),
            max,
            jitter: self.jitter,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let pow = 2u64.saturating_pow(attempt.saturating_sub(1));
        let exp = base_ms.saturating_mul(pow);
        let jitter = jitter_millis(self.jitter.as_millis() as u64);
        Duration::from_millis(exp.saturating_add(jitter).min(max_ms))
    }
}

fn jitter_millis(jitter_ms: u64) -> u64 {
    if jitter_ms == 0 {
        return 0;
    }
    fastrand::u64(0..=jitter_ms)
}

/// Result of a bounded retry loop.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    /// The operation succeeded on attempt `attempts`.
    Success { value: T, attempts: u32 },

    /// All attempts failed, or a non-retryable error occurred.
    Exhausted { last_error: E, attempts: u32 },
}

/// Run `op` up to `max_attempts` times with backoff between attempts.
///
/// After each failed attempt except the last, `on_failure` is invoked and
/// the injected `delay` function is awaited with the schedule's next delay.
/// An error rejected by `is_retryable` terminates the loop immediately.
///
/// `max_attempts` below 1 is treated as 1.
pub async fn retry_with_backoff<T, E, Op, Fut, Pred, Hook>(
    max_attempts: u32,
    backoff: &Backoff,
    delay: &DelayFn,
    mut op: Op,
    is_retryable: Pred,
    mut on_failure: Hook,
) -> RetryOutcome<T, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Pred: Fn(&E) -> bool,
    Hook: FnMut(u32, &E),
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match op(attempt).await {
            Ok(value) => {
                return RetryOutcome::Success {
                    value,
                    attempts: attempt,
                };
            }
            Err(err) => {
                if attempt >= max_attempts || !is_retryable(&err) {
                    return RetryOutcome::Exhausted {
                        last_error: err,
                        attempts: attempt,
                    };
                }
                on_failure(attempt, &err);
                delay(backoff.delay_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}
