use std::fmt;

/// Errors found while validating a webhook configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A webhook has an empty matcher list and could never fire.
    NoMatchers { webhook: String },

    /// A webhook's retry policy allows zero attempts.
    ZeroAttempts { webhook: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoMatchers { webhook } =>
                write!(f, "webhook {:?} has no event matchers", webhook),
            ConfigError::ZeroAttempts { webhook } =>
                write!(f, "webhook {:?} has maxAttempts of zero", webhook),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Transport-level failure of one HTTP attempt, before any status was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The attempt exceeded the configured per-attempt timeout.
    Timeout,

    /// Connection, DNS, or TLS failure.
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout =>
                write!(f, "request timed out"),
            TransportError::Network(detail) =>
                write!(f, "network error: {}", detail),
        }
    }
}

impl std::error::Error for TransportError {}

/// Why a single delivery attempt failed. All variants are retryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The endpoint responded outside the 2xx range.
    Status(u16),

    /// The attempt timed out.
    Timeout,

    /// Connection, DNS, or TLS failure.
    Network(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(status) =>
                write!(f, "endpoint returned status {}", status),
            FailureReason::Timeout =>
                write!(f, "request timed out"),
            FailureReason::Network(detail) =>
                write!(f, "network error: {}", detail),
        }
    }
}

impl std::error::Error for FailureReason {}

impl From<TransportError> for FailureReason {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => FailureReason::Timeout,
            TransportError::Network(detail) => FailureReason::Network(detail),
        }
    }
}

/// Terminal result of one delivery. Reported, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A 2xx response was received.
    Delivered { status: u16, attempts: u32 },

    /// Every attempt failed; the delivery ends here.
    Exhausted { last_error: FailureReason, attempts: u32 },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Delivered { attempts, .. } => *attempts,
            DeliveryOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }
}
