use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A typed occurrence published by the host application.
///
/// Events are immutable once published. Payload fields are kept in a
/// `BTreeMap` so that encoding order is stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Discriminating type tag, e.g. `"DownloadCompleted"`.
    pub event_type: EventType,

    /// Arbitrary payload fields, keyed by their internal field name.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Event {
    /// Create an event with the given type tag and no payload fields.
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a payload field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Textual event-type tag.
///
/// Open enumeration: the dispatcher compares tags case-insensitively and
/// never interprets them beyond matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventType(pub String);

impl EventType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        EventType(value.to_string())
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        EventType(value)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single payload field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Network address, encoded in canonical textual form.
    Address(IpAddr),
    /// Absent value. Encoded as an explicit JSON `null`, never omitted.
    Null,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<IpAddr> for FieldValue {
    fn from(value: IpAddr) -> Self {
        FieldValue::Address(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => FieldValue::Null,
        }
    }
}

/// A user-configured delivery rule: which events to forward, where to, and
/// how hard to try.
///
/// The webhook's unique name is the key of the snapshot map it lives in,
/// matching the consumed configuration shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    /// Event-type matchers. Must be non-empty.
    pub on: Vec<Matcher>,

    /// How to perform the HTTP call.
    pub call: CallSpec,

    /// Bounded-retry policy for each delivery.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Webhook {
    pub fn new(call: CallSpec) -> Self {
        Self {
            on: Vec::new(),
            call,
            retry: RetryPolicy::default(),
        }
    }

    /// Add an event-type matcher.
    pub fn on(mut self, matcher: impl Into<Matcher>) -> Self {
        self.on.push(matcher.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// True iff any matcher accepts the event type.
    pub fn matches(&self, event_type: &EventType) -> bool {
        self.on.iter().any(|m| m.matches(event_type))
    }
}

/// An event-type matcher: a literal tag (case-insensitive) or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Matcher {
    /// Matches every event type.
    Any,
    /// Matches one event type, compared case-insensitively.
    Type(String),
}

impl Matcher {
    pub fn matches(&self, event_type: &EventType) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Type(tag) => tag.eq_ignore_ascii_case(event_type.as_str()),
        }
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("any") {
            Matcher::Any
        } else {
            Matcher::Type(value)
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::from(value.to_string())
    }
}

impl From<Matcher> for String {
    fn from(value: Matcher) -> Self {
        match value {
            Matcher::Any => "Any".to_string(),
            Matcher::Type(tag) => tag,
        }
    }
}

/// How to perform one webhook HTTP call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSpec {
    /// Target URL for the POST.
    pub url: String,

    /// Extra request headers, applied in order, unvalidated.
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Per-attempt timeout.
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,

    /// Skip TLS certificate validation for this call only.
    #[serde(default)]
    pub ignore_certificate_errors: bool,

    /// Optional HMAC-SHA256 signing secret. When set, the delivery carries
    /// an `X-Webhook-Signature` header over the encoded body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

fn default_timeout_millis() -> u64 {
    10_000
}

impl CallSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout_millis: default_timeout_millis(),
            ignore_certificate_errors: false,
            secret: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_timeout_millis(mut self, timeout_millis: u64) -> Self {
        self.timeout_millis = timeout_millis;
        self
    }

    pub fn with_ignore_certificate_errors(mut self, ignore: bool) -> Self {
        self.ignore_certificate_errors = ignore;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

/// One configured request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Bounded-retry policy for one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Upper bound on any single inter-attempt delay.
    #[serde(default = "default_max_delay_millis")]
    pub max_delay_millis: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_delay_millis() -> u64 {
    30_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            max_delay_millis: default_max_delay_millis(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, max_delay_millis: u64) -> Self {
        Self {
            max_attempts,
            max_delay_millis,
        }
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_millis)
    }
}
