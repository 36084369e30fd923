#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use webhook_notifier::{DelayFn, DelayFuture, HttpTransport, OutboundRequest, TransportError};

type Responder = Box<dyn Fn(&OutboundRequest) -> Result<u16, TransportError> + Send + Sync>;

/// Scriptable transport that records every request it sees.
pub struct MockTransport {
    requests: Mutex<Vec<OutboundRequest>>,
    script: Mutex<VecDeque<Result<u16, TransportError>>>,
    responder: Option<Responder>,
    fallback: Result<u16, TransportError>,
}

impl MockTransport {
    /// Respond to every request with the given status.
    pub fn always(status: u16) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            responder: None,
            fallback: Ok(status),
        }
    }

    /// Respond with the scripted results in order, then with `fallback`.
    pub fn script(
        responses: Vec<Result<u16, TransportError>>,
        fallback: Result<u16, TransportError>,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(responses.into()),
            responder: None,
            fallback,
        }
    }

    /// Respond per request, e.g. keyed off the URL.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&OutboundRequest) -> Result<u16, TransportError> + Send + Sync + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(responder)),
            fallback: Ok(200),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Poll until `count` requests were seen or two seconds elapsed.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.request_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<u16, TransportError> {
        if let Some(ref responder) = self.responder {
            let response = responder(&request);
            self.requests.lock().unwrap().push(request);
            return response;
        }

        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(response) => response,
            None => self.fallback.clone(),
        }
    }
}

/// Delay function that records requested delays instead of sleeping.
pub fn recording_delay(log: Arc<Mutex<Vec<Duration>>>) -> DelayFn {
    Arc::new(move |duration| -> DelayFuture {
        log.lock().unwrap().push(duration);
        Box::pin(async {})
    })
}

/// Delay function that completes immediately and records nothing.
pub fn no_delay() -> DelayFn {
    Arc::new(|_| -> DelayFuture { Box::pin(async {}) })
}
