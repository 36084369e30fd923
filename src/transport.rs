use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::Header;

/// One fully specified outbound POST.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<Header>,
    pub body: String,
    pub timeout: Duration,
    pub ignore_certificate_errors: bool,
}

/// Opaque HTTP capability consumed by the delivery executor.
///
/// Implementations return the response status for any completed exchange,
/// 2xx or not; `TransportError` is reserved for attempts that never
/// produced a status (timeout, connection, DNS, TLS).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: OutboundRequest) -> Result<u16, TransportError>;
}

/// Production transport backed by reqwest.
///
/// Two clients are built up front: a validating one and one with
/// certificate checks disabled. The choice is made per request, so one
/// webhook's `ignoreCertificateErrors` never leaks into another's calls.
pub struct ReqwestTransport {
    validating: reqwest::Client,
    insecure: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            validating: reqwest::Client::builder().build()?,
            insecure: reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: OutboundRequest) -> Result<u16, TransportError> {
        let client = if request.ignore_certificate_errors {
            &self.insecure
        } else {
            &self.validating
        };

        let has_content_type = request
            .headers
            .iter()
            .any(|h| h.name.eq_ignore_ascii_case("content-type"));

        let mut builder = client
            .post(&request.url)
            .timeout(request.timeout)
            .body(request.body);

        if !has_content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }
        for header in &request.headers {
            builder = builder.header(&header.name, &header.value);
        }

        match builder.send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(err) if err.is_timeout() => Err(TransportError::Timeout),
            Err(err) => Err(TransportError::Network(err.to_string())),
        }
    }
}
