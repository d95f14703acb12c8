//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `UreqTransport` makes
//! exactly one attempt per request; there is no retry or backoff. ureq's
//! status-as-error behavior is disabled so 4xx/5xx come back as
//! `HttpResponse` data and the response decoder interprets them.

use std::time::Duration;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and returns the raw response.
///
/// Implementations must return non-2xx responses as `Ok`; only failures to
/// complete the exchange are errors.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// The agent pools connections and is `Send + Sync`, so one transport can
/// serve concurrent callers.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout())
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(&url), &headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(&url), &headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), &headers).send_empty(),
        };
        let mut response = result.map_err(|e| ClientError::Transport(format!("{method} {url}: {e}")))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ClientError::Transport(format!("{method} {url}: reading body: {e}")))?;
        debug!(%method, %url, status, "response received");

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
