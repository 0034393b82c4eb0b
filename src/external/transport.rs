//! Outbound transports used by the email providers.
//!
//! A transport takes a finished provider payload and returns the backend's
//! decoded response. Live transports go through the shared `HTTP_CLIENT`;
//! the simulated transport answers locally and never touches the network.

use reqwest::blocking::Response;
use serde_json::Value;
use tracing::{debug, warn};

use super::client::HTTP_CLIENT;
use crate::error::{MailError, MailResult};
use crate::mail::Payload;

/// Suffix carried by placeholder credentials, stripped before they are echoed
/// into a simulated payload.
const PLACEHOLDER_SUFFIX: &str = "_DEFAULT_WARNING";

/// Delivers a provider payload to a backend and returns its decoded response.
///
/// Any `Fn(&Payload) -> MailResult<Value>` closure is a transport, which is
/// how tests observe or replace the outbound call.
///
/// # Example
/// ```ignore
/// let transport = |payload: &Payload| -> MailResult<Value> { Ok(json!({"echo": payload.len()})) };
/// let provider = SendGridProvider::with_transport(LengthLimits::default(), transport);
/// ```
pub trait Transport: Send + Sync {
    /// Posts the payload and returns the response body.
    ///
    /// An empty response body decodes to `Value::Null`.
    fn post(&self, payload: &Payload) -> MailResult<Value>;

    /// True when no network call is made
    fn is_simulated(&self) -> bool {
        false
    }
}

impl<F> Transport for F
where
    F: Fn(&Payload) -> MailResult<Value> + Send + Sync,
{
    fn post(&self, payload: &Payload) -> MailResult<Value> {
        self(payload)
    }
}

/// JSON POST authenticated with a bearer token
#[derive(Clone)]
pub struct JsonTransport {
    provider: &'static str,
    url: String,
    api_key: String,
}

impl JsonTransport {
    /// # Arguments
    /// * `provider` - Display name used in errors
    /// * `url` - Full endpoint URL
    /// * `api_key` - Bearer token, never logged
    pub fn new(provider: &'static str, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Transport for JsonTransport {
    fn post(&self, payload: &Payload) -> MailResult<Value> {
        debug!(provider = self.provider, url = %self.url, "Posting JSON payload");

        let response = HTTP_CLIENT
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .map_err(|e| MailError::transport(self.provider, "request failed", e))?;

        decode_response(self.provider, response)
    }
}

/// Form-encoded POST authenticated with HTTP basic auth as user `api`
#[derive(Clone)]
pub struct FormTransport {
    provider: &'static str,
    url: String,
    api_key: String,
}

impl FormTransport {
    pub fn new(provider: &'static str, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl Transport for FormTransport {
    fn post(&self, payload: &Payload) -> MailResult<Value> {
        debug!(provider = self.provider, url = %self.url, "Posting form payload");

        let response = HTTP_CLIENT
            .post(&self.url)
            .basic_auth("api", Some(&self.api_key))
            .form(payload)
            .send()
            .map_err(|e| MailError::transport(self.provider, "request failed", e))?;

        decode_response(self.provider, response)
    }
}

/// Maps an HTTP response to the decoded body or a provider error.
///
/// Non-2xx statuses fail with the status and raw body in the message.
fn decode_response(provider: &'static str, response: Response) -> MailResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| MailError::transport(provider, "failed to read response body", e))?;

    if !status.is_success() {
        warn!(provider, status = status.as_u16(), "Backend rejected request");
        return Err(MailError::provider_api(
            provider,
            format!("HTTP {}: {}", status.as_u16(), body.trim()),
        ));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body)
        .map_err(|e| MailError::transport(provider, "response is not valid JSON", e))
}

/// Local stand-in for a backend, producing provider-shaped responses
pub type SimulatedBackend = fn(&Payload) -> Value;

/// Transport answering from a simulated backend instead of the network.
///
/// When a credential is attached it is inserted into a copy of the payload
/// under the provider's key field, with any placeholder suffix removed.
#[derive(Clone)]
pub struct SimulatedTransport {
    provider: &'static str,
    backend: SimulatedBackend,
    credential: Option<(&'static str, String)>,
}

impl SimulatedTransport {
    pub fn new(provider: &'static str, backend: SimulatedBackend) -> Self {
        Self {
            provider,
            backend,
            credential: None,
        }
    }

    /// Attaches the configured key under `field` in every simulated payload
    pub fn with_credential(mut self, field: &'static str, api_key: &str) -> Self {
        self.credential = Some((field, api_key.replace(PLACEHOLDER_SUFFIX, "")));
        self
    }
}

impl Transport for SimulatedTransport {
    fn post(&self, payload: &Payload) -> MailResult<Value> {
        debug!(provider = self.provider, "Answering from simulated backend");

        let response = match &self.credential {
            Some((field, key)) => {
                let mut payload = payload.clone();
                payload.insert((*field).to_string(), Value::String(key.clone()));
                (self.backend)(&payload)
            }
            None => (self.backend)(payload),
        };

        Ok(response)
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
