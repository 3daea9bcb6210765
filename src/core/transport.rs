//! Real network transport for chat operations.
//!
//! A [`Transport`] performs exactly one request/response exchange and reports
//! any infrastructure problem as a [`TransportError`]. It does not interpret
//! the result discriminator of the payload; that is the dispatcher's job.

use crate::api::{ChatRequest, ChatResponse};
use crate::core::persona::RemoteOperation;
use crate::utils::url::construct_api_url;
use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Longest slice of an error body kept in [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug)]
pub enum TransportError {
    /// The endpoint could not be reached (DNS, connect, timeout, broken body).
    Unreachable(String),
    /// The endpoint answered with a non-success HTTP status.
    Status { code: u16, body: String },
    /// The endpoint answered 2xx but the payload did not decode.
    Malformed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Unreachable(detail) => write!(f, "endpoint unreachable: {detail}"),
            TransportError::Status { code, body } if body.is_empty() => {
                write!(f, "endpoint returned HTTP {code}")
            }
            TransportError::Status { code, body } => {
                write!(f, "endpoint returned HTTP {code}: {body}")
            }
            TransportError::Malformed(detail) => write!(f, "malformed response payload: {detail}"),
        }
    }
}

impl Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        operation: RemoteOperation,
        request: &ChatRequest,
    ) -> Result<ChatResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(
        &self,
        operation: RemoteOperation,
        request: &ChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        (**self).send(operation, request).await
    }
}

/// JSON-over-HTTP transport posting to `{base_url}/{operation}`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build a transport whose requests give up after `timeout`. A timed-out
    /// request is reported as [`TransportError::Unreachable`].
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, base_url))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        operation: RemoteOperation,
        request: &ChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        let url = construct_api_url(&self.base_url, operation.path());
        debug!(%url, "posting chat request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::Unreachable(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Unreachable(err.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                code: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str::<ChatResponse>(&body)
            .map_err(|err| TransportError::Malformed(err.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
