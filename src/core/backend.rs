//! The two operations the client needs from its backend: load the
//! configuration, and exchange one chat turn.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ChatRequest, ChatResponse, ConfigResponse};
use crate::core::config::BackendConfig;
use crate::utils::url::construct_api_url;

#[derive(Debug)]
pub enum BackendError {
    /// The request could not be sent or the connection failed.
    Request(reqwest::Error),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body was not the expected JSON.
    Decode(String),
    /// No answer within the configured limit.
    Timeout,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Request(err) => write!(f, "request failed: {err}"),
            BackendError::Status { status, body } if body.is_empty() => {
                write!(f, "HTTP error! status: {status}")
            }
            BackendError::Status { status, body } => {
                write!(f, "HTTP error! status: {status}: {body}")
            }
            BackendError::Decode(detail) => write!(f, "invalid response body: {detail}"),
            BackendError::Timeout => write!(f, "timed out waiting for the backend"),
        }
    }
}

impl StdError for BackendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            BackendError::Request(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else if err.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Request(err)
        }
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /config`.
    async fn fetch_config(&self) -> Result<BackendConfig, BackendError>;

    /// `POST /chat`.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

/// [`ChatBackend`] over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn fetch_config(&self) -> Result<BackendConfig, BackendError> {
        let url = construct_api_url(&self.base_url, "config");
        debug!(%url, "Fetching backend config");
        let response = self.client.get(url).send().await?;
        let response = Self::error_for_status(response).await?;
        let payload: ConfigResponse = response.json().await?;
        Ok(payload.into())
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let url = construct_api_url(&self.base_url, "chat");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }
}
