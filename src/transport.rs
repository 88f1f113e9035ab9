use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A JSON POST as the remote service sees it. Cloneable so a retry can
/// replay it unchanged.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl ApiRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self, TransportError> {
        let value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::InvalidHeader(name.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn bearer(self, token: &str) -> Result<Self, TransportError> {
        self.header(AUTHORIZATION, &format!("Bearer {}", token))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid value for header {0}")]
    InvalidHeader(String),
}

#[derive(Deserialize)]
struct RemoteError {
    message: String,
}

impl TransportError {
    /// The remote `message` field when the service sent one, otherwise the
    /// generic error text.
    pub fn message(&self) -> String {
        if let TransportError::Status { body, .. } = self {
            if let Ok(remote) = serde_json::from_str::<RemoteError>(body) {
                return remote.message;
            }
        }
        self.to_string()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Single-shot transport over a configured reqwest client. Non-2xx answers
/// come back as [`TransportError::Status`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let resp = self
            .client
            .post(&request.url)
            .headers(request.headers.clone())
            .json(&request.body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}
