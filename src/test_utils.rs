use crate::client::ClientFactory;
use crate::clock::Sleeper;
use crate::error::{HarvestError, HarvestResult};
use crate::proxy::ProxyAgent;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SUBMIT_URL: &str = "https://collector.invalid/api/harvest-data";
pub const EARNINGS_URL: &str = "https://dashboard.invalid/api/profile/me";

pub fn alice_profile() -> String {
    json!({
        "data": {
            "todays_earning": { "tpoints": 5, "date": "2024-01-01" },
            "loyalty_points": 10,
            "username": "alice",
            "tier": { "tier_name": "gold" }
        }
    })
    .to_string()
}

#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Plays back canned results in order; `Err(status)` becomes a status error.
/// Once the script is empty the fallback answers every call.
#[derive(Clone)]
pub struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<String, u16>>>>,
    fallback: Result<String, u16>,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<String, u16>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback: Err(500),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always_failing(status: u16) -> Self {
        Self {
            fallback: Err(status),
            ..Self::new(Vec::new())
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, _request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match next {
            Ok(body) => Ok(ApiResponse { status: 200, body }),
            Err(status) => Err(TransportError::Status {
                status,
                body: json!({ "message": "scripted failure" }).to_string(),
            }),
        }
    }
}

/// Stands in for both remote endpoints. Every client it builds shares one
/// request log, so a test can see the whole cycle in order.
#[derive(Clone)]
pub struct FakeFactory {
    failing_secrets: HashSet<String>,
    unbuildable_proxy: Option<String>,
    earnings_body: String,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    built_with: Arc<Mutex<Vec<Option<String>>>>,
}

impl Default for FakeFactory {
    fn default() -> Self {
        Self {
            failing_secrets: HashSet::new(),
            unbuildable_proxy: None,
            earnings_body: alice_profile(),
            requests: Arc::default(),
            built_with: Arc::default(),
        }
    }
}

impl FakeFactory {
    pub fn failing(secrets: &[&str]) -> Self {
        Self {
            failing_secrets: secrets.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_earnings_body(mut self, body: impl Into<String>) -> Self {
        self.earnings_body = body.into();
        self
    }

    /// Refuse to build a client routed through the proxy at `url`.
    pub fn with_unbuildable_proxy(mut self, url: impl Into<String>) -> Self {
        self.unbuildable_proxy = Some(url.into());
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `apiSecret` of every submission, in the order they were sent.
    pub fn submitted_secrets(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r.url == SUBMIT_URL)
            .filter_map(|r| r.body["apiSecret"].as_str().map(str::to_string))
            .collect()
    }

    pub fn earnings_calls(&self) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == EARNINGS_URL)
            .collect()
    }

    pub fn built_with(&self) -> Vec<Option<String>> {
        self.built_with.lock().unwrap().clone()
    }
}

impl ClientFactory for FakeFactory {
    type Client = FakeFactory;

    fn build(&self, proxy: Option<&ProxyAgent>) -> HarvestResult<Self::Client> {
        let url = proxy.map(|agent| agent.url.clone());
        self.built_with.lock().unwrap().push(url.clone());
        if url.is_some() && url == self.unbuildable_proxy {
            return Err(HarvestError::Io(std::io::Error::other("client build refused")));
        }
        Ok(self.clone())
    }
}

#[async_trait]
impl Transport for FakeFactory {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if request.url == SUBMIT_URL {
            let secret = request.body["apiSecret"].as_str().unwrap_or_default();
            if self.failing_secrets.contains(secret) {
                return Err(TransportError::Status {
                    status: 401,
                    body: json!({ "message": "Invalid API secret" }).to_string(),
                });
            }
            return Ok(ApiResponse {
                status: 200,
                body: json!({ "success": true }).to_string(),
            });
        }
        Ok(ApiResponse {
            status: 200,
            body: self.earnings_body.clone(),
        })
    }
}
