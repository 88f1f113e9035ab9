use crate::clock::Sleeper;
use crate::configuration::Settings;
use crate::error::HarvestResult;
use crate::proxy::ProxyAgent;
use crate::retry::{RetryPolicy, RetryingTransport};
use crate::transport::{ReqwestTransport, Transport};
use log::debug;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE,
    USER_AGENT,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// The remote service turns away requests that do not look like they came
/// from a browser.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Builds one client per account per cycle. `proxy` is already resolved;
/// `None` means a direct connection.
pub trait ClientFactory: Send + Sync {
    type Client: Transport;

    fn build(&self, proxy: Option<&ProxyAgent>) -> HarvestResult<Self::Client>;
}

pub type HarvestClient = RetryingTransport<ReqwestTransport>;

pub struct HttpClientFactory {
    timeout: Duration,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpClientFactory {
    pub fn new(timeout: Duration, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            timeout,
            policy,
            sleeper,
        }
    }

    pub fn from_settings(settings: &Settings, sleeper: Arc<dyn Sleeper>) -> Self {
        Self::new(settings.request_timeout(), settings.retry_policy(), sleeper)
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = HarvestClient;

    fn build(&self, proxy: Option<&ProxyAgent>) -> HarvestResult<HarvestClient> {
        let mut builder = Client::builder()
            .default_headers(default_headers())
            .timeout(self.timeout);

        if let Some(agent) = proxy {
            debug!("routing through {}", agent);
            builder = builder.proxy(agent.clone().into_proxy());
        }

        let client = builder.build()?;
        Ok(RetryingTransport::new(
            ReqwestTransport::new(client),
            self.policy,
            self.sleeper.clone(),
        ))
    }
}
