use crate::clock::Sleeper;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Linear backoff: retry `n` (1-based) waits `base_delay * n`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Wraps a transport so every request gets the same retry budget. Any
/// failure is retried until `max_retries` is spent, then the last error is
/// returned to the caller.
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut retry = 0;
        loop {
            match self.inner.execute(request).await {
                Ok(resp) => return Ok(resp),
                Err(e) if retry >= self.policy.max_retries => return Err(e),
                Err(e) => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    warn!(
                        "request to {} failed ({}), retry {}/{}",
                        request.url,
                        e.message(),
                        retry,
                        self.policy.max_retries
                    );
                    debug!("backing off {}ms", delay.as_millis());
                    self.sleeper.sleep(delay).await;
                }
            }
        }
    }
}
