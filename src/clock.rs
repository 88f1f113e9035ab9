use async_trait::async_trait;
use std::time::Duration;

/// Every wait in the agent (retry backoff, account pacing, cycle delay)
/// goes through this, so tests can observe waits without real time passing.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
