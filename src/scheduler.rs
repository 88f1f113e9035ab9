use crate::account::AccountBook;
use crate::api::RemoteApi;
use crate::client::ClientFactory;
use crate::clock::Sleeper;
use crate::configuration::Settings;
use crate::error::HarvestResult;
use crate::harvest::{harvest_account, HarvestOutcome};
use crate::payload::PayloadSource;
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

const CYCLE_RULE: &str = "═══════════════════════════════════════════";

/// Drives the endless harvest loop over a fixed set of accounts.
pub struct Scheduler<F, P> {
    book: AccountBook,
    factory: F,
    payloads: P,
    api: RemoteApi,
    sleeper: Arc<dyn Sleeper>,
    account_delay: Duration,
    cycle_delay: Duration,
}

impl<F: ClientFactory, P: PayloadSource> Scheduler<F, P> {
    pub fn new(
        settings: &Settings,
        book: AccountBook,
        factory: F,
        payloads: P,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            book,
            factory,
            payloads,
            api: RemoteApi::from_settings(settings),
            sleeper,
            account_delay: settings.account_delay(),
            cycle_delay: settings.cycle_delay(),
        }
    }

    /// Only returns when a cycle hits a fatal error.
    pub async fn run(&self) -> HarvestResult<Infallible> {
        info!(
            "Starting continuous harvest for {} accounts with {} seconds delay...",
            self.book.len(),
            self.cycle_delay.as_secs()
        );
        info!("Loaded {} proxies", self.book.proxy_count());

        loop {
            self.tick().await?;
        }
    }

    /// One cycle followed by the inter-cycle wait.
    pub async fn tick(&self) -> HarvestResult<Vec<HarvestOutcome>> {
        let outcomes = self.run_cycle().await?;
        info!(
            "Waiting {} seconds before next harvest...",
            self.cycle_delay.as_secs()
        );
        self.sleeper.sleep(self.cycle_delay).await;
        Ok(outcomes)
    }

    /// Re-reads the payload, then visits every account in order. Errors here
    /// are payload errors; per-account failures are already contained.
    pub async fn run_cycle(&self) -> HarvestResult<Vec<HarvestOutcome>> {
        info!("{}", CYCLE_RULE);
        info!("Starting harvest cycle");

        let payload = self.payloads.load().await?;
        let accounts = self.book.accounts();
        let mut outcomes = Vec::with_capacity(accounts.len());

        for (i, account) in accounts.iter().enumerate() {
            let proxy = self.book.proxy_for(i);
            outcomes.push(
                harvest_account(i, account, &payload, proxy, &self.factory, &self.api).await,
            );

            if i + 1 < accounts.len() {
                self.sleeper.sleep(self.account_delay).await;
            }
        }

        Ok(outcomes)
    }
}
