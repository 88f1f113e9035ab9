use crate::account::Account;
use crate::api::{EarningsReport, RemoteApi};
use crate::client::ClientFactory;
use crate::display::print_earnings;
use crate::error::HarvestResult;
use crate::payload::HarvestPayload;
use crate::proxy::resolve_proxy;
use log::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum HarvestOutcome {
    /// Submission went through; earnings are `None` when the lookup failed.
    Submitted { earnings: Option<EarningsReport> },
    SubmitFailed,
    /// Something outside the two remote calls went wrong for this account.
    Aborted,
}

/// One account, one pass. Never fails: every problem is logged against the
/// account and the caller moves on to the next one.
pub async fn harvest_account<F: ClientFactory>(
    index: usize,
    account: &Account,
    payload: &HarvestPayload,
    proxy: Option<&str>,
    factory: &F,
    api: &RemoteApi,
) -> HarvestOutcome {
    match try_harvest(index, account, payload, proxy, factory, api).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("[Account {}] Error: {}", index + 1, e);
            HarvestOutcome::Aborted
        }
    }
}

async fn try_harvest<F: ClientFactory>(
    index: usize,
    account: &Account,
    payload: &HarvestPayload,
    proxy: Option<&str>,
    factory: &F,
    api: &RemoteApi,
) -> HarvestResult<HarvestOutcome> {
    let agent = resolve_proxy(proxy);
    let client = factory.build(agent.as_ref())?;
    match &agent {
        Some(agent) => warn!("[Account {}] Using proxy: {}", index + 1, agent),
        None => warn!("[Account {}] Using proxy: Direct connection", index + 1),
    }

    let submitted = api
        .submit_harvest(&client, &account.secret, &payload.url, &payload.harvested_data)
        .await;
    if submitted.is_none() {
        return Ok(HarvestOutcome::SubmitFailed);
    }
    info!("✓ Account {}: Harvest data sent successfully", index + 1);

    let earnings = api.fetch_earnings(&client, &account.token).await;
    if let Some(report) = &earnings {
        print_earnings(index, report);
    }
    Ok(HarvestOutcome::Submitted { earnings })
}
