use crate::configuration::Settings;
use crate::error::{HarvestError, HarvestResult};
use crate::transport::{ApiRequest, Transport};
use log::error;
use reqwest::header::{ORIGIN, REFERER};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Leaf values are passed through as the dashboard sends them; only the
/// `data` and `tier` objects are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaysEarning {
    #[serde(default)]
    pub tpoints: Value,
    #[serde(default)]
    pub date: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReport {
    pub todays_earning: TodaysEarning,
    pub loyalty_points: Value,
    pub username: Value,
    pub current_tier: String,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    data: Option<ProfileData>,
}

#[derive(Deserialize)]
struct ProfileData {
    todays_earning: TodaysEarning,
    #[serde(default)]
    loyalty_points: Value,
    #[serde(default)]
    username: Value,
    tier: Tier,
}

#[derive(Deserialize)]
struct Tier {
    tier_name: String,
}

impl From<ProfileData> for EarningsReport {
    fn from(data: ProfileData) -> Self {
        Self {
            todays_earning: data.todays_earning,
            loyalty_points: data.loyalty_points,
            username: data.username,
            current_tier: data.tier.tier_name,
        }
    }
}

/// The two remote calls. Neither returns an error: failures are logged and
/// come back as `None`.
#[derive(Debug, Clone)]
pub struct RemoteApi {
    submit_endpoint: String,
    earnings_endpoint: String,
    dashboard_origin: String,
}

impl RemoteApi {
    pub fn new(
        submit_endpoint: impl Into<String>,
        earnings_endpoint: impl Into<String>,
        dashboard_origin: impl Into<String>,
    ) -> Self {
        Self {
            submit_endpoint: submit_endpoint.into(),
            earnings_endpoint: earnings_endpoint.into(),
            dashboard_origin: dashboard_origin.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.submit_endpoint,
            &settings.earnings_endpoint,
            &settings.dashboard_origin,
        )
    }

    /// Returns the raw response body on success.
    pub async fn submit_harvest<T: Transport + ?Sized>(
        &self,
        client: &T,
        secret: &str,
        url: &str,
        harvested_data: &Value,
    ) -> Option<String> {
        let request = ApiRequest::post(
            &self.submit_endpoint,
            json!({
                "apiSecret": secret,
                "url": url,
                "harvestedData": harvested_data,
            }),
        );
        match client.execute(&request).await {
            Ok(resp) => Some(resp.body),
            Err(e) => {
                error!("Error sending data: {}", e.message());
                None
            }
        }
    }

    pub async fn fetch_earnings<T: Transport + ?Sized>(
        &self,
        client: &T,
        token: &str,
    ) -> Option<EarningsReport> {
        match self.try_fetch_earnings(client, token).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Error fetching earnings data: {}", e);
                None
            }
        }
    }

    async fn try_fetch_earnings<T: Transport + ?Sized>(
        &self,
        client: &T,
        token: &str,
    ) -> HarvestResult<EarningsReport> {
        let request = ApiRequest::post(&self.earnings_endpoint, json!({}))
            .bearer(token)?
            .header(ORIGIN, &self.dashboard_origin)?
            .header(REFERER, &format!("{}/", self.dashboard_origin))?;

        let resp = client.execute(&request).await?;
        let envelope: ProfileEnvelope = serde_json::from_str(&resp.body)
            .map_err(|e| HarvestError::InvalidResponse(e.to_string()))?;
        let data = envelope
            .data
            .ok_or_else(|| HarvestError::InvalidResponse("missing data".to_string()))?;
        Ok(data.into())
    }
}
