//! Low-level HTTP client — `MetalsHttp`.
//!
//! One method per gateway endpoint. Returns wire types (conversion to domain
//! types happens at the sub-client boundary). No retries here: the refresh
//! pipeline is periodic, so the next tick is the retry.

use crate::domain::quote::wire::{DailyHistoryRecord, SpotQuotationRecord};
use crate::error::FetchError;
use crate::network::{DAILY_HISTORY_ENDPOINT, SPOT_QUOTATIONS_ENDPOINT};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the AKTools-style quotation gateway.
#[derive(Clone)]
pub struct MetalsHttp {
    base_url: String,
    client: Client,
}

impl MetalsHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Intraday quotation snapshot — many points per call, polled, not streamed.
    pub async fn get_spot_quotations(
        &self,
        symbol: &str,
    ) -> Result<Vec<SpotQuotationRecord>, FetchError> {
        let url = format!("{}/{}", self.base_url, SPOT_QUOTATIONS_ENDPOINT);
        self.get(&url, &[("symbol", symbol)]).await
    }

    /// Full available trailing daily series for a symbol.
    pub async fn get_daily_history(
        &self,
        symbol: &str,
    ) -> Result<Vec<DailyHistoryRecord>, FetchError> {
        let url = format!("{}/{}", self.base_url, DAILY_HISTORY_ENDPOINT);
        self.get(&url, &[("symbol", symbol)]).await
    }

    // ── Internal ─────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::unavailable(format!(
                "{} returned status {}: {}",
                url,
                status.as_u16(),
                body
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::malformed(e.to_string()))
    }
}
