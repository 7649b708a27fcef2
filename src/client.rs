//! High-level client — `MetalsClient` with the per-instrument refresh pipeline.
//!
//! One refresh cycle runs strictly fetch → aggregate → reconcile → resolve →
//! publish, so a consumer never reads a live price computed against a
//! different reconciled series than the one the chart path serves.

use crate::cache::SeriesCache;
use crate::clock::{Clock, SystemClock};
use crate::domain::candle::{self, day_bucket, previous_close, reconcile, session_candle, Candle};
use crate::domain::live::{resolve_change, LivePrice};
use crate::domain::quote::client::Quotes;
use crate::error::{FetchError, MetalsError};
use crate::http::MetalsHttp;
use crate::shared::Instrument;

use async_lock::RwLock;
use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

// Re-export sub-client type for convenience.
pub use crate::domain::quote::client::Quotes as QuotesClient;

/// The last published live state for one instrument.
///
/// `price` and `session` are always written together; consumers read the pair
/// behind one lock, never a half-updated value.
#[derive(Debug, Clone)]
pub(crate) struct LiveState {
    pub(crate) price: LivePrice,
    pub(crate) session: Candle,
}

/// The primary entry point for the spot-price pipeline.
pub struct MetalsClient {
    pub(crate) http: MetalsHttp,
    pub(crate) daily_cache: Arc<SeriesCache>,
    pub(crate) live: Arc<RwLock<HashMap<Instrument, LiveState>>>,
    pub(crate) clock: Arc<dyn Clock>,
    /// Trading-calendar zone (SGE: UTC+8).
    pub(crate) tz_offset: FixedOffset,
    /// Local clock time of the session opening instant.
    pub(crate) session_open: NaiveTime,
}

impl MetalsClient {
    pub fn builder() -> MetalsClientBuilder {
        MetalsClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    // ── Refresh pipeline ─────────────────────────────────────────────────

    /// Runs one refresh cycle for an instrument and publishes the result.
    ///
    /// On adapter failure the error propagates and cached state is left
    /// untouched; the next periodic tick is the retry.
    pub async fn refresh(&self, instrument: Instrument) -> Result<LivePrice, MetalsError> {
        let snapshot = match self.quotes().latest_snapshot(instrument).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(%instrument, error = %e, "Refresh aborted; keeping previous state");
                return Err(e);
            }
        };
        let now = snapshot.as_of;
        let today_start = day_bucket(now.with_timezone(&self.tz_offset).date_naive());

        let daily = self.settled_daily(instrument, now).await;

        // If today has already settled upstream, its open is the reference
        // open for the in-progress candle.
        let reference_open = daily
            .iter()
            .find(|c| c.period_start == today_start)
            .map(|c| c.open);

        let session = session_candle(
            &snapshot.ticks,
            reference_open,
            self.session_open,
            self.tz_offset,
        )
        .ok_or_else(|| FetchError::malformed("no usable quotation rows"))?;

        let reconciled = reconcile(&daily, &session);
        let prev_close = previous_close(&reconciled, today_start);

        let (change, change_percent) = resolve_change(
            session.close,
            prev_close,
            Some(session.open),
            snapshot.upstream_change,
        );

        let live = LivePrice {
            instrument,
            price: session.close,
            open: session.open,
            high: session.high,
            low: session.low,
            change,
            change_percent,
            as_of: now,
        };

        self.live.write().await.insert(
            instrument,
            LiveState {
                price: live.clone(),
                session,
            },
        );
        debug!(%instrument, price = %live.price, change = %live.change, "Published live price");
        Ok(live)
    }

    // ── Consumer surface ─────────────────────────────────────────────────

    /// The last published live price, or `None` before the first successful
    /// refresh — never a fabricated value.
    pub async fn live_price(&self, instrument: Instrument) -> Option<LivePrice> {
        self.live
            .read()
            .await
            .get(&instrument)
            .map(|state| state.price.clone())
    }

    /// The trailing reconciled daily series, at most `window_days` entries.
    ///
    /// Degrades softly: when upstream history is unavailable this returns
    /// whatever is known (stale cache, today-only, or empty), never an error.
    pub async fn daily_series(&self, instrument: Instrument, window_days: usize) -> Vec<Candle> {
        let now = self.clock.now_utc();
        let daily = self.settled_daily(instrument, now).await;

        let reconciled = match self.live.read().await.get(&instrument) {
            Some(state) => reconcile(&daily, &state.session),
            None => daily,
        };

        let start = reconciled.len().saturating_sub(window_days);
        reconciled[start..].to_vec()
    }

    /// Today's minute candles, derived best-effort from the polled snapshot.
    pub async fn minute_candles(&self, instrument: Instrument) -> Result<Vec<Candle>, MetalsError> {
        let snapshot = self.quotes().latest_snapshot(instrument).await?;
        Ok(candle::minute_candles(&snapshot.ticks))
    }

    // ── Internal ─────────────────────────────────────────────────────────

    /// The settled daily series, from cache or via a single-flight fetch.
    pub(crate) async fn settled_daily(
        &self,
        instrument: Instrument,
        now: DateTime<Utc>,
    ) -> Vec<Candle> {
        if let Some(series) = self.daily_cache.get(instrument, now).await {
            return series;
        }

        let guard = self.daily_cache.fetch_guard(instrument).await;
        let _flight = guard.lock().await;

        // Another caller may have completed the fetch while we waited.
        if let Some(series) = self.daily_cache.get(instrument, now).await {
            debug!(%instrument, "Daily series fetched by concurrent refresher");
            return series;
        }

        match self.quotes().daily_history(instrument).await {
            Ok(series) => {
                self.daily_cache.put(instrument, series.clone(), now).await;
                series
            }
            Err(e) => {
                warn!(%instrument, error = %e, "Daily history fetch failed");
                match self.daily_cache.get_stale(instrument).await {
                    Some(stale) => {
                        warn!(%instrument, "Serving stale daily series");
                        stale
                    }
                    None => Vec::new(),
                }
            }
        }
    }
}

impl Clone for MetalsClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            daily_cache: self.daily_cache.clone(),
            live: self.live.clone(),
            clock: self.clock.clone(),
            tz_offset: self.tz_offset,
            session_open: self.session_open,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct MetalsClientBuilder {
    base_url: String,
    request_timeout: Duration,
    daily_ttl: Duration,
    tz_offset: FixedOffset,
    session_open: NaiveTime,
    clock: Arc<dyn Clock>,
}

impl Default for MetalsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            daily_ttl: Duration::from_secs(24 * 3600),
            tz_offset: FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset"),
            session_open: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
            clock: Arc::new(SystemClock),
        }
    }
}

impl MetalsClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Per-request timeout for adapter calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// TTL for cached daily series.
    pub fn daily_ttl(mut self, ttl: Duration) -> Self {
        self.daily_ttl = ttl;
        self
    }

    /// Trading-calendar zone offset.
    pub fn tz_offset(mut self, offset: FixedOffset) -> Self {
        self.tz_offset = offset;
        self
    }

    /// Local clock time of the session opening instant.
    pub fn session_open(mut self, open: NaiveTime) -> Self {
        self.session_open = open;
        self
    }

    /// Replace the wall-clock source (tests use a fixed clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<MetalsClient, MetalsError> {
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| MetalsError::Config(format!("invalid base url: {}", e)))?;

        Ok(MetalsClient {
            http: MetalsHttp::new(&self.base_url, self.request_timeout),
            daily_cache: Arc::new(SeriesCache::new(self.daily_ttl)),
            live: Arc::new(RwLock::new(HashMap::new())),
            clock: self.clock,
            tz_offset: self.tz_offset,
            session_open: self.session_open,
        })
    }
}
