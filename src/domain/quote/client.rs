//! Quotes sub-client — normalized snapshot and daily history fetches.

use super::convert::{candle_from_daily, tick_from_record};
use super::{QuoteSnapshot, Tick};
use crate::client::MetalsClient;
use crate::domain::candle::Candle;
use crate::domain::live::UpstreamChange;
use crate::error::{FetchError, MetalsError};
use crate::shared::Instrument;
use tracing::{debug, warn};

/// Sub-client for quote source operations. No caching, no derived math.
pub struct Quotes<'a> {
    pub(crate) client: &'a MetalsClient,
}

impl Quotes<'_> {
    /// Fetches and normalizes the current intraday snapshot.
    ///
    /// Fails with `MalformedResponse` when the payload is not a non-empty
    /// list, when the most recent entry lacks a price, or when no row
    /// normalizes into a usable tick.
    pub async fn latest_snapshot(
        &self,
        instrument: Instrument,
    ) -> Result<QuoteSnapshot, MetalsError> {
        let records = self
            .client
            .http
            .get_spot_quotations(instrument.symbol())
            .await?;

        let latest = match records.last() {
            Some(latest) => latest,
            None => return Err(FetchError::malformed("empty quotation snapshot").into()),
        };
        if latest.price.is_none() {
            return Err(FetchError::malformed("most recent quotation has no price").into());
        }
        let upstream_change = latest.change.zip(latest.change_percent).map(
            |(change, change_percent)| UpstreamChange {
                change,
                change_percent,
            },
        );

        let now = self.client.clock.now_utc();
        let trading_day = now.with_timezone(&self.client.tz_offset).date_naive();

        let ticks: Vec<Tick> = records
            .iter()
            .filter_map(|r| tick_from_record(r, instrument, trading_day, self.client.tz_offset))
            .collect();

        let skipped = records.len() - ticks.len();
        if skipped > 0 {
            debug!(%instrument, skipped, "Dropped unusable quotation rows");
        }
        if ticks.is_empty() {
            return Err(FetchError::malformed("no usable quotation rows").into());
        }

        Ok(QuoteSnapshot {
            instrument,
            ticks,
            upstream_change,
            as_of: now,
        })
    }

    /// Fetches and normalizes the full trailing daily series, sorted
    /// ascending by day bucket.
    ///
    /// Individual malformed rows are skipped; the call only fails as
    /// `MalformedResponse` when the list is empty or every row is malformed.
    pub async fn daily_history(&self, instrument: Instrument) -> Result<Vec<Candle>, MetalsError> {
        let records = self
            .client
            .http
            .get_daily_history(instrument.symbol())
            .await?;

        if records.is_empty() {
            return Err(FetchError::malformed("empty daily history").into());
        }

        let mut candles: Vec<Candle> = records.iter().filter_map(candle_from_daily).collect();

        let skipped = records.len() - candles.len();
        if skipped > 0 {
            warn!(%instrument, skipped, "Skipped incomplete daily history rows");
        }
        if candles.is_empty() {
            return Err(FetchError::malformed("all daily history rows malformed").into());
        }

        candles.sort_by_key(|c| c.period_start);
        candles.dedup_by_key(|c| c.period_start);
        Ok(candles)
    }
}
