//! Candle domain — OHLC summaries of price over a time bucket.

pub mod aggregate;
pub mod reconcile;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use aggregate::{minute_candles, session_candle};
pub use reconcile::{previous_close, reconcile};

/// Seconds in one minute bucket.
pub const MINUTE_SECS: i64 = 60;

/// An OHLC candle for one time bucket.
///
/// Invariant: `low <= open, close <= high`, and `period_start` is aligned to
/// the bucket size. Candles for one instrument and granularity form a strictly
/// increasing, duplicate-free sequence keyed by `period_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, Unix seconds, UTC-aligned.
    pub period_start: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Tick count for derived minute candles — a proxy, not traded volume.
    /// Zero for settled daily candles, where the feed reports no volume.
    pub volume: u64,
}

impl Candle {
    /// Checks the OHLC ordering invariant.
    pub fn is_well_formed(&self) -> bool {
        self.low <= self.open
            && self.low <= self.close
            && self.open <= self.high
            && self.close <= self.high
    }
}

/// Bucket start for a calendar day: midnight UTC of that date, in Unix seconds.
///
/// Daily history rows carry bare dates; anchoring them (and the synthesized
/// today candle) at UTC midnight keeps both sides of reconciliation on the
/// same key.
pub fn day_bucket(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Bucket start for a minute candle: floor to the containing minute.
pub fn minute_bucket(timestamp_secs: i64) -> i64 {
    timestamp_secs.div_euclid(MINUTE_SECS) * MINUTE_SECS
}
