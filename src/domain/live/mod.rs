//! Live price domain — the derived per-instrument dashboard value.

pub mod resolve;

use crate::shared::Instrument;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use resolve::resolve_change;

/// The derived live price for one instrument.
///
/// Recomputed on every refresh and always replaced wholesale — consumers never
/// observe a partially updated value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivePrice {
    pub instrument: Instrument,
    pub price: Decimal,
    /// Session open, as derived by the candle aggregator.
    pub open: Decimal,
    /// Session high/low over the polled tick set.
    pub high: Decimal,
    pub low: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub as_of: DateTime<Utc>,
}

/// Change figures as reported by the upstream feed itself.
///
/// Observed unreliable or absent; the resolver prefers a locally computed
/// baseline and only falls back to these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpstreamChange {
    pub change: Decimal,
    pub change_percent: Decimal,
}
