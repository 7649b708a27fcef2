//! Quote domain — normalized intraday ticks from the spot quotation feed.

pub mod client;
pub mod convert;
pub mod wire;

use crate::domain::live::UpstreamChange;
use crate::shared::Instrument;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single timestamped price observation.
///
/// Transient: produced by the adapter, consumed immediately by the candle
/// aggregator and reference resolver. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub instrument: Instrument,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// One normalized snapshot of the intraday feed.
///
/// The feed returns the whole session's points on every poll; alongside the
/// ticks it may report its own change/changePercent figures, which the
/// reference resolver uses only as a last resort.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    pub instrument: Instrument,
    pub ticks: Vec<Tick>,
    pub upstream_change: Option<UpstreamChange>,
    pub as_of: DateTime<Utc>,
}

impl QuoteSnapshot {
    /// Most recent tick of the session. Guaranteed present by the adapter.
    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.last()
    }
}
