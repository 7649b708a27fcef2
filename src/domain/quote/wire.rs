//! Wire types mirroring the quotation gateway's JSON.
//!
//! The gateway re-exports exchange tables with their original Chinese column
//! headers, so field renames here are part of the wire format, not styling.
//! Every field is optional at this layer; validation happens in `convert`.

use crate::shared::serde_util::decimal_flexible;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One row of the intraday spot quotation snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotQuotationRecord {
    /// Variety, e.g. `Au99.99`.
    #[serde(rename = "品种", default)]
    pub variety: Option<String>,

    /// Quote time. Usually a clock-of-day string (`09:30:05`), occasionally a
    /// full datetime.
    #[serde(rename = "时间", default)]
    pub time: Option<String>,

    /// Current price.
    #[serde(rename = "现价", default, with = "decimal_flexible")]
    pub price: Option<Decimal>,

    /// Exchange-reported change. Observed unreliable; used only as a
    /// last-resort baseline.
    #[serde(rename = "涨跌", default, with = "decimal_flexible")]
    pub change: Option<Decimal>,

    /// Exchange-reported change percent.
    #[serde(rename = "涨跌幅", default, with = "decimal_flexible")]
    pub change_percent: Option<Decimal>,
}

/// One row of the settled daily history series.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyHistoryRecord {
    /// Trading date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default, with = "decimal_flexible")]
    pub open: Option<Decimal>,

    #[serde(default, with = "decimal_flexible")]
    pub high: Option<Decimal>,

    #[serde(default, with = "decimal_flexible")]
    pub low: Option<Decimal>,

    #[serde(default, with = "decimal_flexible")]
    pub close: Option<Decimal>,
}
