//! Conversions from wire records to domain ticks and candles.

use super::wire::{DailyHistoryRecord, SpotQuotationRecord};
use super::Tick;
use crate::domain::candle::{day_bucket, Candle};
use crate::shared::Instrument;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parses a quotation time field into a UTC timestamp.
///
/// The feed usually sends a bare clock-of-day string; those get the supplied
/// trading-calendar date attached. Full datetimes are accepted as-is.
pub fn parse_quote_time(
    raw: &str,
    trading_day: NaiveDate,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    let naive = if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        dt
    } else if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        trading_day.and_time(t)
    } else if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M") {
        trading_day.and_time(t)
    } else {
        return None;
    };

    naive
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalizes one quotation row into a tick. Rows without a parseable price
/// and time are dropped by the caller.
pub fn tick_from_record(
    record: &SpotQuotationRecord,
    instrument: Instrument,
    trading_day: NaiveDate,
    offset: FixedOffset,
) -> Option<Tick> {
    let price = record.price?;
    let timestamp = parse_quote_time(record.time.as_deref()?, trading_day, offset)?;
    Some(Tick {
        instrument,
        timestamp,
        price,
    })
}

/// Normalizes one daily history row into a settled candle.
///
/// A row missing any part of the OHLC quadruple (or its date) yields `None`;
/// such rows are skipped rather than failing the whole series.
pub fn candle_from_daily(record: &DailyHistoryRecord) -> Option<Candle> {
    let date = NaiveDate::parse_from_str(record.date.as_deref()?.trim(), "%Y-%m-%d").ok()?;
    let (open, high, low, close) = (record.open?, record.high?, record.low?, record.close?);

    Some(Candle {
        period_start: day_bucket(date),
        open,
        high,
        low,
        close,
        volume: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_clock_string_gets_date_attached() {
        let ts = parse_quote_time("09:30:05", day(), cst()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T01:30:05+00:00");
    }

    #[test]
    fn test_full_datetime_accepted() {
        let ts = parse_quote_time("2024-01-15 09:30:05", day(), cst()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T01:30:05+00:00");
    }

    #[test]
    fn test_hour_minute_only() {
        let ts = parse_quote_time("09:30", day(), cst()).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T01:30:00+00:00");
    }

    #[test]
    fn test_garbage_time_rejected() {
        assert!(parse_quote_time("昨收", day(), cst()).is_none());
        assert!(parse_quote_time("", day(), cst()).is_none());
    }

    #[test]
    fn test_tick_requires_price_and_time() {
        let full = SpotQuotationRecord {
            time: Some("10:00:00".into()),
            price: Some(Decimal::from_str("552.31").unwrap()),
            ..Default::default()
        };
        let tick = tick_from_record(&full, Instrument::Gold, day(), cst()).unwrap();
        assert_eq!(tick.price, Decimal::from_str("552.31").unwrap());
        assert_eq!(tick.instrument, Instrument::Gold);

        let no_price = SpotQuotationRecord {
            time: Some("10:00:00".into()),
            ..Default::default()
        };
        assert!(tick_from_record(&no_price, Instrument::Gold, day(), cst()).is_none());
    }

    #[test]
    fn test_daily_candle_requires_complete_ohlc() {
        let complete = DailyHistoryRecord {
            date: Some("2024-01-15".into()),
            open: Some(Decimal::from(480)),
            high: Some(Decimal::from(485)),
            low: Some(Decimal::from(478)),
            close: Some(Decimal::from(482)),
        };
        let candle = candle_from_daily(&complete).unwrap();
        assert_eq!(candle.period_start, day_bucket(day()));
        assert!(candle.is_well_formed());

        let partial = DailyHistoryRecord {
            close: None,
            ..complete.clone()
        };
        assert!(candle_from_daily(&partial).is_none());

        let bad_date = DailyHistoryRecord {
            date: Some("15/01/2024".into()),
            ..complete
        };
        assert!(candle_from_daily(&bad_date).is_none());
    }
}
