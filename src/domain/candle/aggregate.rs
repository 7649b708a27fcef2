//! Pure aggregation of tick sequences into OHLC candles.

use super::{day_bucket, minute_bucket, Candle};
use crate::domain::quote::Tick;
use chrono::{FixedOffset, NaiveTime, Timelike};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

struct BucketAcc {
    // (timestamp secs, input index) — ties in timestamp break by input order.
    first: (i64, usize),
    open: Decimal,
    last: (i64, usize),
    close: Decimal,
    high: Decimal,
    low: Decimal,
    count: u64,
}

/// Groups ticks into 1-minute OHLC candles.
///
/// Open is the price of the earliest tick in the bucket by timestamp (input
/// order breaks ties), close the latest, high/low the extrema. Volume is the
/// tick count — a proxy, not a traded-volume figure. Output is sorted
/// ascending by bucket start with no duplicate buckets.
pub fn minute_candles(ticks: &[Tick]) -> Vec<Candle> {
    let mut buckets: BTreeMap<i64, BucketAcc> = BTreeMap::new();

    for (idx, tick) in ticks.iter().enumerate() {
        let secs = tick.timestamp.timestamp();
        let key = (secs, idx);
        let acc = buckets
            .entry(minute_bucket(secs))
            .or_insert_with(|| BucketAcc {
                first: key,
                open: tick.price,
                last: key,
                close: tick.price,
                high: tick.price,
                low: tick.price,
                count: 0,
            });

        if key < acc.first {
            acc.first = key;
            acc.open = tick.price;
        }
        if key >= acc.last {
            acc.last = key;
            acc.close = tick.price;
        }
        acc.high = acc.high.max(tick.price);
        acc.low = acc.low.min(tick.price);
        acc.count += 1;
    }

    buckets
        .into_iter()
        .map(|(period_start, acc)| Candle {
            period_start,
            open: acc.open,
            high: acc.high,
            low: acc.low,
            close: acc.close,
            volume: acc.count,
        })
        .collect()
}

/// Collapses the whole tick set into one in-progress candle anchored at the
/// start of the current local calendar day.
///
/// Open preference: the earliest tick whose local clock time falls in the
/// session-opening minute, else the explicit `reference_open` (typically
/// today's open from already-settled history), else the earliest tick.
/// Returns `None` for an empty tick set.
pub fn session_candle(
    ticks: &[Tick],
    reference_open: Option<Decimal>,
    session_open: NaiveTime,
    offset: FixedOffset,
) -> Option<Candle> {
    let earliest = ticks
        .iter()
        .enumerate()
        .min_by_key(|(idx, t)| (t.timestamp.timestamp(), *idx))?;
    let latest = ticks
        .iter()
        .enumerate()
        .max_by_key(|(idx, t)| (t.timestamp.timestamp(), *idx))?;

    let opening_tick = ticks
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let local = t.timestamp.with_timezone(&offset).time();
            local.hour() == session_open.hour() && local.minute() == session_open.minute()
        })
        .min_by_key(|(idx, t)| (t.timestamp.timestamp(), *idx));

    let open = opening_tick
        .map(|(_, t)| t.price)
        .or(reference_open)
        .unwrap_or(earliest.1.price);

    let mut high = open.max(latest.1.price);
    let mut low = open.min(latest.1.price);
    for tick in ticks {
        high = high.max(tick.price);
        low = low.min(tick.price);
    }

    let local_day = earliest.1.timestamp.with_timezone(&offset).date_naive();

    Some(Candle {
        period_start: day_bucket(local_day),
        open,
        high,
        low,
        close: latest.1.price,
        volume: ticks.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Instrument;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    const CST: i32 = 8 * 3600;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(CST).unwrap()
    }

    fn tick(rfc3339: &str, price: &str) -> Tick {
        Tick {
            instrument: Instrument::Gold,
            timestamp: DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_minute_candles_sorted_and_duplicate_free() {
        // Deliberately out of order across three buckets.
        let ticks = vec![
            tick("2024-01-15T09:02:10+08:00", "502"),
            tick("2024-01-15T09:00:05+08:00", "500"),
            tick("2024-01-15T09:01:30+08:00", "501"),
            tick("2024-01-15T09:00:55+08:00", "499"),
        ];
        let candles = minute_candles(&ticks);
        assert_eq!(candles.len(), 3);
        for pair in candles.windows(2) {
            assert!(pair[0].period_start < pair[1].period_start);
        }
        for c in &candles {
            assert!(c.is_well_formed());
            assert_eq!(c.period_start % 60, 0);
        }
    }

    #[test]
    fn test_minute_candle_ohlc() {
        let ticks = vec![
            tick("2024-01-15T09:00:05+08:00", "500"),
            tick("2024-01-15T09:00:20+08:00", "505"),
            tick("2024-01-15T09:00:40+08:00", "498"),
            tick("2024-01-15T09:00:55+08:00", "503"),
        ];
        let candles = minute_candles(&ticks);
        assert_eq!(candles.len(), 1);
        let c = &candles[0];
        assert_eq!(c.open, Decimal::from(500));
        assert_eq!(c.high, Decimal::from(505));
        assert_eq!(c.low, Decimal::from(498));
        assert_eq!(c.close, Decimal::from(503));
        assert_eq!(c.volume, 4);
    }

    #[test]
    fn test_minute_candle_timestamp_ties_stable() {
        // Same timestamp: open is the first-seen, close the last-seen.
        let ticks = vec![
            tick("2024-01-15T09:00:10+08:00", "500"),
            tick("2024-01-15T09:00:10+08:00", "501"),
            tick("2024-01-15T09:00:10+08:00", "502"),
        ];
        let candles = minute_candles(&ticks);
        assert_eq!(candles[0].open, Decimal::from(500));
        assert_eq!(candles[0].close, Decimal::from(502));
    }

    #[test]
    fn test_minute_candles_empty_input() {
        assert!(minute_candles(&[]).is_empty());
    }

    #[test]
    fn test_session_candle_prefers_opening_minute_tick() {
        let ticks = vec![
            tick("2024-01-15T08:59:58+08:00", "497"),
            tick("2024-01-15T09:00:03+08:00", "500"),
            tick("2024-01-15T11:30:00+08:00", "520"),
            tick("2024-01-15T14:00:00+08:00", "495"),
            tick("2024-01-15T15:10:00+08:00", "515"),
        ];
        let open_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let c = session_candle(&ticks, Some(Decimal::from(490)), open_time, cst()).unwrap();
        assert_eq!(c.open, Decimal::from(500));
        assert_eq!(c.high, Decimal::from(520));
        assert_eq!(c.low, Decimal::from(495));
        assert_eq!(c.close, Decimal::from(515));
        // Anchored at UTC midnight of the local trading day.
        assert_eq!(c.period_start, day_bucket(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert!(c.is_well_formed());
    }

    #[test]
    fn test_session_candle_reference_open_fallback() {
        let ticks = vec![
            tick("2024-01-15T10:15:00+08:00", "502"),
            tick("2024-01-15T10:20:00+08:00", "504"),
        ];
        let open_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let c = session_candle(&ticks, Some(Decimal::from(500)), open_time, cst()).unwrap();
        assert_eq!(c.open, Decimal::from(500));
        // The synthetic open still participates in the extrema.
        assert_eq!(c.low, Decimal::from(500));
        assert_eq!(c.close, Decimal::from(504));
    }

    #[test]
    fn test_session_candle_earliest_tick_fallback() {
        let ticks = vec![
            tick("2024-01-15T10:20:00+08:00", "504"),
            tick("2024-01-15T10:15:00+08:00", "502"),
        ];
        let open_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let c = session_candle(&ticks, None, open_time, cst()).unwrap();
        assert_eq!(c.open, Decimal::from(502));
    }

    #[test]
    fn test_session_candle_empty() {
        let open_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(session_candle(&[], None, open_time, cst()).is_none());
    }
}
