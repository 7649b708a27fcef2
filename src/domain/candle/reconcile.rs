//! Reconciliation of settled daily history with the in-progress session.
//!
//! The live panel's "previous close" and the chart's trailing series must
//! come from the same reconciled sequence; deriving them from two
//! independently fetched copies lets them disagree about whether today has
//! posted yet.

use super::Candle;

/// Merges a settled daily series with the synthesized today candle.
///
/// If the series already contains today's day bucket it is returned
/// unchanged, so the call is idempotent. Otherwise the today candle is
/// appended and the sequence re-sorted ascending by bucket start. The result
/// has exactly one entry per calendar day; gaps from non-trading days are
/// expected and preserved.
pub fn reconcile(daily: &[Candle], today: &Candle) -> Vec<Candle> {
    let mut merged: Vec<Candle> = daily.to_vec();

    if !merged.iter().any(|c| c.period_start == today.period_start) {
        merged.push(today.clone());
        merged.sort_by_key(|c| c.period_start);
    }

    merged
}

/// The close of the last settled candle strictly before `day_start` — the
/// preferred baseline for change computation.
pub fn previous_close(series: &[Candle], day_start: i64) -> Option<rust_decimal::Decimal> {
    series
        .iter()
        .filter(|c| c.period_start < day_start)
        .max_by_key(|c| c.period_start)
        .map(|c| c.close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::day_bucket;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn candle(day: u32, open: i64, high: i64, low: i64, close: i64) -> Candle {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        Candle {
            period_start: day_bucket(date),
            open: Decimal::from(open),
            high: Decimal::from(high),
            low: Decimal::from(low),
            close: Decimal::from(close),
            volume: 0,
        }
    }

    #[test]
    fn test_appends_missing_today() {
        // History ends yesterday (Jan 14); today's ticks synthesized Jan 15.
        let daily = vec![candle(12, 470, 476, 469, 474), candle(14, 475, 482, 473, 480)];
        let today = candle(15, 500, 520, 495, 515);

        let merged = reconcile(&daily, &today);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.last().unwrap(), &today);
        for pair in merged.windows(2) {
            assert!(pair[0].period_start < pair[1].period_start);
        }
    }

    #[test]
    fn test_unchanged_when_today_present() {
        let daily = vec![candle(14, 475, 482, 473, 480), candle(15, 500, 518, 496, 512)];
        let today = candle(15, 500, 520, 495, 515);

        let merged = reconcile(&daily, &today);
        // The settled entry wins; the in-progress candle is not duplicated in.
        assert_eq!(merged, daily);
    }

    #[test]
    fn test_idempotent() {
        let daily = vec![candle(14, 475, 482, 473, 480)];
        let today = candle(15, 500, 520, 495, 515);

        let once = reconcile(&daily, &today);
        let twice = reconcile(&once, &today);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_history_becomes_today_only() {
        let today = candle(15, 500, 520, 495, 515);
        let merged = reconcile(&[], &today);
        assert_eq!(merged, vec![today]);
    }

    #[test]
    fn test_previous_close_picks_last_settled_day() {
        let daily = vec![candle(12, 470, 476, 469, 474), candle(14, 475, 482, 473, 480)];
        let today_start = day_bucket(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(previous_close(&daily, today_start), Some(Decimal::from(480)));
    }

    #[test]
    fn test_previous_close_ignores_today_and_later() {
        let daily = vec![candle(14, 475, 482, 473, 480), candle(15, 500, 518, 496, 512)];
        let today_start = day_bucket(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(previous_close(&daily, today_start), Some(Decimal::from(480)));
        assert_eq!(previous_close(&[], today_start), None);
    }
}
