//! Reference price resolution for change/changePercent.
//!
//! Baseline order, each tried only if the prior produced no usable value:
//!
//! 1. Previous-session close from the reconciled daily series — the accurate
//!    baseline once history is available.
//! 2. The session's own open — before yesterday's close is known.
//! 3. The feed's own change/changePercent fields — last resort only, since
//!    they are observed unreliable or absent.
//!
//! Total function: the worst case is a flat `(0, 0)`, never an error.

use super::UpstreamChange;
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Resolves `(change, change_percent)` for `price` against the best available
/// baseline. A zero baseline is treated as unusable rather than divided by.
pub fn resolve_change(
    price: Decimal,
    previous_close: Option<Decimal>,
    session_open: Option<Decimal>,
    upstream: Option<UpstreamChange>,
) -> (Decimal, Decimal) {
    let baseline = previous_close
        .filter(|b| !b.is_zero())
        .or_else(|| session_open.filter(|b| !b.is_zero()));

    match baseline {
        Some(baseline) => {
            let change = price - baseline;
            (change, change / baseline * HUNDRED)
        }
        None => match upstream {
            Some(u) => (u.change, u.change_percent),
            None => (Decimal::ZERO, Decimal::ZERO),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_previous_close_takes_precedence() {
        // Upstream figures disagree on purpose; the local baseline wins.
        let upstream = UpstreamChange {
            change: dec("99.9"),
            change_percent: dec("42.0"),
        };
        let (change, pct) = resolve_change(
            dec("510"),
            Some(dec("500")),
            Some(dec("480")),
            Some(upstream),
        );
        assert_eq!(change, dec("10"));
        assert_eq!(pct, dec("2.0"));
    }

    #[test]
    fn test_session_open_fallback() {
        let (change, pct) = resolve_change(dec("490"), None, Some(dec("480")), None);
        assert_eq!(change, dec("10"));
        assert_eq!(pct, dec("10") / dec("480") * dec("100"));
    }

    #[test]
    fn test_zero_baseline_no_division() {
        let (change, pct) = resolve_change(dec("490"), Some(Decimal::ZERO), Some(Decimal::ZERO), None);
        assert_eq!(change, Decimal::ZERO);
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn test_upstream_used_last() {
        let upstream = UpstreamChange {
            change: dec("1.5"),
            change_percent: dec("0.3"),
        };
        let (change, pct) = resolve_change(dec("490"), None, None, Some(upstream));
        assert_eq!(change, dec("1.5"));
        assert_eq!(pct, dec("0.3"));
    }

    #[test]
    fn test_nothing_available_is_flat() {
        let (change, pct) = resolve_change(dec("490"), None, None, None);
        assert_eq!(change, Decimal::ZERO);
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn test_negative_change() {
        let (change, pct) = resolve_change(dec("495"), Some(dec("500")), None, None);
        assert_eq!(change, dec("-5"));
        assert_eq!(pct, dec("-1.0"));
    }
}
