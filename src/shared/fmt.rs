//! Formatting utilities for human-readable price display.

use crate::shared::Instrument;
use rust_decimal::Decimal;

/// Formats a price with its quotation unit, e.g. `¥552.31 CNY/g`.
pub fn format_price(price: Decimal, instrument: Instrument) -> String {
    format!("¥{} {}", price.round_dp(2), instrument.unit())
}

/// Formats a change/changePercent pair with an explicit sign,
/// e.g. `▲ +1.20 (+0.22%)` or `▼ -3.45 (-0.61%)`.
pub fn format_change(change: Decimal, change_percent: Decimal) -> String {
    let arrow = if change.is_sign_negative() && !change.is_zero() {
        "▼"
    } else {
        "▲"
    };
    format!(
        "{} {}{} ({}{}%)",
        arrow,
        sign_prefix(change),
        change.round_dp(2),
        sign_prefix(change_percent),
        change_percent.round_dp(2),
    )
}

fn sign_prefix(value: Decimal) -> &'static str {
    // Negative values carry their own minus sign when formatted.
    if value.is_sign_negative() && !value.is_zero() {
        ""
    } else {
        "+"
    }
}
