//! Custom serde helpers for upstream wire formats.

/// Deserializes an optional price field that may arrive as a JSON number,
/// a numeric string, an empty string, or be missing entirely.
///
/// The gateway re-exports exchange tables verbatim and is not consistent
/// about numeric typing across endpoints, so every price field in the wire
/// structs goes through this helper.
pub mod decimal_flexible {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<NumOrStr>::deserialize(deserializer)?;
        Ok(match raw {
            None => None,
            Some(NumOrStr::Num(n)) => Decimal::try_from(n).ok(),
            Some(NumOrStr::Str(s)) => {
                let trimmed = s.trim().trim_end_matches('%');
                if trimmed.is_empty() {
                    None
                } else {
                    Decimal::from_str(trimmed).ok()
                }
            }
        })
    }
}
