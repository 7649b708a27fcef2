//! Shared newtypes and utilities used across all domain modules.

pub mod fmt;
pub mod serde_util;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─── Instrument ──────────────────────────────────────────────────────────────

/// A precious-metal instrument quoted on the Shanghai Gold Exchange.
///
/// Each instrument maps to exactly one upstream symbol string; the mapping is
/// static configuration, not pipeline logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Gold,
    Silver,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::Gold, Instrument::Silver];

    /// Upstream quotation symbol for this instrument.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gold => "Au99.99",
            Self::Silver => "Ag99.99",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
        }
    }

    /// Quotation unit as delivered by the upstream feed.
    ///
    /// Gold trades in CNY per gram, silver in CNY per kilogram. The pipeline
    /// is unit-agnostic and carries the upstream unit through unchanged.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Gold => "CNY/g",
            Self::Silver => "CNY/kg",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gold" | "au99.99" => Ok(Self::Gold),
            "silver" | "ag99.99" => Ok(Self::Silver),
            other => Err(format!("Unknown instrument: {}", other)),
        }
    }
}
