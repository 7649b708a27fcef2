//! # SGE Metals
//!
//! A Rust client for Shanghai Gold Exchange spot quotations served through an
//! AKTools-style HTTP gateway, with a derived price/candle pipeline.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Shared newtypes, domain models, pure candle math
//! 2. **HTTP API** — `MetalsHttp` with one method per upstream endpoint
//! 3. **High-Level Client** — `MetalsClient` with caching and the refresh pipeline
//! 4. **Scheduler** — opening/closing push decisions + webhook notification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sge_metals::prelude::*;
//!
//! let client = MetalsClient::builder()
//!     .base_url("http://127.0.0.1:8080/api/public")
//!     .build()?;
//!
//! let live = client.refresh(Instrument::Gold).await?;
//! let series = client.daily_series(Instrument::Gold, 30).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, math.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants.
pub mod network;

/// Injectable time source.
pub mod clock;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client for the quotation gateway.
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// TTL-bound series cache with single-flight fetch deduplication.
pub mod cache;

/// `MetalsClient` — the primary entry point.
pub mod client;

// ── Layer 4: Scheduler / Notifications ───────────────────────────────────────

/// Outbound notification messages and the webhook sender.
pub mod notify;

/// Opening/closing push-decision logic and the periodic evaluation loop.
pub mod scheduler;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::Instrument;

    // Domain types — quotes
    pub use crate::domain::quote::{QuoteSnapshot, Tick};

    // Domain types — candles
    pub use crate::domain::candle::{day_bucket, minute_bucket, Candle};

    // Domain types — live price
    pub use crate::domain::live::{LivePrice, UpstreamChange};

    // Errors
    pub use crate::error::{FetchError, MetalsError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // Clock
    pub use crate::clock::{Clock, FixedClock, SystemClock};

    // High-level client
    pub use crate::client::{MetalsClient, MetalsClientBuilder, QuotesClient};

    // Scheduler + notifications
    pub use crate::notify::{MessageKind, Notifier, NotifyMessage, WebhookNotifier};
    pub use crate::scheduler::{NotifyKind, Scheduler, SchedulerConfig};
}
