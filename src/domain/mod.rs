//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching gateway responses
//! - `convert.rs` — Conversions from wire to domain with validation
//! - `client.rs` — Sub-client with HTTP methods
//!
//! The candle and live slices are pure math and carry no wire/client files.

pub mod candle;
pub mod live;
pub mod quote;
