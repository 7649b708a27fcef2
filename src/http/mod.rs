//! HTTP client layer — `MetalsHttp`, one method per gateway endpoint.

pub mod client;

pub use client::MetalsHttp;
