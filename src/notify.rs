//! Outbound notifications — message building and the DingTalk webhook sender.

use crate::domain::live::LivePrice;
use crate::error::MetalsError;
use crate::shared::fmt::{format_change, format_price};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Required webhook host. Tokens for other hosts are rejected up front.
const WEBHOOK_HOST: &str = "oapi.dingtalk.com";
const WEBHOOK_PATH: &str = "/robot/send";

/// Rendering style of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Markdown,
}

/// A notification ready to send, independent of any delivery channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyMessage {
    pub title: String,
    pub body: String,
    pub kind: MessageKind,
}

/// A delivery channel for notifications.
///
/// `send` reports delivery as a bool rather than an error: a failed push is
/// logged and dropped, never retried, and must not disturb the price pipeline.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &NotifyMessage) -> bool;
}

// ── Message builders ─────────────────────────────────────────────────────────

/// The market-opening push body for one instrument.
pub fn opening_message(live: &LivePrice) -> NotifyMessage {
    NotifyMessage {
        title: format!("{} opening price", live.instrument.display_name()),
        body: format!(
            "{} opened at {}\n{}",
            live.instrument.display_name(),
            format_price(live.open, live.instrument),
            format_change(live.change, live.change_percent),
        ),
        kind: MessageKind::Markdown,
    }
}

/// The market-closing push body: last price, change, and the day's amplitude.
pub fn closing_message(live: &LivePrice) -> NotifyMessage {
    let amplitude = if live.open.is_zero() {
        Decimal::ZERO
    } else {
        (live.high - live.low) / live.open * Decimal::ONE_HUNDRED
    };
    NotifyMessage {
        title: format!("{} closing summary", live.instrument.display_name()),
        body: format!(
            "{} closed at {}\n{}\nHigh {} / Low {} (amplitude {}%)",
            live.instrument.display_name(),
            format_price(live.price, live.instrument),
            format_change(live.change, live.change_percent),
            live.high.round_dp(2),
            live.low.round_dp(2),
            amplitude.round_dp(2),
        ),
        kind: MessageKind::Markdown,
    }
}

// ── Webhook sender ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WebhookAck {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// DingTalk robot webhook notifier.
pub struct WebhookNotifier {
    url: reqwest::Url,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Validates the webhook URL shape before any send is attempted.
    pub fn new(webhook_url: &str) -> Result<Self, MetalsError> {
        let url = reqwest::Url::parse(webhook_url)
            .map_err(|e| MetalsError::Config(format!("invalid webhook url: {}", e)))?;

        if url.host_str() != Some(WEBHOOK_HOST) {
            return Err(MetalsError::Config(format!(
                "webhook host must be {}",
                WEBHOOK_HOST
            )));
        }
        if url.path() != WEBHOOK_PATH {
            return Err(MetalsError::Config(format!(
                "webhook path must be {}",
                WEBHOOK_PATH
            )));
        }
        let has_token = url
            .query_pairs()
            .any(|(k, v)| k == "access_token" && !v.is_empty());
        if !has_token {
            return Err(MetalsError::Config(
                "webhook url is missing an access_token".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self { url, client })
    }

    fn payload(message: &NotifyMessage) -> serde_json::Value {
        match message.kind {
            MessageKind::Text => json!({
                "msgtype": "text",
                "text": { "content": format!("{}\n{}", message.title, message.body) },
            }),
            MessageKind::Markdown => json!({
                "msgtype": "markdown",
                "markdown": { "title": message.title, "text": message.body },
            }),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &NotifyMessage) -> bool {
        let response = match self
            .client
            .post(self.url.clone())
            .json(&Self::payload(message))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Webhook request failed");
                return false;
            }
        };

        let ack: WebhookAck = match response.json().await {
            Ok(ack) => ack,
            Err(e) => {
                warn!(error = %e, "Webhook response unreadable");
                return false;
            }
        };

        // The robot API returns HTTP 200 even on rejection; only errcode 0
        // means delivered.
        if ack.errcode == 0 {
            debug!(title = %message.title, "Webhook delivered");
            true
        } else {
            warn!(errcode = ack.errcode, errmsg = %ack.errmsg, "Webhook rejected");
            false
        }
    }
}
