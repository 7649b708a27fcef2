//! Push scheduling — decides when opening/closing notifications fire and
//! drives the periodic evaluation loop.

use crate::client::MetalsClient;
use crate::notify::{closing_message, opening_message, Notifier};
use crate::shared::Instrument;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Weekday};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info, warn};

/// Which scheduled push a firing decision refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyKind {
    Opening,
    Closing,
}

/// Push times in the trading-calendar zone, plus the instruments covered.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub opening: NaiveTime,
    pub closing: NaiveTime,
    pub instruments: Vec<Instrument>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            opening: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
            closing: NaiveTime::from_hms_opt(16, 0, 0).expect("16:00 is a valid time"),
            instruments: vec![Instrument::Gold],
        }
    }
}

/// Trading-day test: weekdays only.
///
/// Exchange holidays are not modeled; a holiday push reports the last known
/// price, which is harmless.
pub fn is_trading_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True when `now_local` falls inside the kind's scheduled minute on a
/// trading day.
pub fn should_fire(kind: NotifyKind, config: &SchedulerConfig, now_local: DateTime<FixedOffset>) -> bool {
    if !is_trading_day(now_local.date_naive()) {
        return false;
    }
    let at = match kind {
        NotifyKind::Opening => config.opening,
        NotifyKind::Closing => config.closing,
    };
    now_local.hour() == at.hour() && now_local.minute() == at.minute()
}

/// Periodic push evaluator.
///
/// Evaluated once a minute or more often; the per-day guard makes extra
/// evaluations within the scheduled minute no-ops.
pub struct Scheduler<N: Notifier> {
    client: MetalsClient,
    notifier: N,
    config: SchedulerConfig,
    /// Last calendar day each kind fired, keyed per kind. A kind is marked
    /// fired when the attempt starts, so a failed send is not retried inside
    /// the same window.
    last_fired: HashMap<NotifyKind, NaiveDate>,
}

impl<N: Notifier> Scheduler<N> {
    pub fn new(client: MetalsClient, notifier: N, config: SchedulerConfig) -> Self {
        Self {
            client,
            notifier,
            config,
            last_fired: HashMap::new(),
        }
    }

    /// The kinds due at `now_local`, each marked fired for the day.
    pub fn due(&mut self, now_local: DateTime<FixedOffset>) -> Vec<NotifyKind> {
        let today = now_local.date_naive();
        let mut due = Vec::new();
        for kind in [NotifyKind::Opening, NotifyKind::Closing] {
            if should_fire(kind, &self.config, now_local)
                && self.last_fired.get(&kind) != Some(&today)
            {
                self.last_fired.insert(kind, today);
                due.push(kind);
            }
        }
        due
    }

    /// One evaluation pass: fire any due pushes.
    pub async fn tick(&mut self) {
        let now_local = self
            .client
            .clock
            .now_utc()
            .with_timezone(&self.client.tz_offset);

        for kind in self.due(now_local) {
            for instrument in self.config.instruments.clone() {
                self.push(kind, instrument).await;
            }
        }
    }

    async fn push(&self, kind: NotifyKind, instrument: Instrument) {
        let live = match self.client.refresh(instrument).await {
            Ok(live) => live,
            Err(e) => {
                warn!(?kind, %instrument, error = %e, "Skipping push; refresh failed");
                return;
            }
        };

        let message = match kind {
            NotifyKind::Opening => opening_message(&live),
            NotifyKind::Closing => closing_message(&live),
        };

        if self.notifier.send(&message).await {
            info!(?kind, %instrument, "Push delivered");
        } else {
            error!(?kind, %instrument, "Push delivery failed");
        }
    }

    /// Runs the evaluation loop forever, once a minute.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}
