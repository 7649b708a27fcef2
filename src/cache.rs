//! TTL-bound daily series cache with single-flight fetch deduplication.
//!
//! The cache exclusively owns its entries; consumers get clones and updates
//! replace the keyed entry wholesale. Time is passed in explicitly so TTL
//! behavior is deterministic under test.

use crate::domain::candle::Candle;
use crate::shared::Instrument;
use async_lock::{Mutex, RwLock};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// A cached payload with its write timestamp.
#[derive(Debug, Clone)]
struct CacheEntry {
    series: Vec<Candle>,
    written_at: DateTime<Utc>,
}

/// Per-instrument store of settled daily series.
pub struct SeriesCache {
    ttl: chrono::Duration,
    entries: RwLock<HashMap<Instrument, CacheEntry>>,
    /// Per-key fetch guards. A refresher holds the key's mutex across its
    /// fetch; concurrent refreshers await it and then re-check the cache, so
    /// overlapping refresh paths issue at most one upstream call per key.
    inflight: RwLock<HashMap<Instrument, Arc<Mutex<()>>>>,
}

impl SeriesCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            entries: RwLock::new(HashMap::new()),
            inflight: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached series, or `None` when absent or older than the TTL.
    pub async fn get(&self, key: Instrument, now: DateTime<Utc>) -> Option<Vec<Candle>> {
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if now - entry.written_at >= self.ttl {
            return None;
        }
        Some(entry.series.clone())
    }

    /// Returns the cached series regardless of age — the degraded path when
    /// a refresh fails and stale data beats no data.
    pub async fn get_stale(&self, key: Instrument) -> Option<Vec<Candle>> {
        self.entries
            .read()
            .await
            .get(&key)
            .map(|e| e.series.clone())
    }

    /// Replaces any existing entry for the key, stamping `now`.
    pub async fn put(&self, key: Instrument, series: Vec<Candle>, now: DateTime<Utc>) {
        self.entries
            .write()
            .await
            .insert(key, CacheEntry { series, written_at: now });
    }

    /// The single-flight guard for a key. Callers lock it for the duration of
    /// a fetch and re-check the cache after acquiring it.
    pub async fn fetch_guard(&self, key: Instrument) -> Arc<Mutex<()>> {
        if let Some(guard) = self.inflight.read().await.get(&key) {
            return guard.clone();
        }
        self.inflight
            .write()
            .await
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn series(close: i64) -> Vec<Candle> {
        vec![Candle {
            period_start: 1_705_276_800,
            open: Decimal::from(close),
            high: Decimal::from(close),
            low: Decimal::from(close),
            close: Decimal::from(close),
            volume: 0,
        }]
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 16, hour, 0, 0).unwrap()
    }

    const DAY_TTL: Duration = Duration::from_secs(24 * 3600);

    #[tokio::test]
    async fn test_absent_key() {
        let cache = SeriesCache::new(DAY_TTL);
        assert!(cache.get(Instrument::Gold, at(12)).await.is_none());
    }

    #[tokio::test]
    async fn test_fresh_entry_returned() {
        let cache = SeriesCache::new(DAY_TTL);
        let written = at(0);
        cache.put(Instrument::Gold, series(480), written).await;

        // 23 hours later: still fresh.
        let now = written + chrono::Duration::hours(23);
        assert_eq!(cache.get(Instrument::Gold, now).await, Some(series(480)));
    }

    #[tokio::test]
    async fn test_expired_entry_absent() {
        let cache = SeriesCache::new(DAY_TTL);
        let written = at(0);
        cache.put(Instrument::Gold, series(480), written).await;

        // 25 hours later: treated as absent.
        let now = written + chrono::Duration::hours(25);
        assert!(cache.get(Instrument::Gold, now).await.is_none());
        // But the stale payload is still reachable for the degraded path.
        assert_eq!(cache.get_stale(Instrument::Gold).await, Some(series(480)));
    }

    #[tokio::test]
    async fn test_put_replaces_wholesale() {
        let cache = SeriesCache::new(DAY_TTL);
        cache.put(Instrument::Gold, series(480), at(0)).await;
        cache.put(Instrument::Gold, series(500), at(1)).await;
        assert_eq!(cache.get(Instrument::Gold, at(2)).await, Some(series(500)));
    }

    #[tokio::test]
    async fn test_keys_independent() {
        let cache = SeriesCache::new(DAY_TTL);
        cache.put(Instrument::Gold, series(480), at(0)).await;
        assert!(cache.get(Instrument::Silver, at(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_guard_shared_per_key() {
        let cache = SeriesCache::new(DAY_TTL);
        let a = cache.fetch_guard(Instrument::Gold).await;
        let b = cache.fetch_guard(Instrument::Gold).await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = cache.fetch_guard(Instrument::Silver).await;
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn test_fetch_guard_serializes_holders() {
        let cache = SeriesCache::new(DAY_TTL);
        let guard = cache.fetch_guard(Instrument::Gold).await;
        let held = guard.lock().await;
        assert!(guard.try_lock().is_none());
        drop(held);
        assert!(guard.try_lock().is_some());
    }
}
