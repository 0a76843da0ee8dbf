// Bucket cache for nearby-hotel searches. Queries are keyed by their centre
// rounded to 4 decimal places plus the radius; entries expire after a fixed TTL
// and are overwritten rather than deleted.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::hotel::HotelRecord;

const BUCKET_COORDINATE_SCALE: f64 = 10_000.0;

#[derive(Debug, Default)]
pub struct CacheStats {
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub expired_count: AtomicUsize,
    pub store_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub expired_count: usize,
    pub store_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub latitude: i64,
    pub longitude: i64,
    pub radius: u32,
}

impl BucketKey {
    pub fn new(latitude: f64, longitude: f64, radius: u32) -> Self {
        Self {
            latitude: (latitude * BUCKET_COORDINATE_SCALE).round() as i64,
            longitude: (longitude * BUCKET_COORDINATE_SCALE).round() as i64,
            radius,
        }
    }
}

struct CacheEntry {
    hotels: Vec<HotelRecord>,
    stored_at: DateTime<Utc>,
}

// TTLs chrono cannot represent fall back to the default
fn ttl_from_config(config: &CacheConfig) -> chrono::Duration {
    let default_ttl = CacheConfig::default().ttl_seconds;
    i64::try_from(config.ttl_seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or_else(|| {
            warn!(
                "Cache TTL of {}s is out of range, using default: {}s",
                config.ttl_seconds, default_ttl
            );
            chrono::Duration::seconds(default_ttl as i64)
        })
}

pub struct HotelCache {
    entries: DashMap<BucketKey, CacheEntry>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl HotelCache {
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: ttl_from_config(config),
            clock,
            stats: CacheStats::default(),
        }
    }

    pub fn with_system_clock(config: &CacheConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.ttl
    }

    // Cached hotels for the bucket, if present and younger than the TTL
    pub fn get(&self, key: &BucketKey) -> Option<Vec<HotelRecord>> {
        let now = self.clock.now();

        match self.entries.get(key) {
            Some(entry) if self.is_fresh(&entry, now) => {
                self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                debug!(?key, "Bucket cache hit");
                Some(entry.hotels.clone())
            }
            Some(_) => {
                self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
                self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                debug!(?key, "Bucket cache entry expired");
                None
            }
            None => {
                self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                debug!(?key, "Bucket cache miss");
                None
            }
        }
    }

    pub fn store(&self, key: BucketKey, hotels: Vec<HotelRecord>) {
        let entry = CacheEntry {
            hotels,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key, entry);
        self.stats.store_count.fetch_add(1, Ordering::SeqCst);
    }

    // Drop entries past their TTL, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at < self.ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.entries.len(),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
            store_count: self.stats.store_count.load(Ordering::SeqCst),
        }
    }
}
