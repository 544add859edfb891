// Copyright 2025 Chatlens Contributors (https://github.com/chatlens/chatlens)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Caller-owned cache of dashboard snapshots
//!
//! Entries are keyed by the blake3 hash of the serialized event slice plus
//! the hash of the analytics config, so identical input always maps to the
//! same entry and any change to either side misses. Entries expire after a
//! wall-clock TTL.

use chatlens_core::{AnalyticsConfig, ChatEvent, Result};
use chatlens_query::DashboardSnapshot;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default TTL for cached snapshots (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Default maximum number of cached snapshots
pub const DEFAULT_MAX_CAPACITY: u64 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

/// Content identity of an (events, config) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    events: blake3::Hash,
    config: blake3::Hash,
}

impl SnapshotKey {
    pub fn new(events: &[ChatEvent], config: &AnalyticsConfig) -> Result<Self> {
        Ok(Self {
            events: content_hash(events)?,
            config: content_hash(config)?,
        })
    }

    pub fn events_hex(&self) -> String {
        self.events.to_hex().to_string()
    }
}

fn content_hash<T: Serialize + ?Sized>(value: &T) -> Result<blake3::Hash> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, value)?;
    Ok(hasher.finalize())
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entry_count: u64,
}

/// Snapshot cache for long-running callers such as a dashboard server that
/// recomputes on every refresh. One-shot processes should call
/// `DashboardSnapshot::compute` directly since a fresh cache never hits.
pub struct SnapshotCache {
    cache: Cache<SnapshotKey, Arc<DashboardSnapshot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl SnapshotCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &SnapshotKey) -> Option<Arc<DashboardSnapshot>> {
        match self.cache.get(key) {
            Some(snapshot) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(snapshot)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: SnapshotKey, snapshot: Arc<DashboardSnapshot>) {
        self.cache.insert(key, snapshot);
    }

    /// Cached snapshot for the pair, computing and storing it on a miss
    pub fn get_or_compute(
        &self,
        events: &[ChatEvent],
        config: &AnalyticsConfig,
    ) -> Result<Arc<DashboardSnapshot>> {
        let key = SnapshotKey::new(events, config)?;
        if let Some(snapshot) = self.get(&key) {
            debug!(key = %key.events_hex(), "snapshot cache hit");
            return Ok(snapshot);
        }

        let snapshot = Arc::new(DashboardSnapshot::compute(events, config)?);
        self.insert(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            entry_count: self.cache.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<ChatEvent> {
        vec![
            ChatEvent::new("c1", "u1").message("refund request").topic("billing questions"),
            ChatEvent::new("c2", "u2").message("login fails").topic("account issues"),
        ]
    }

    #[test]
    fn test_key_is_content_identity() {
        let config = AnalyticsConfig::default();
        let a = SnapshotKey::new(&events(), &config).unwrap();
        let b = SnapshotKey::new(&events(), &config).unwrap();
        assert_eq!(a, b);

        let mut changed = events();
        changed[1].actor_id = "u3".into();
        assert_ne!(a, SnapshotKey::new(&changed, &config).unwrap());

        let mut other_config = AnalyticsConfig::default();
        other_config.pivot.utc_offset_minutes = 60;
        assert_ne!(a, SnapshotKey::new(&events(), &other_config).unwrap());
    }

    #[test]
    fn test_hit_and_miss_counting() {
        let cache = SnapshotCache::default();
        let config = AnalyticsConfig::default();

        let first = cache.get_or_compute(&events(), &config).unwrap();
        let second = cache.get_or_compute(&events(), &config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = SnapshotCache::new(&CacheConfig {
            ttl_secs: 1,
            max_capacity: 8,
        });
        let config = AnalyticsConfig::default();
        let key = SnapshotKey::new(&events(), &config).unwrap();

        cache.get_or_compute(&events(), &config).unwrap();
        assert!(cache.get(&key).is_some());

        std::thread::sleep(Duration::from_millis(1_200));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = SnapshotCache::default();
        let config = AnalyticsConfig::default();
        cache.get_or_compute(&events(), &config).unwrap();
        cache.invalidate_all();
        let key = SnapshotKey::new(&events(), &config).unwrap();
        assert!(cache.get(&key).is_none());
    }
}
