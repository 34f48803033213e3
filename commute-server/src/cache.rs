//! Short-lived response caching for network-bound handlers.
//!
//! Each cache holds a single entry, replaced wholesale on a successful
//! refresh. Entries are kept past their TTL so a failed refresh can fall
//! back to the last known good payload.

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// A cached payload and the instant it was captured.
#[derive(Debug, Clone)]
struct Entry<T> {
    payload: T,
    captured_at: Instant,
}

/// Single-entry cache with a freshness TTL and stale fallback.
///
/// Concurrent refreshes of an expired entry are not mutually excluded:
/// both requests fetch and the later store wins.
#[derive(Debug)]
pub struct ResponseCache<T> {
    entry: RwLock<Option<Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> ResponseCache<T> {
    /// Create an empty cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// The cached payload, if younger than the TTL.
    pub async fn fresh(&self) -> Option<T> {
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|e| e.captured_at.elapsed() < self.ttl)
            .map(|e| e.payload.clone())
    }

    /// The cached payload regardless of age.
    pub async fn last(&self) -> Option<T> {
        let guard = self.entry.read().await;
        guard.as_ref().map(|e| e.payload.clone())
    }

    /// Replace the entry with a freshly captured payload.
    pub async fn store(&self, payload: T) {
        let mut guard = self.entry.write().await;
        *guard = Some(Entry {
            payload,
            captured_at: Instant::now(),
        });
    }
}
