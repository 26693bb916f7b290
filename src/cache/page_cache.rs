//! In-memory cache of rendered page documents.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// A cached page document with its storage instant.
#[derive(Debug, Clone)]
struct CachedPage {
    body: Value,
    stored_at: Instant,
}

/// Thread-safe cache of page documents keyed by logical path.
///
/// Freshness is double-gated: entries expire after the configured TTL,
/// and the revalidation endpoint can drop them early. Callers cannot
/// distinguish stale from missing; both read as a miss.
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<DashMap<String, CachedPage>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up a fresh document. Expired entries are dropped on read.
    pub fn get(&self, path: &str) -> Option<Value> {
        let fresh = match self.inner.get(path) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => None,
            None => {
                metrics::record_cache_lookup("miss");
                return None;
            }
        };
        match fresh {
            Some(body) => {
                metrics::record_cache_lookup("hit");
                Some(body)
            }
            None => {
                self.inner.remove(path);
                metrics::record_cache_lookup("expired");
                None
            }
        }
    }

    /// Store a document under a logical path.
    pub fn put(&self, path: &str, body: Value) {
        self.inner.insert(
            path.to_string(),
            CachedPage {
                body,
                stored_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Drop the entry for an exact path. Returns how many entries were
    /// removed (0 or 1); absent entries are a no-op.
    pub fn remove(&self, path: &str) -> usize {
        let removed = usize::from(self.inner.remove(path).is_some());
        metrics::record_cache_size(self.inner.len());
        removed
    }

    /// Drop every entry whose path matches a `:param` segment template,
    /// e.g. `/portfolio/:id` removes `/portfolio/17` and `/portfolio/42`.
    pub fn remove_matching(&self, template: &str) -> usize {
        let before = self.inner.len();
        self.inner.retain(|path, _| !template_matches(template, path));
        let removed = before - self.inner.len();
        metrics::record_cache_size(self.inner.len());
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Segment-wise template match. A `:`-prefixed segment matches any single
/// non-empty segment; everything else must match exactly.
fn template_matches(template: &str, path: &str) -> bool {
    let t: Vec<&str> = template.trim_matches('/').split('/').collect();
    let p: Vec<&str> = path.trim_matches('/').split('/').collect();
    if t.len() != p.len() {
        return false;
    }
    t.iter()
        .zip(&p)
        .all(|(ts, ps)| (ts.starts_with(':') && !ps.is_empty()) || ts == ps)
}
