//! Rendered response caching.
//!
//! GET representations are cached per media variant and request path, under
//! keys like `json-view/<path>` and `mason-view/<path>`. Writes invalidate
//! the collection and every path below the map they touched.
//!
//! Every invalidation bumps a generation counter. A body rendered before an
//! invalidation is never left behind by it: `put` re-checks the generation
//! the caller read before rendering and drops the entry if it moved.

use axum::body::Bytes;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::api::negotiate::MediaType;
use crate::api::urls;
use crate::observability::metrics;

/// A thread-safe cache of encoded response bodies.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    inner: Arc<DashMap<String, Bytes>>,
    generation: Arc<AtomicU64>,
    enabled: bool,
}

fn key(media: MediaType, path: &str) -> String {
    format!("{}/{}", media.cache_prefix(), path)
}

impl ResponseCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            generation: Arc::new(AtomicU64::new(0)),
            enabled,
        }
    }

    pub fn get(&self, media: MediaType, path: &str) -> Option<Bytes> {
        if !self.enabled {
            return None;
        }
        let hit = self.inner.get(&key(media, path)).map(|r| r.value().clone());
        metrics::record_cache_event(if hit.is_some() { "hit" } else { "miss" });
        hit
    }

    /// Read before rendering a body, and hand to `put` with it.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a body rendered at `generation`. Returns whether it was kept.
    pub fn put(&self, media: MediaType, path: &str, body: Bytes, generation: u64) -> bool {
        if !self.enabled {
            return false;
        }
        let key = key(media, path);
        self.inner.insert(key.clone(), body);
        if self.generation() != generation {
            self.inner.remove(&key);
            return false;
        }
        true
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Drop the collection and everything under one map's path.
    pub fn invalidate_map(&self, map_slug: &str) {
        let collection = urls::map_collection();
        let map_prefix = urls::map_item(map_slug);
        self.bump();
        self.inner.retain(|key, _| {
            let path = key.split_once('/').map(|(_, path)| path).unwrap_or(key);
            path != collection && !path.starts_with(&map_prefix)
        });
        metrics::record_cache_event("invalidate");
        tracing::trace!(map = %map_slug, remaining = self.inner.len(), "Cache invalidated");
    }

    /// Drop the collection only.
    pub fn invalidate_collection(&self) {
        let collection = urls::map_collection();
        self.bump();
        for media in [MediaType::Json, MediaType::Mason] {
            self.inner.remove(&key(media, &collection));
        }
        metrics::record_cache_event("invalidate");
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
