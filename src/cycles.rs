//! Cycle detection along parent edges.
//!
//! Depth-first search with an explicit stack, a recursion path and an
//! on-path set. Reaching a parent that is already on the path closes a
//! cycle; a global visited set keeps each call O(V + E).
//!
//! Single-node results are memoized in an LRU cache that the owning graph
//! clears on every mutation.

use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::RwLock;

use crate::config::CycleCacheConfig;
use crate::store::NodeStore;
use crate::types::{CycleInfo, DocumentId};

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries in the cache.
    pub len: usize,
    /// Maximum capacity of the cache.
    pub cap: usize,
}

/// One DFS stack frame: the node's parents and the next one to explore.
struct Frame<'a> {
    parents: &'a [DocumentId],
    next: usize,
}

/// Walk parent edges from `start`, appending every cycle closed on the way.
fn walk<'a>(
    store: &'a NodeStore,
    start: &'a DocumentId,
    visited: &mut HashSet<&'a DocumentId>,
    cycles: &mut Vec<CycleInfo>,
    first_only: bool,
) {
    let mut path: Vec<&'a DocumentId> = vec![start];
    let mut on_path: HashSet<&'a DocumentId> = HashSet::new();
    on_path.insert(start);
    visited.insert(start);

    let mut stack = vec![Frame {
        parents: store.parents(start),
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let parents = frame.parents;
        match parents.get(frame.next) {
            Some(parent) => {
                frame.next += 1;
                if on_path.contains(parent) {
                    if let Some(pos) = path.iter().position(|node| *node == parent) {
                        let nodes = path[pos..].iter().map(|node| (*node).clone()).collect();
                        cycles.push(CycleInfo::new(nodes));
                        if first_only {
                            return;
                        }
                    }
                } else if visited.insert(parent) {
                    path.push(parent);
                    on_path.insert(parent);
                    stack.push(Frame {
                        parents: store.parents(parent),
                        next: 0,
                    });
                }
            }
            None => {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done);
                }
            }
        }
    }
}

/// Cycle detector with optional memoization of single-node results.
pub struct CycleDetector {
    cache: Option<RwLock<LruCache<DocumentId, Option<CycleInfo>>>>,
}

impl fmt::Debug for CycleDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleDetector")
            .field("cache", &self.cache_stats())
            .finish()
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new(&CycleCacheConfig::default())
    }
}

impl CycleDetector {
    /// Create a detector with the given cache settings.
    pub fn new(config: &CycleCacheConfig) -> Self {
        let cache = match NonZeroUsize::new(config.max_entries) {
            Some(size) if config.enabled => Some(RwLock::new(LruCache::new(size))),
            _ => None,
        };
        Self { cache }
    }

    /// Whether cycle detection is available. Always true for the standard graph.
    pub fn supports_cycle_detection(&self) -> bool {
        true
    }

    /// Find a cycle reachable from `start` by following parent edges.
    ///
    /// `A→B→C→B` from `A` yields `[B, C]`; a self-loop yields `[A]`.
    /// Absent nodes have no cycle.
    pub fn detect_cycle(&self, store: &NodeStore, start: &DocumentId) -> Option<CycleInfo> {
        let node = store.get(start)?;

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.read().peek(start) {
                return cached.clone();
            }
        }

        let mut visited = HashSet::new();
        let mut cycles = Vec::new();
        walk(store, &node.id, &mut visited, &mut cycles, true);
        let found = cycles.into_iter().next();

        if let Some(cycle) = &found {
            tracing::debug!(start = %start, cycle = %cycle, "cycle detected");
        }
        if let Some(cache) = &self.cache {
            cache.write().put(start.clone(), found.clone());
        }
        found
    }

    /// Every distinct cycle in the graph.
    ///
    /// DFS restarts from each node not yet explored; cycles equal up to
    /// rotation are reported once.
    pub fn all_cycles(&self, store: &NodeStore) -> Vec<CycleInfo> {
        let mut visited: HashSet<&DocumentId> = HashSet::new();
        let mut found = Vec::new();
        for node in store.nodes() {
            if !visited.contains(&node.id) {
                walk(store, &node.id, &mut visited, &mut found, false);
            }
        }

        let mut seen: HashSet<Vec<DocumentId>> = HashSet::new();
        found.retain(|cycle| seen.insert(cycle.canonical_key()));
        found
    }

    /// Drop all memoized results.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.write().clear();
        }
    }

    /// Get cache statistics.
    ///
    /// Returns `None` if caching is disabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| {
            let cache = cache.read();
            CacheStats {
                len: cache.len(),
                cap: cache.cap().get(),
            }
        })
    }
}
