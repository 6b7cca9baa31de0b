// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The memoization cache of the traversal.

use std::collections::HashMap;

use petgraph::graph::EdgeIndex;

use super::TraversalKey;

/// The state of a link in the cache, for a single traversal key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CacheEntry {
    /// The traversal is currently computing the value behind the link.
    /// Meeting this entry again means the traversal went around a cycle.
    InProgress,
    /// The value behind the link has been computed.
    Value(f64),
}

/// Values computed behind each link, per traversal key.
///
/// A cache belongs to a single calculation, and has to be cleared whenever
/// the graph it was computed on changes.
#[derive(Debug, Default)]
pub(crate) struct TraversalCache {
    entries: HashMap<TraversalKey, HashMap<EdgeIndex, CacheEntry>>,
}

impl TraversalCache {
    pub(crate) fn get(&self, key: &TraversalKey, link: EdgeIndex) -> Option<CacheEntry> {
        self.entries
            .get(key)
            .and_then(|links| links.get(&link))
            .copied()
    }

    pub(crate) fn insert(&mut self, key: &TraversalKey, link: EdgeIndex, entry: CacheEntry) {
        match self.entries.get_mut(key) {
            Some(links) => {
                links.insert(link, entry);
            }
            None => {
                self.entries
                    .insert(key.clone(), HashMap::from([(link, entry)]));
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of links with a computed value, over all keys.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|links| links.values())
            .filter(|entry| matches!(entry, CacheEntry::Value(_)))
            .count()
    }
}
