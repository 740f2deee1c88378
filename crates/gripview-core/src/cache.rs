//! # Node Cache
//!
//! Caller-owned storage of materialized children, keyed by node path.
//!
//! Caching keeps node identity stable across calls: a tree view that
//! tracks expansion by node must get the very same `Rc` back for the same
//! path. Only final children are ever stored (see
//! [`ChildMaterializer::children`](crate::ChildMaterializer::children)).

use crate::node::NodeRef;
use crate::path::NodePath;
use crate::primitives::PATH_SEPARATOR;
use std::collections::BTreeMap;

// =============================================================================
// NODECACHE TRAIT
// =============================================================================

/// Get/set store for children sequences.
pub trait NodeCache {
    /// Cached children of `path`, if any.
    fn get(&self, path: &NodePath) -> Option<Vec<NodeRef>>;

    /// Store the children of `path`, replacing any previous entry.
    fn set(&mut self, path: NodePath, children: Vec<NodeRef>);
}

// =============================================================================
// CACHEDNODES
// =============================================================================

/// Ordered in-memory cache.
///
/// Uses BTreeMap for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct CachedNodes {
    entries: BTreeMap<NodePath, Vec<NodeRef>>,
}

impl CachedNodes {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &NodePath) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drop the entry for `path` and for every path below it.
    ///
    /// Returns the number of entries dropped.
    pub fn invalidate_subtree(&mut self, path: &NodePath) -> usize {
        let prefix = format!("{}{PATH_SEPARATOR}", path.as_str());
        let below: Vec<NodePath> = self
            .entries
            .range(NodePath::new(prefix.clone())..)
            .map(|(key, _)| key)
            .take_while(|key| key.as_str().starts_with(&prefix))
            .cloned()
            .collect();

        for key in &below {
            self.entries.remove(key);
        }
        below.len() + usize::from(self.invalidate(path))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` has cached children.
    #[must_use]
    pub fn contains(&self, path: &NodePath) -> bool {
        self.entries.contains_key(path)
    }
}

impl NodeCache for CachedNodes {
    fn get(&self, path: &NodePath) -> Option<Vec<NodeRef>> {
        self.entries.get(path).cloned()
    }

    fn set(&mut self, path: NodePath, children: Vec<NodeRef>) {
        self.entries.insert(path, children);
    }
}

// =============================================================================
// NOCACHE
// =============================================================================

/// Cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl NodeCache for NoCache {
    fn get(&self, _path: &NodePath) -> Option<Vec<NodeRef>> {
        None
    }

    fn set(&mut self, _path: NodePath, _children: Vec<NodeRef>) {}
}
