//! # Fetch Gates
//!
//! Predicates telling a caller which data must still be fetched for a node.
//!
//! The engine never fetches anything itself. A caller expanding a node asks
//! the gates, fetches what they report, supplies the results as loaded
//! properties and asks for the children again.
//!
//! Bucketing takes precedence over entries: a bucketed `<entries>` node is
//! fetched bucket by bucket, never as a whole.

use crate::bucket::needs_numerical_buckets;
use crate::children::LoadedPropertiesMap;
use crate::classify::{closest_grip_node, closest_non_bucket_node};
use crate::node::NodeRef;
use crate::path::NodePath;
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// LOADED PATHS
// =============================================================================

/// Set of node paths whose properties were already fetched.
pub trait LoadedPaths {
    fn is_loaded(&self, path: &NodePath) -> bool;
}

impl LoadedPaths for LoadedPropertiesMap {
    fn is_loaded(&self, path: &NodePath) -> bool {
        self.contains_key(path)
    }
}

impl LoadedPaths for BTreeSet<NodePath> {
    fn is_loaded(&self, path: &NodePath) -> bool {
        self.contains(path)
    }
}

// =============================================================================
// FETCH PLAN
// =============================================================================

/// Every gate's answer for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FetchPlan {
    pub indexed_properties: bool,
    pub non_indexed_properties: bool,
    pub entries: bool,
    pub prototype: bool,
    pub symbols: bool,
}

impl FetchPlan {
    /// Whether nothing needs fetching.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.indexed_properties
            || self.non_indexed_properties
            || self.entries
            || self.prototype
            || self.symbols)
    }
}

// =============================================================================
// GATES
// =============================================================================

/// The fetch-gate predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchGates;

impl FetchGates {
    /// Indexed properties (array items, bucket slices).
    #[must_use]
    pub fn should_load_indexed_properties<L: LoadedPaths + ?Sized>(
        item: &NodeRef,
        loaded: &L,
    ) -> bool {
        Self::grip_has_fetchable_properties(item)
            && !loaded.is_loaded(item.path())
            && !item.is_proxy()
            && !needs_numerical_buckets(item)
            && !Self::under_entries(item)
            // Loaded with the owning window node.
            && !item.is_default_properties()
    }

    /// Non-indexed properties (`length`, named properties).
    ///
    /// Buckets are excluded: their non-indexed properties are driven by the
    /// collection node.
    #[must_use]
    pub fn should_load_non_indexed_properties<L: LoadedPaths + ?Sized>(
        item: &NodeRef,
        loaded: &L,
    ) -> bool {
        Self::grip_has_fetchable_properties(item)
            && !loaded.is_loaded(item.path())
            && !item.is_proxy()
            && !Self::under_entries(item)
            && !item.is_bucket()
            && !item.is_default_properties()
    }

    /// Entries of a Map/Set-like value.
    #[must_use]
    pub fn should_load_entries<L: LoadedPaths + ?Sized>(item: &NodeRef, loaded: &L) -> bool {
        let Some(grip_node) = closest_grip_node(item) else {
            return false;
        };

        grip_node.value().is_some()
            && Self::under_entries(item)
            && !grip_node.has_all_entries_in_preview()
            && !loaded.is_loaded(item.path())
            && !needs_numerical_buckets(item)
    }

    /// The prototype.
    #[must_use]
    pub fn should_load_prototype<L: LoadedPaths + ?Sized>(item: &NodeRef, loaded: &L) -> bool {
        item.value().is_some()
            && !loaded.is_loaded(item.path())
            && !item.is_bucket()
            && !item.is_map_entry()
            && !item.is_entries()
            && !item.is_default_properties()
            && !item.has_accessors()
            && !item.is_primitive()
    }

    /// Own symbols. Never for proxies.
    #[must_use]
    pub fn should_load_symbols<L: LoadedPaths + ?Sized>(item: &NodeRef, loaded: &L) -> bool {
        Self::should_load_prototype(item, loaded) && !item.is_proxy()
    }

    /// Ask every gate at once.
    #[must_use]
    pub fn plan<L: LoadedPaths + ?Sized>(item: &NodeRef, loaded: &L) -> FetchPlan {
        FetchPlan {
            indexed_properties: Self::should_load_indexed_properties(item, loaded),
            non_indexed_properties: Self::should_load_non_indexed_properties(item, loaded),
            entries: Self::should_load_entries(item, loaded),
            prototype: Self::should_load_prototype(item, loaded),
            symbols: Self::should_load_symbols(item, loaded),
        }
    }

    fn grip_has_fetchable_properties(item: &NodeRef) -> bool {
        closest_grip_node(item).is_some_and(|g| g.value().is_some() && g.has_properties())
    }

    fn under_entries(item: &NodeRef) -> bool {
        closest_non_bucket_node(item).is_some_and(|n| n.is_entries())
    }
}

// =============================================================================
// TESTS
// =============================================================================
