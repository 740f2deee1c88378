//! # Value Classifier
//!
//! Pure predicates over nodes and the grips they wrap, plus the two upward
//! walks the bucketing and fetch logic rely on.
//!
//! Note that "primitive" is derived, not intrinsic: a node is primitive when
//! nothing about it can be expanded.

use crate::node::{Node, NodeKind, NodeRef};
use crate::primitives::MAX_ANCESTOR_DEPTH;
use std::rc::Rc;

const ENTRIES_CLASSES: [&str; 4] = ["Map", "Set", "WeakMap", "WeakSet"];

impl Node {
    // -------------------------------------------------------------------------
    // Kind checks
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn is_bucket(&self) -> bool {
        matches!(self.kind(), NodeKind::Bucket(_))
    }

    #[must_use]
    pub fn is_entries(&self) -> bool {
        self.kind() == NodeKind::Entries
    }

    #[must_use]
    pub fn is_default_properties(&self) -> bool {
        self.kind() == NodeKind::DefaultProperties
    }

    #[must_use]
    pub fn is_prototype(&self) -> bool {
        self.kind() == NodeKind::Prototype
    }

    #[must_use]
    pub fn is_getter(&self) -> bool {
        self.kind() == NodeKind::Get
    }

    #[must_use]
    pub fn is_setter(&self) -> bool {
        self.kind() == NodeKind::Set
    }

    // -------------------------------------------------------------------------
    // Content checks
    // -------------------------------------------------------------------------

    /// Whether the node already carries materialized children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.materialized_children().is_some()
    }

    /// Whether the node wraps a synthesized map entry.
    #[must_use]
    pub fn is_map_entry(&self) -> bool {
        self.value().is_some_and(|v| v.is_map_entry())
    }

    /// Whether the node wraps an object grip (`type == "object"`).
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.value().is_some_and(|v| v.is_object_type())
    }

    #[must_use]
    pub fn is_array_like(&self) -> bool {
        self.value().is_some_and(|v| v.is_array_like())
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        self.value().and_then(|v| v.class_name()) == Some("Function")
    }

    #[must_use]
    pub fn is_optimized_out(&self) -> bool {
        !self.has_children()
            && self
                .value()
                .and_then(|v| v.as_object())
                .is_some_and(|o| o.optimized_out)
    }

    #[must_use]
    pub fn is_missing_arguments(&self) -> bool {
        !self.has_children()
            && self
                .value()
                .and_then(|v| v.as_object())
                .is_some_and(|o| o.missing_arguments)
    }

    /// Whether the node has properties that could be fetched.
    #[must_use]
    pub fn has_properties(&self) -> bool {
        !self.has_children() && self.is_object()
    }

    #[must_use]
    pub fn has_accessors(&self) -> bool {
        self.getter().is_some() || self.setter().is_some()
    }

    /// Whether nothing about the node can be expanded.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        !self.has_children()
            && !self.has_properties()
            && !self.is_entries()
            && !self.is_map_entry()
            && !self.has_accessors()
            && !self.is_bucket()
    }

    #[must_use]
    pub fn is_promise(&self) -> bool {
        self.value().and_then(|v| v.class_name()) == Some("Promise")
    }

    #[must_use]
    pub fn is_proxy(&self) -> bool {
        self.value().and_then(|v| v.class_name()) == Some("Proxy")
    }

    #[must_use]
    pub fn is_window(&self) -> bool {
        self.value().and_then(|v| v.class_name()) == Some("Window")
    }

    /// Whether the node's value has `<entries>` semantics
    /// (Map, Set, WeakMap, WeakSet).
    #[must_use]
    pub fn has_entries(&self) -> bool {
        self.value()
            .and_then(|v| v.class_name())
            .is_some_and(|class| ENTRIES_CLASSES.contains(&class))
    }

    /// Whether the preview already lists every entry (or item).
    ///
    /// When true, no entries fetch is needed.
    #[must_use]
    pub fn has_all_entries_in_preview(&self) -> bool {
        let Some(preview) = self.value().and_then(|v| v.preview()) else {
            return false;
        };

        match (&preview.entries, &preview.items) {
            (Some(entries), _) => preview.size == Some(entries.len() as u64),
            (None, Some(items)) => preview.length == Some(items.len() as u64),
            (None, None) => false,
        }
    }

    /// Whether the node may be split into numerical buckets.
    ///
    /// Values with entries are excluded: their `<entries>` node is the one
    /// that gets bucketed.
    #[must_use]
    pub fn supports_numerical_bucketing(&self) -> bool {
        (self.is_array_like() && !self.has_entries()) || self.is_entries() || self.is_bucket()
    }
}

// =============================================================================
// UPWARD WALKS
// =============================================================================

/// Nearest ancestor-or-self that is not a synthetic wrapper
/// (bucket, default properties or entries).
#[must_use]
pub fn closest_grip_node(node: &NodeRef) -> Option<NodeRef> {
    closest_matching(node, |n| {
        !matches!(
            n.kind(),
            NodeKind::Bucket(_) | NodeKind::DefaultProperties | NodeKind::Entries
        )
    })
}

/// Nearest ancestor-or-self that is not a bucket.
#[must_use]
pub fn closest_non_bucket_node(node: &NodeRef) -> Option<NodeRef> {
    closest_matching(node, |n| !n.is_bucket())
}

fn closest_matching(node: &NodeRef, accept: impl Fn(&Node) -> bool) -> Option<NodeRef> {
    let mut current = Rc::clone(node);
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if accept(&current) {
            return Some(current);
        }
        current = current.parent()?;
    }
    tracing::warn!(path = %node.path(), "ancestor walk exceeded depth limit");
    None
}

// =============================================================================
// TESTS
// =============================================================================
