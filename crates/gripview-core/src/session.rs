//! # Session Module
//!
//! Stateful facade a tree view drives: roots, cache, loaded properties and
//! expansion state in one place.
//!
//! - Expansion state is volatile, session-local state
//! - Tracked by path, so it survives node re-creation
//! - Cleared on session reset
//!
//! The session never fetches. [`InspectorSession::expand`] returns a
//! [`FetchPlan`]; the caller fetches and hands the result back with
//! [`InspectorSession::supply_properties`].

use crate::cache::CachedNodes;
use crate::children::{ChildMaterializer, LoadedPropertiesMap};
use crate::config::InspectorConfig;
use crate::fetch::{FetchGates, FetchPlan};
use crate::node::{Node, NodeKind, NodeRef};
use crate::path::NodePath;
use crate::primitives::MAX_TREE_DEPTH;
use crate::snapshot::InspectionSnapshot;
use crate::types::{Grip, LoadedProperties};
use serde::Serialize;
use std::collections::BTreeSet;
use std::rc::Rc;

// =============================================================================
// EXPANDED PATHS
// =============================================================================

/// Paths currently expanded in the view.
///
/// Uses BTreeSet for deterministic ordering.
#[derive(Debug, Clone, Default)]
pub struct ExpandedPaths {
    paths: BTreeSet<NodePath>,
}

impl ExpandedPaths {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn expand(&mut self, path: NodePath) {
        self.paths.insert(path);
    }

    pub fn collapse(&mut self, path: &NodePath) {
        self.paths.remove(path);
    }

    #[must_use]
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.paths.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

// =============================================================================
// ROWS AND PENDING FETCHES
// =============================================================================

/// One line of the flattened tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: NodePath,
    pub kind: NodeKind,
    pub expandable: bool,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Grip>,
}

/// Data still missing for an expanded node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingFetch {
    pub path: NodePath,
    pub plan: FetchPlan,
}

// =============================================================================
// SESSION
// =============================================================================

/// An inspection session over a set of root values.
#[derive(Debug, Default)]
pub struct InspectorSession {
    materializer: ChildMaterializer,
    roots: Vec<NodeRef>,
    cache: CachedNodes,
    loaded: LoadedPropertiesMap,
    expanded: ExpandedPaths,
}

impl InspectorSession {
    /// Create an empty session.
    #[must_use]
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            materializer: ChildMaterializer::new(config),
            ..Self::default()
        }
    }

    /// Create a session from a recorded snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: InspectionSnapshot, config: InspectorConfig) -> Self {
        let mut session = Self::new(config);
        for root in snapshot.roots {
            session.add_root(root.name, root.grip);
        }
        session.loaded = snapshot.loaded_properties;
        session
    }

    /// Add a root value. Its path is its name.
    pub fn add_root(&mut self, name: impl Into<String>, grip: Grip) -> NodeRef {
        let name = name.into();
        let root = Node::root(name.clone(), NodePath::new(name), grip);
        self.roots.push(Rc::clone(&root));
        root
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeRef] {
        &self.roots
    }

    /// Look up a root by name.
    #[must_use]
    pub fn root(&self, name: &str) -> Option<&NodeRef> {
        self.roots.iter().find(|r| r.name() == name)
    }

    #[must_use]
    pub fn loaded_properties(&self) -> &LoadedPropertiesMap {
        &self.loaded
    }

    /// Children of `node`, through the session cache.
    pub fn children(&mut self, node: &NodeRef) -> Vec<NodeRef> {
        self.materializer
            .children(node, &mut self.cache, &self.loaded)
    }

    /// What must still be fetched for `node`.
    #[must_use]
    pub fn fetch_plan(&self, node: &NodeRef) -> FetchPlan {
        FetchGates::plan(node, &self.loaded)
    }

    /// Mark `node` as expanded and report what it still needs.
    pub fn expand(&mut self, node: &NodeRef) -> FetchPlan {
        self.expanded.expand(node.path().clone());
        let plan = self.fetch_plan(node);
        tracing::debug!(path = %node.path(), pending = !plan.is_empty(), "expanded node");
        plan
    }

    pub fn collapse(&mut self, node: &NodeRef) {
        self.expanded.collapse(node.path());
    }

    #[must_use]
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.expanded.is_expanded(path)
    }

    /// Record a fetch result for `path`.
    ///
    /// The record is merged field by field into any earlier one. Cached
    /// children of `path` and of every node below it are dropped so they are
    /// rebuilt from the new data.
    pub fn supply_properties(&mut self, path: NodePath, props: LoadedProperties) {
        let dropped = self.cache.invalidate_subtree(&path);
        tracing::debug!(path = %path, dropped, "supplied properties");
        self.loaded.entry(path).or_default().merge(props);
    }

    /// Expand every expandable node down to `depth` levels (roots are level
    /// 0) and return the fetches still pending.
    ///
    /// The depth is capped at [`MAX_TREE_DEPTH`].
    pub fn expand_to_depth(&mut self, depth: usize) -> Vec<PendingFetch> {
        let depth = depth.min(MAX_TREE_DEPTH);
        let mut pending = Vec::new();
        let mut stack: Vec<(NodeRef, usize)> =
            self.roots.iter().rev().map(|r| (Rc::clone(r), 0)).collect();

        while let Some((node, level)) = stack.pop() {
            if level >= depth || node.is_primitive() {
                continue;
            }

            let plan = self.expand(&node);
            if !plan.is_empty() {
                pending.push(PendingFetch {
                    path: node.path().clone(),
                    plan,
                });
            }

            let children = self.children(&node);
            stack.extend(children.into_iter().rev().map(|c| (c, level + 1)));
        }

        pending
    }

    /// Flatten the expanded part of the tree, depth first.
    pub fn visible_rows(&mut self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeRef, usize)> =
            self.roots.iter().rev().map(|r| (Rc::clone(r), 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            let expandable = !node.is_primitive();
            let expanded = expandable && self.is_expanded(node.path());

            rows.push(TreeRow {
                depth,
                name: node.name().to_string(),
                path: node.path().clone(),
                kind: node.kind(),
                expandable,
                expanded,
                value: node.value().cloned(),
            });

            if expanded && depth < MAX_TREE_DEPTH {
                let children = self.children(&node);
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }

        rows
    }

    /// Drop cached children and expansion state. Roots and loaded
    /// properties are kept.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.expanded.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
