//! # Node Model
//!
//! The node entity the inspector tree is built from.
//!
//! Nodes are reference counted (`NodeRef = Rc<Node>`) so a cache and a tree
//! view can share them; identity (`Rc::ptr_eq`) is what keeps expansion state
//! stable across re-renders. A node owns its parent, so any node handed out
//! keeps its ancestor chain alive.
//!
//! Nodes are immutable once built. A container whose children point back at
//! it is built with [`Node::with_children`], which creates the container and
//! its children in one step. Only those children link back with a `Weak`:
//! the container already owns them.

use crate::path::NodePath;
use crate::types::{Grip, PropertyDescriptor};
use serde::{Deserialize, Serialize};
use std::rc::{Rc, Weak};

/// Shared handle to a node.
pub type NodeRef = Rc<Node>;

// =============================================================================
// NODE KIND
// =============================================================================

/// Inclusive index range covered by a bucket node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRange {
    pub start_index: u64,
    pub end_index: u64,
}

impl BucketRange {
    /// Create a range. `start_index` must not exceed `end_index`.
    #[must_use]
    pub const fn new(start_index: u64, end_index: u64) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    /// Number of indices covered.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end_index
            .saturating_sub(self.start_index)
            .saturating_add(1)
    }

    /// A range always covers at least one index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "range")]
pub enum NodeKind {
    /// A plain value (property, symbol, entry, root).
    Grip,
    /// `[n…m]` slice of a large indexed collection.
    Bucket(BucketRange),
    /// `[default properties]` group of a window object.
    DefaultProperties,
    /// `<entries>` view of a Map/Set-like value.
    Entries,
    /// Item of a Set-like value, listed under `<entries>`.
    SetEntry,
    /// `<get>` accessor.
    Get,
    /// `<set>` accessor.
    Set,
    /// `<state>` of a promise.
    PromiseState,
    /// `<reason>` of a rejected promise.
    PromiseReason,
    /// `<value>` of a fulfilled promise.
    PromiseValue,
    /// `<target>` of a proxy.
    ProxyTarget,
    /// `<handler>` of a proxy.
    ProxyHandler,
    /// `<key>` of a map entry.
    MapEntryKey,
    /// `<value>` of a map entry.
    MapEntryValue,
    /// `__proto__`.
    Prototype,
}

// =============================================================================
// NODE CONTENTS
// =============================================================================

/// What a node holds.
#[derive(Debug, Clone)]
pub enum NodeContents {
    /// Children already materialized. Such a node is terminal for
    /// materialization: its children are exactly these.
    Children(Vec<NodeRef>),
    /// A property descriptor; plain values use the `{value}` form.
    Descriptor(PropertyDescriptor),
    /// Not yet known; children must be fetched.
    Pending,
}

impl NodeContents {
    /// Wrap a grip as `{value}`.
    #[must_use]
    pub fn value(grip: Grip) -> Self {
        Self::Descriptor(PropertyDescriptor {
            value: Some(grip),
            ..PropertyDescriptor::default()
        })
    }
}

// =============================================================================
// PARENT LINK
// =============================================================================

/// Link from a node to its parent.
#[derive(Debug, Clone, Default)]
pub enum ParentLink {
    /// Root node.
    #[default]
    Detached,
    /// Owning link.
    Owner(NodeRef),
    /// Back-link from a child to the container that owns it.
    Container(Weak<Node>),
}

impl ParentLink {
    fn upgrade(&self) -> Option<NodeRef> {
        match self {
            Self::Detached => None,
            Self::Owner(parent) => Some(Rc::clone(parent)),
            Self::Container(container) => container.upgrade(),
        }
    }
}

impl From<&NodeRef> for ParentLink {
    fn from(parent: &NodeRef) -> Self {
        Self::Owner(Rc::clone(parent))
    }
}

impl From<Option<&NodeRef>> for ParentLink {
    fn from(parent: Option<&NodeRef>) -> Self {
        parent.map(Self::from).unwrap_or_default()
    }
}

impl From<&Weak<Node>> for ParentLink {
    fn from(container: &Weak<Node>) -> Self {
        Self::Container(container.clone())
    }
}

// =============================================================================
// NODE
// =============================================================================

/// One inspectable entry of the tree.
#[derive(Debug)]
pub struct Node {
    parent: ParentLink,
    name: String,
    path: NodePath,
    contents: NodeContents,
    kind: NodeKind,
}

impl Node {
    /// Create a node, or nothing when `contents` is absent.
    ///
    /// Absence propagates: callers rely on `None` contents yielding no node
    /// to drop properties missing from a fetch result.
    #[must_use]
    pub fn create(
        parent: Option<&NodeRef>,
        name: impl Into<String>,
        path: NodePath,
        contents: Option<NodeContents>,
        kind: NodeKind,
    ) -> Option<NodeRef> {
        contents.map(|contents| Self::new_in(parent, name, path, contents, kind))
    }

    /// Create a parentless node wrapping a grip.
    #[must_use]
    pub fn root(name: impl Into<String>, path: NodePath, grip: Grip) -> NodeRef {
        Self::new_in(ParentLink::Detached, name, path, NodeContents::value(grip), NodeKind::Grip)
    }

    /// Create a container whose children point back at it.
    ///
    /// `build` receives the container's (not yet upgradable) weak handle,
    /// which converts into the children's [`ParentLink`].
    pub fn with_children<F>(
        parent: Option<&NodeRef>,
        name: impl Into<String>,
        path: NodePath,
        kind: NodeKind,
        build: F,
    ) -> NodeRef
    where
        F: FnOnce(&Weak<Node>) -> Vec<NodeRef>,
    {
        let parent = ParentLink::from(parent);
        let name = name.into();
        Rc::new_cyclic(|this| Node {
            parent,
            name,
            path,
            contents: NodeContents::Children(build(this)),
            kind,
        })
    }

    /// Create a node under an explicit parent link.
    pub(crate) fn new_in(
        parent: impl Into<ParentLink>,
        name: impl Into<String>,
        path: NodePath,
        contents: NodeContents,
        kind: NodeKind,
    ) -> NodeRef {
        Rc::new(Node {
            parent: parent.into(),
            name: name.into(),
            path,
            contents,
            kind,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique, stable path.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn contents(&self) -> &NodeContents {
        &self.contents
    }

    /// Parent node. `None` for roots, and for container children whose
    /// container has been dropped.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    /// Range of a bucket node.
    #[must_use]
    pub fn bucket_range(&self) -> Option<BucketRange> {
        match self.kind {
            NodeKind::Bucket(range) => Some(range),
            _ => None,
        }
    }

    /// Materialized children, if the node carries them.
    #[must_use]
    pub fn materialized_children(&self) -> Option<&[NodeRef]> {
        match &self.contents {
            NodeContents::Children(children) => Some(children),
            _ => None,
        }
    }

    /// The wrapped descriptor, if any.
    #[must_use]
    pub fn descriptor(&self) -> Option<&PropertyDescriptor> {
        match &self.contents {
            NodeContents::Descriptor(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    /// The node's value: the descriptor's `value`, else its `getterValue`.
    #[must_use]
    pub fn value(&self) -> Option<&Grip> {
        let descriptor = self.descriptor()?;
        descriptor
            .value
            .as_ref()
            .or(descriptor.getter_value.as_ref())
    }

    /// Getter of an accessor property.
    #[must_use]
    pub fn getter(&self) -> Option<&Grip> {
        self.descriptor().and_then(|d| d.get.as_ref())
    }

    /// Setter of an accessor property.
    #[must_use]
    pub fn setter(&self) -> Option<&Grip> {
        self.descriptor().and_then(|d| d.set.as_ref())
    }
}

// =============================================================================
// TESTS
// =============================================================================
