//! # Child Materializer
//!
//! Produces the children of a node from what is currently known about it:
//! its own contents, the loaded-properties map and the cache.
//!
//! The first matching rule wins:
//! 1. cached children
//! 2. already materialized children
//! 3. accessors (`<get>`/`<set>`)
//! 4. map entry (`<key>`/`<value>`)
//! 5. proxy (`<target>`/`<handler>`, plus a loaded prototype)
//! 6. numerical buckets (plus loaded non-indexed properties)
//! 7. nothing expandable: empty
//! 8. properties not loaded yet: empty
//! 9. loaded properties
//!
//! Children are cached only once they are final for the data at hand.
//! An empty result is ambiguous on its own; use
//! [`FetchGates`](crate::FetchGates) to tell "nothing there" from
//! "not loaded yet".

use crate::bucket::{make_numerical_buckets, needs_numerical_buckets};
use crate::cache::NodeCache;
use crate::config::InspectorConfig;
use crate::node::NodeRef;
use crate::path::NodePath;
use crate::properties::{
    make_node_for_prototype, make_nodes_for_accessors, make_nodes_for_map_entry,
    make_nodes_for_properties, make_nodes_for_proxy_properties,
};
use crate::types::LoadedProperties;
use std::collections::BTreeMap;

/// Loaded-properties records keyed by node path.
pub type LoadedPropertiesMap = BTreeMap<NodePath, LoadedProperties>;

/// Stateless child builder configured with the window allow-list.
#[derive(Debug, Clone, Default)]
pub struct ChildMaterializer {
    config: InspectorConfig,
}

impl ChildMaterializer {
    #[must_use]
    pub fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Children of `item`.
    pub fn children<C: NodeCache + ?Sized>(
        &self,
        item: &NodeRef,
        cache: &mut C,
        loaded: &LoadedPropertiesMap,
    ) -> Vec<NodeRef> {
        let path = item.path();
        if let Some(children) = cache.get(path) {
            tracing::trace!(path = %path, "children cache hit");
            return children;
        }

        let props = loaded.get(path).filter(|p| p.has_any());
        let mut add_to_cache = |children: Vec<NodeRef>| {
            cache.set(path.clone(), children.clone());
            children
        };

        if let Some(children) = item.materialized_children() {
            return add_to_cache(children.to_vec());
        }

        if item.has_accessors() {
            return add_to_cache(make_nodes_for_accessors(item));
        }

        if item.is_map_entry() {
            return add_to_cache(make_nodes_for_map_entry(item));
        }

        if item.is_proxy() {
            let mut nodes = make_nodes_for_proxy_properties(item);
            return match make_node_for_prototype(props, item) {
                Some(prototype) => {
                    nodes.push(prototype);
                    add_to_cache(nodes)
                }
                None => nodes,
            };
        }

        if needs_numerical_buckets(item) {
            let mut buckets = make_numerical_buckets(item);
            return match props {
                Some(props) => {
                    buckets.extend(self.make_nodes_for_properties(props, item));
                    add_to_cache(buckets)
                }
                None => buckets,
            };
        }

        if !item.is_entries() && !item.is_bucket() && !item.has_properties() {
            return Vec::new();
        }

        let Some(props) = props else {
            tracing::trace!(path = %path, "properties not loaded yet");
            return Vec::new();
        };

        add_to_cache(self.make_nodes_for_properties(props, item))
    }

    /// Build the children a loaded-properties record contributes.
    #[must_use]
    pub fn make_nodes_for_properties(
        &self,
        props: &LoadedProperties,
        parent: &NodeRef,
    ) -> Vec<NodeRef> {
        make_nodes_for_properties(props, parent, &self.config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
