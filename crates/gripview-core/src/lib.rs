//! # gripview-core
//!
//! The lazy object-inspector tree engine.
//!
//! This crate turns value snapshots ("grips") delivered by an external
//! inspection protocol into a navigable tree whose children are computed on
//! demand: properties, symbols, prototypes, accessors, promise and proxy
//! internals, Map/Set entries and numerical buckets for large collections.
//!
//! ## Architecture
//!
//! - `types`: wire schema of grips and loaded-properties records
//! - `node` / `classify`: the node entity and its predicates
//! - `properties` / `bucket`: node builders
//! - `children`: the child materializer
//! - `fetch`: gates telling callers what to fetch next
//! - `session`: stateful facade for a tree view
//!
//! ## Constraints
//!
//! - Single-threaded and synchronous; nodes are `Rc`-shared
//! - Never fetches; consumes fetch results supplied by the caller
//! - Never fails while building trees: absent data is omitted
//! - Deterministic: ordered collections only

// =============================================================================
// MODULES
// =============================================================================

pub mod bucket;
pub mod cache;
pub mod children;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod node;
pub mod path;
pub mod primitives;
pub mod properties;
pub mod session;
pub mod snapshot;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Grip, InspectorError, LoadedProperties, ObjectGrip, Preview, PromiseState,
    PropertyDescriptor, SymbolDescriptor,
};

// =============================================================================
// RE-EXPORTS: Tree Engine
// =============================================================================

pub use bucket::{
    BucketLayout, bucket_layout, make_numerical_buckets, needs_numerical_buckets,
    numerical_properties_count,
};
pub use cache::{CachedNodes, NoCache, NodeCache};
pub use children::{ChildMaterializer, LoadedPropertiesMap};
pub use classify::{closest_grip_node, closest_non_bucket_node};
pub use config::InspectorConfig;
pub use fetch::{FetchGates, FetchPlan, LoadedPaths};
pub use node::{BucketRange, Node, NodeContents, NodeKind, NodeRef, ParentLink};
pub use path::{NodePath, escape_path_segment, escape_property_name};
pub use properties::{compare_property_names, sort_properties};

// =============================================================================
// RE-EXPORTS: Session
// =============================================================================

pub use session::{ExpandedPaths, InspectorSession, PendingFetch, TreeRow};
pub use snapshot::{InspectionSnapshot, RootSnapshot};
