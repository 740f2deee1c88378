//! # Innate Primitives
//!
//! Hardcoded constants for the gripview engine.
//!
//! These values shape the tree every inspector front-end sees, so they are
//! compiled in rather than configured. Changing any of them changes node
//! paths or bucket boundaries, which invalidates client-side expansion state.

/// Maximum number of indexed children a node may show before it is split
/// into numerical buckets.
pub const MAX_NUMERICAL_PROPERTIES: u64 = 100;

/// Smallest power of ten used as a bucket size (`10^2 = 100`).
pub const MIN_BUCKET_EXPONENT: u32 = 2;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Prefix for synthetic path segments.
///
/// Real property names are escaped so they can never start with it.
pub const SAFE_PATH_PREFIX: &str = "##-";

/// Path segment of a map entry's `<key>` child.
pub const MAP_ENTRY_KEY_SEGMENT: &str = "##key";

/// Path segment of a map entry's `<value>` child.
pub const MAP_ENTRY_VALUE_SEGMENT: &str = "##value";

/// Display name and path segment of prototype nodes.
pub const PROTOTYPE_NAME: &str = "__proto__";

/// Maximum number of parent links followed by an upward walk.
///
/// Nodes form a tree, so a walk always terminates; the bound only protects
/// against malformed snapshots producing absurdly deep chains.
pub const MAX_ANCESTOR_DEPTH: usize = 10_000;

/// Maximum depth flattened or expanded by an inspector session.
pub const MAX_TREE_DEPTH: usize = 64;

/// Maximum accepted size of a JSON inspection snapshot (64 MB).
///
/// Checked before deserialization starts.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_matches_min_bucket_size() {
        assert_eq!(10u64.pow(MIN_BUCKET_EXPONENT), MAX_NUMERICAL_PROPERTIES);
    }

    #[test]
    fn reserved_segments_share_prefix() {
        assert!(MAP_ENTRY_KEY_SEGMENT.starts_with("##"));
        assert!(MAP_ENTRY_VALUE_SEGMENT.starts_with("##"));
        assert!(SAFE_PATH_PREFIX.starts_with("##"));
    }
}
