//! # Bucketing Engine
//!
//! Splits large indexed collections into `[min…max]` slices so no node ever
//! lists more than about a hundred children.
//!
//! Bucket sizes are powers of ten: `10^max(2, ceil(log10(count)) - 2)`.
//! Everything is computed with integer arithmetic. Buckets nest: a bucket
//! that is itself too large is bucketed again, offset by its start index.

use crate::classify::closest_grip_node;
use crate::node::{BucketRange, Node, NodeContents, NodeKind, NodeRef};
use crate::primitives::{MAX_NUMERICAL_PROPERTIES, MIN_BUCKET_EXPONENT};
use serde::Serialize;

/// Size and count of the buckets for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketLayout {
    pub bucket_size: u64,
    pub num_buckets: u64,
}

/// Compute the bucket layout for `count` indexed properties.
#[must_use]
pub fn bucket_layout(count: u64) -> BucketLayout {
    let exponent = ceil_log10(count)
        .saturating_sub(MIN_BUCKET_EXPONENT)
        .max(MIN_BUCKET_EXPONENT);
    let bucket_size = 10u64.saturating_pow(exponent);
    BucketLayout {
        bucket_size,
        num_buckets: count.div_ceil(bucket_size),
    }
}

/// `ceil(log10(n))`, with 0 for `n <= 1`.
fn ceil_log10(n: u64) -> u32 {
    if n <= 1 {
        return 0;
    }
    (n - 1).ilog10() + 1
}

/// Number of indexed properties a node exposes.
///
/// Buckets report their own range. Everything else delegates to the nearest
/// grip ancestor-or-self and reads its declared array length or map size.
#[must_use]
pub fn numerical_properties_count(node: &NodeRef) -> u64 {
    if let Some(range) = node.bucket_range() {
        return range.len();
    }

    let Some(grip_node) = closest_grip_node(node) else {
        return 0;
    };
    let Some(value) = grip_node.value() else {
        return 0;
    };

    if value.is_array_like() {
        return value.array_length();
    }
    if value.is_map_like() {
        return value.map_size();
    }
    0
}

/// Whether the node must be shown as numerical buckets.
#[must_use]
pub fn needs_numerical_buckets(node: &NodeRef) -> bool {
    node.supports_numerical_bucketing()
        && numerical_properties_count(node) > MAX_NUMERICAL_PROPERTIES
}

/// Build the bucket children of `parent`, in ascending index order.
#[must_use]
pub fn make_numerical_buckets(parent: &NodeRef) -> Vec<NodeRef> {
    let count = numerical_properties_count(parent);
    let layout = bucket_layout(count);
    let start_index = parent.bucket_range().map_or(0, |r| r.start_index);

    tracing::debug!(
        path = %parent.path(),
        count,
        bucket_size = layout.bucket_size,
        num_buckets = layout.num_buckets,
        "bucketing indexed properties"
    );

    (0..layout.num_buckets)
        .map(|i| {
            let min_key = i.saturating_mul(layout.bucket_size);
            let max_key = i
                .saturating_add(1)
                .saturating_mul(layout.bucket_size)
                .saturating_sub(1)
                .min(count.saturating_sub(1));
            let range = BucketRange::new(
                start_index.saturating_add(min_key),
                start_index.saturating_add(max_key),
            );
            make_bucket(parent, range)
        })
        .collect()
}

fn make_bucket(parent: &NodeRef, range: BucketRange) -> NodeRef {
    let BucketRange {
        start_index,
        end_index,
    } = range;
    Node::new_in(
        parent,
        format!("[{start_index}…{end_index}]"),
        parent
            .path()
            .join_reserved(&format!("bucket_{start_index}-{end_index}")),
        NodeContents::Pending,
        NodeKind::Bucket(range),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NodePath;
    use crate::types::Grip;
    use serde_json::json;

    fn array(length: u64) -> NodeRef {
        let grip: Grip = serde_json::from_value(json!({
            "type": "object",
            "actor": "server1.conn1.obj1",
            "class": "Array",
            "preview": { "kind": "ArrayLike", "length": length }
        }))
        .expect("grip");
        Node::root("root", NodePath::new("root"), grip)
    }

    #[test]
    fn layout_uses_powers_of_ten() {
        assert_eq!(
            bucket_layout(101),
            BucketLayout {
                bucket_size: 100,
                num_buckets: 2
            }
        );
        assert_eq!(bucket_layout(10_000).bucket_size, 100);
        assert_eq!(bucket_layout(10_001).bucket_size, 1_000);
        assert_eq!(bucket_layout(10_001).num_buckets, 11);
        assert_eq!(bucket_layout(1_000_000).num_buckets, 100);
    }

    #[test]
    fn small_arrays_are_not_bucketed() {
        assert!(!needs_numerical_buckets(&array(100)));
        assert!(needs_numerical_buckets(&array(101)));
    }

    #[test]
    fn buckets_cover_the_whole_range() {
        let node = array(234);
        let buckets = make_numerical_buckets(&node);

        let names: Vec<_> = buckets.iter().map(|b| b.name().to_string()).collect();
        assert_eq!(names, vec!["[0…99]", "[100…199]", "[200…233]"]);
        assert_eq!(buckets[0].path().as_str(), "root/##-bucket_0-99");
        assert!(buckets.iter().all(|b| b.is_bucket()));
    }

    #[test]
    fn nested_buckets_are_offset() {
        let node = array(23_456);
        let buckets = make_numerical_buckets(&node);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[1].bucket_range(), Some(BucketRange::new(1_000, 1_999)));

        let inner = make_numerical_buckets(&buckets[1]);
        assert_eq!(inner.len(), 10);
        assert_eq!(inner[0].bucket_range(), Some(BucketRange::new(1_000, 1_099)));
        assert_eq!(inner[9].bucket_range(), Some(BucketRange::new(1_900, 1_999)));
        assert_eq!(
            inner[0].path().as_str(),
            "root/##-bucket_1000-1999/##-bucket_1000-1099"
        );
    }

    #[test]
    fn bucket_count_is_its_range() {
        let node = array(23_456);
        let buckets = make_numerical_buckets(&node);
        let last = buckets.last().expect("last bucket");
        assert_eq!(numerical_properties_count(last), 456);
        assert!(needs_numerical_buckets(last));
    }

    #[test]
    fn non_collections_count_zero() {
        let node = Node::root("root", NodePath::new("root"), Grip::from("text"));
        assert_eq!(numerical_properties_count(&node), 0);
    }
}
