//! # Property-Based Tests
//!
//! Invariants of bucketing, node construction, sorting and materialization,
//! checked with proptest.

use gripview_core::{
    BucketRange, CachedNodes, ChildMaterializer, Grip, LoadedPropertiesMap, NoCache, Node,
    NodeContents, NodeKind, NodePath, NodeRef, bucket_layout, compare_property_names,
    make_numerical_buckets, sort_properties,
};
use proptest::prelude::*;
use serde_json::json;
use std::cmp::Ordering;
use std::rc::Rc;

fn array(length: u64) -> NodeRef {
    let grip: Grip = serde_json::from_value(json!({
        "type": "object",
        "actor": "server1.conn1.obj1",
        "class": "Array",
        "preview": { "kind": "ArrayLike", "length": length }
    }))
    .expect("grip");
    Node::root("arr", NodePath::new("arr"), grip)
}

fn property_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,4}",
        "-?[0-9]{1,3}[a-z]{0,2}",
        "[a-zA-Z_$][a-zA-Z0-9_]{0,6}",
        "[ -~]{0,6}",
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Buckets cover `[0, length - 1]` without gaps or overlaps.
    #[test]
    fn buckets_cover_range_without_gaps(length in 101u64..200_000) {
        let buckets = make_numerical_buckets(&array(length));
        let layout = bucket_layout(length);

        prop_assert_eq!(buckets.len() as u64, layout.num_buckets);
        prop_assert!(layout.num_buckets * layout.bucket_size >= length);
        prop_assert!(layout.num_buckets <= 100);

        let mut expected_start = 0;
        for bucket in &buckets {
            let range = bucket.bucket_range().expect("bucket range");
            prop_assert_eq!(range.start_index, expected_start);
            prop_assert!(range.end_index >= range.start_index);
            expected_start = range.end_index + 1;
        }
        prop_assert_eq!(expected_start, length);
    }

    /// Nested buckets stay inside their parent range.
    #[test]
    fn nested_buckets_stay_inside_parent(length in 10_001u64..200_000, pick in 0usize..1000) {
        let buckets = make_numerical_buckets(&array(length));
        let parent = &buckets[pick % buckets.len()];
        let outer = parent.bucket_range().expect("bucket range");

        let inner = make_numerical_buckets(parent);
        if let (Some(first), Some(last)) = (inner.first(), inner.last()) {
            prop_assert_eq!(first.bucket_range().map(|r| r.start_index), Some(outer.start_index));
            prop_assert_eq!(last.bucket_range().map(|r| r.end_index), Some(outer.end_index));
        }
    }

    /// Absent contents never yield a node.
    #[test]
    fn create_without_contents_is_none(
        name in "[a-z]{0,8}",
        path in "[a-z/]{0,12}",
        with_parent in any::<bool>(),
        start in 0u64..1000,
        kind_index in 0usize..4,
    ) {
        let parent = Node::root("p", NodePath::new("p"), Grip::Null);
        let kind = [
            NodeKind::Grip,
            NodeKind::Entries,
            NodeKind::DefaultProperties,
            NodeKind::Bucket(BucketRange::new(start, start + 10)),
        ][kind_index];

        let node = Node::create(
            with_parent.then_some(&parent),
            name,
            NodePath::new(path),
            None,
            kind,
        );
        prop_assert!(node.is_none());
    }

    /// The property order is a total order consistent with equality.
    #[test]
    fn property_order_is_total(a in property_name(), b in property_name(), c in property_name()) {
        prop_assert_eq!(compare_property_names(&a, &b), compare_property_names(&b, &a).reverse());
        prop_assert_eq!(compare_property_names(&a, &b) == Ordering::Equal, a == b);

        if compare_property_names(&a, &b) != Ordering::Greater
            && compare_property_names(&b, &c) != Ordering::Greater
        {
            prop_assert_ne!(compare_property_names(&a, &c), Ordering::Greater);
        }
    }

    /// Sorting is idempotent and keeps every name.
    #[test]
    fn sorting_is_stable_under_repetition(mut names in prop::collection::vec(property_name(), 0..30)) {
        let mut original = names.clone();
        sort_properties(&mut names);
        let once = names.clone();
        sort_properties(&mut names);
        prop_assert_eq!(&once, &names);

        original.sort();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(original, sorted);
    }

    /// Materializing already materialized contents is idempotent.
    #[test]
    fn materialized_contents_are_idempotent(count in 0usize..20, cached in any::<bool>()) {
        let children: Vec<NodeRef> = (0..count)
            .map(|i| Node::root(i.to_string(), NodePath::new(format!("p/{i}")), Grip::Null))
            .collect();
        let node = Node::create(
            None,
            "p",
            NodePath::new("p"),
            Some(NodeContents::Children(children.clone())),
            NodeKind::Grip,
        )
        .expect("node");

        let materializer = ChildMaterializer::default();
        let loaded = LoadedPropertiesMap::new();
        let (first, second) = if cached {
            let mut cache = CachedNodes::new();
            (
                materializer.children(&node, &mut cache, &loaded),
                materializer.children(&node, &mut cache, &loaded),
            )
        } else {
            (
                materializer.children(&node, &mut NoCache, &loaded),
                materializer.children(&node, &mut NoCache, &loaded),
            )
        };

        prop_assert_eq!(first.len(), count);
        prop_assert_eq!(second.len(), count);
        for ((a, b), original) in first.iter().zip(&second).zip(&children) {
            prop_assert!(Rc::ptr_eq(a, b));
            prop_assert!(Rc::ptr_eq(a, original));
        }
    }
}
