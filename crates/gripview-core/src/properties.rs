//! # Node Builders
//!
//! Specialized constructors turning grips and loaded property data into
//! child nodes.
//!
//! [`make_nodes_for_properties`] fixes the order children appear in:
//! 1. own properties and safe getter values (sorted; grouped for windows)
//! 2. own symbols, in protocol order
//! 3. promise internals
//! 4. the `<entries>` node
//! 5. the prototype
//!
//! Front-ends depend on that order for default expansion and focus.

use crate::config::InspectorConfig;
use crate::node::{Node, NodeContents, NodeKind, NodeRef};
use crate::path::escape_property_name;
use crate::primitives::{MAP_ENTRY_KEY_SEGMENT, MAP_ENTRY_VALUE_SEGMENT, PROTOTYPE_NAME};
use crate::types::{Grip, LoadedProperties, PropertyDescriptor};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// =============================================================================
// PROMISE / PROXY
// =============================================================================

/// `<state>`, `<reason>` and `<value>` of a promise, skipping absent fields.
#[must_use]
pub fn make_nodes_for_promise_properties(item: &NodeRef) -> Vec<NodeRef> {
    let Some(promise) = item
        .value()
        .and_then(|v| v.as_object())
        .and_then(|o| o.promise_state.as_ref())
    else {
        return Vec::new();
    };

    let fields = [
        ("<state>", "state", promise.state.clone().map(Grip::from), NodeKind::PromiseState),
        ("<reason>", "reason", promise.reason.clone(), NodeKind::PromiseReason),
        ("<value>", "value", promise.value.clone(), NodeKind::PromiseValue),
    ];

    fields
        .into_iter()
        .filter_map(|(name, key, value, kind)| {
            value.map(|value| {
                Node::new_in(
                    item,
                    name,
                    item.path().join_reserved(key),
                    NodeContents::value(value),
                    kind,
                )
            })
        })
        .collect()
}

/// `<target>` and `<handler>` of a proxy, always both and in that order.
#[must_use]
pub fn make_nodes_for_proxy_properties(item: &NodeRef) -> Vec<NodeRef> {
    let object = item.value().and_then(|v| v.as_object());
    let target = object.and_then(|o| o.proxy_target.clone());
    let handler = object.and_then(|o| o.proxy_handler.clone());

    [
        ("<target>", "target", target, NodeKind::ProxyTarget),
        ("<handler>", "handler", handler, NodeKind::ProxyHandler),
    ]
    .into_iter()
    .map(|(name, key, value, kind)| {
        Node::new_in(
            item,
            name,
            item.path().join_reserved(key),
            NodeContents::Descriptor(PropertyDescriptor {
                value,
                ..PropertyDescriptor::default()
            }),
            kind,
        )
    })
    .collect()
}

// =============================================================================
// ENTRIES
// =============================================================================

/// The `<entries>` node of a Map/Set-like value.
///
/// When the preview already holds every entry, the node comes with its
/// children; otherwise its contents are pending and must be fetched.
#[must_use]
pub fn make_node_for_entries(item: &NodeRef) -> NodeRef {
    let entries_path = item.path().join_reserved("entries");

    let contents = if item.has_all_entries_in_preview() {
        let preview = item.value().and_then(|v| v.preview());
        let children = match preview {
            Some(preview) => {
                if let Some(entries) = &preview.entries {
                    entries
                        .iter()
                        .enumerate()
                        .map(|(index, (key, value))| {
                            Node::new_in(
                                item,
                                index.to_string(),
                                entries_path.join_raw(&index.to_string()),
                                NodeContents::value(Grip::map_entry(key.clone(), value.clone())),
                                NodeKind::Grip,
                            )
                        })
                        .collect()
                } else {
                    preview
                        .items
                        .iter()
                        .flatten()
                        .enumerate()
                        .map(|(index, value)| {
                            Node::new_in(
                                item,
                                index.to_string(),
                                entries_path.join_raw(&index.to_string()),
                                NodeContents::value(value.clone()),
                                NodeKind::SetEntry,
                            )
                        })
                        .collect()
                }
            }
            None => Vec::new(),
        };
        NodeContents::Children(children)
    } else {
        NodeContents::Pending
    };

    Node::new_in(
        item,
        "<entries>",
        entries_path,
        contents,
        NodeKind::Entries,
    )
}

/// `<key>` and `<value>` children of a map-entry node.
#[must_use]
pub fn make_nodes_for_map_entry(item: &NodeRef) -> Vec<NodeRef> {
    let Some(preview) = item.value().and_then(|v| v.preview()) else {
        return Vec::new();
    };

    let path = item.path();
    vec![
        Node::new_in(
            item,
            "<key>",
            path.join_raw(MAP_ENTRY_KEY_SEGMENT),
            wrap(preview.key.clone()),
            NodeKind::MapEntryKey,
        ),
        Node::new_in(
            item,
            "<value>",
            path.join_raw(MAP_ENTRY_VALUE_SEGMENT),
            wrap(preview.value.clone()),
            NodeKind::MapEntryValue,
        ),
    ]
}

fn wrap(value: Option<Grip>) -> NodeContents {
    NodeContents::Descriptor(PropertyDescriptor {
        value,
        ..PropertyDescriptor::default()
    })
}

// =============================================================================
// ACCESSORS
// =============================================================================

/// `<get>` and `<set>` children, skipping undefined accessors.
#[must_use]
pub fn make_nodes_for_accessors(item: &NodeRef) -> Vec<NodeRef> {
    let defined = |g: &&Grip| g.grip_type() != Some("undefined");

    let getter = item.getter().filter(defined).map(|getter| {
        Node::new_in(
            item,
            "<get>",
            item.path().join_reserved("get"),
            NodeContents::value(getter.clone()),
            NodeKind::Get,
        )
    });
    let setter = item.setter().filter(defined).map(|setter| {
        Node::new_in(
            item,
            "<set>",
            item.path().join_reserved("set"),
            NodeContents::value(setter.clone()),
            NodeKind::Set,
        )
    });

    getter.into_iter().chain(setter).collect()
}

// =============================================================================
// PROTOTYPE
// =============================================================================

/// The `__proto__` node, when a non-null prototype was loaded.
#[must_use]
pub fn make_node_for_prototype(
    props: Option<&LoadedProperties>,
    parent: &NodeRef,
) -> Option<NodeRef> {
    let prototype = props?.prototype.as_ref()?;
    if prototype.grip_type() == Some("null") || prototype.is_null() {
        return None;
    }

    Some(Node::new_in(
        parent,
        PROTOTYPE_NAME,
        parent.path().join_raw(PROTOTYPE_NAME),
        NodeContents::value(prototype.clone()),
        NodeKind::Prototype,
    ))
}

// =============================================================================
// OWN PROPERTIES
// =============================================================================

/// One node per property name, in the given order.
#[must_use]
pub fn make_nodes_for_own_props(
    names: &[&str],
    parent: &NodeRef,
    properties: &BTreeMap<&str, &PropertyDescriptor>,
) -> Vec<NodeRef> {
    names
        .iter()
        .filter_map(|name| {
            let descriptor = properties.get(name)?;
            Some(Node::new_in(
                parent,
                escape_property_name(name),
                parent.path().join_property(name),
                NodeContents::Descriptor((*descriptor).clone()),
                NodeKind::Grip,
            ))
        })
        .collect()
}

/// Window properties: user names first, then one `[default properties]`
/// node grouping the platform defaults.
#[must_use]
pub fn make_default_props_bucket(
    names: &[&str],
    parent: &NodeRef,
    properties: &BTreeMap<&str, &PropertyDescriptor>,
    config: &InspectorConfig,
) -> Vec<NodeRef> {
    let (defaults, user): (Vec<&str>, Vec<&str>) = names
        .iter()
        .copied()
        .partition(|name| config.is_default_window_property(name));

    let mut nodes = make_nodes_for_own_props(&user, parent, properties);

    if !defaults.is_empty() {
        let parent_path = parent.path();
        let group = Node::with_children(
            Some(parent),
            "[default properties]",
            parent_path.join_reserved("default"),
            NodeKind::DefaultProperties,
            |group| {
                defaults
                    .iter()
                    .enumerate()
                    .filter_map(|(index, name)| {
                        let descriptor = properties.get(name)?;
                        Some(Node::new_in(
                            group,
                            escape_property_name(name),
                            parent_path
                                .join_reserved(&format!("bucket{index}"))
                                .join_property(name),
                            NodeContents::Descriptor((*descriptor).clone()),
                            NodeKind::Grip,
                        ))
                    })
                    .collect()
            },
        );
        nodes.push(group);
    }

    nodes
}

/// Build every child a loaded-properties record contributes to `parent`.
#[must_use]
pub fn make_nodes_for_properties(
    props: &LoadedProperties,
    parent: &NodeRef,
    config: &InspectorConfig,
) -> Vec<NodeRef> {
    // Safe getter values override own properties of the same name.
    let mut all: BTreeMap<&str, &PropertyDescriptor> = BTreeMap::new();
    for source in [&props.own_properties, &props.safe_getter_values]
        .into_iter()
        .flatten()
    {
        all.extend(source.iter().map(|(k, v)| (k.as_str(), v)));
    }

    let mut names: Vec<&str> = all
        .iter()
        .filter(|(_, descriptor)| descriptor.exposes_value())
        .map(|(name, _)| *name)
        .collect();
    sort_properties(&mut names);

    let mut nodes = if parent.is_window() {
        make_default_props_bucket(&names, parent, &all, config)
    } else {
        make_nodes_for_own_props(&names, parent, &all)
    };

    if let Some(symbols) = &props.own_symbols {
        nodes.extend(symbols.iter().enumerate().filter_map(|(index, symbol)| {
            Node::create(
                Some(parent),
                symbol.name.clone(),
                parent.path().join_reserved(&format!("symbol-{index}")),
                symbol.descriptor.clone().map(NodeContents::Descriptor),
                NodeKind::Grip,
            )
        }));
    }

    if parent.is_promise() {
        nodes.extend(make_nodes_for_promise_properties(parent));
    }

    if parent.has_entries() {
        nodes.push(make_node_for_entries(parent));
    }

    if let Some(prototype) = make_node_for_prototype(Some(props), parent) {
        nodes.push(prototype);
    }

    nodes
}

// =============================================================================
// SORTING
// =============================================================================

/// Sort property names: integer-like names first by value, then the rest
/// lexicographically.
pub fn sort_properties<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_property_names(a.as_ref(), b.as_ref()));
}

/// Total order behind [`sort_properties`].
///
/// A name is integer-like when it has a leading integer in the sense of
/// JavaScript's `parseInt(name, 10)` (`"10"`, `"-3"`, `"7px"`). Ties between
/// equal integers fall back to the names themselves.
#[must_use]
pub fn compare_property_names(a: &str, b: &str) -> Ordering {
    match (leading_integer(a), leading_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn leading_integer(name: &str) -> Option<i64> {
    let trimmed = name.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen_digit.then_some(if negative { -value } else { value })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NodePath;
    use crate::types::SymbolDescriptor;
    use std::rc::Rc;
    use serde_json::json;

    fn grip(value: serde_json::Value) -> Grip {
        serde_json::from_value(value).expect("grip")
    }

    fn root(value: serde_json::Value) -> NodeRef {
        Node::root("root", NodePath::new("root"), grip(value))
    }

    fn names(nodes: &[NodeRef]) -> Vec<&str> {
        nodes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn sort_mixes_numbers_and_words() {
        let mut props = vec!["2", "10", "a", "1"];
        sort_properties(&mut props);
        assert_eq!(props, vec!["1", "2", "10", "a"]);
    }

    #[test]
    fn sort_handles_parse_int_prefixes() {
        let mut props = vec!["b", "10px", "-1", "$", "3"];
        sort_properties(&mut props);
        assert_eq!(props, vec!["-1", "3", "10px", "$", "b"]);
    }

    #[test]
    fn properties_in_documented_order() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props = LoadedProperties::new()
            .with_property("b", PropertyDescriptor::value(1.0))
            .with_property("a", PropertyDescriptor::value(2.0))
            .with_symbol(SymbolDescriptor {
                name: "Symbol(foo)".to_string(),
                descriptor: Some(PropertyDescriptor::value("bar")),
            })
            .with_prototype(grip(json!({ "type": "object", "actor": "p", "class": "Object" })));

        let nodes = make_nodes_for_properties(&props, &parent, &InspectorConfig::new());

        assert_eq!(names(&nodes), vec!["a", "b", "Symbol(foo)", "__proto__"]);
        assert_eq!(nodes[2].path().as_str(), "root/##-symbol-0");
        assert_eq!(nodes[3].kind(), NodeKind::Prototype);
        assert_eq!(nodes[3].path().as_str(), "root/__proto__");
    }

    #[test]
    fn symbols_without_descriptor_are_dropped() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props = LoadedProperties::new()
            .with_symbol(SymbolDescriptor {
                name: "Symbol(a)".to_string(),
                descriptor: None,
            })
            .with_symbol(SymbolDescriptor {
                name: "Symbol(b)".to_string(),
                descriptor: Some(PropertyDescriptor::value(1.0)),
            });
        let nodes = make_nodes_for_properties(&props, &parent, &InspectorConfig::new());
        assert_eq!(names(&nodes), vec!["Symbol(b)"]);
        assert_eq!(nodes[0].path().as_str(), "root/##-symbol-1");
    }

    #[test]
    fn properties_without_value_fields_are_dropped() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props: LoadedProperties = serde_json::from_value(json!({
            "ownProperties": {
                "shown": { "value": 1 },
                "hidden": { "enumerable": true },
                "accessor": { "get": { "type": "object", "class": "Function" } }
            }
        }))
        .expect("props");

        let nodes = make_nodes_for_properties(&props, &parent, &InspectorConfig::new());
        assert_eq!(names(&nodes), vec!["accessor", "shown"]);
    }

    #[test]
    fn safe_getter_values_override_own_properties() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props: LoadedProperties = serde_json::from_value(json!({
            "ownProperties": { "x": { "get": { "type": "object" } } },
            "safeGetterValues": { "x": { "getterValue": 5 }, "y": { "getterValue": 6 } }
        }))
        .expect("props");

        let nodes = make_nodes_for_properties(&props, &parent, &InspectorConfig::new());
        assert_eq!(names(&nodes), vec!["x", "y"]);
        assert_eq!(nodes[0].value(), Some(&Grip::Number(5.0)));
        assert!(!nodes[0].has_accessors());
    }

    #[test]
    fn null_prototype_is_omitted() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props = LoadedProperties::new().with_prototype(grip(json!({ "type": "null" })));
        assert!(make_node_for_prototype(Some(&props), &parent).is_none());
        assert!(make_node_for_prototype(None, &parent).is_none());
    }

    #[test]
    fn escaped_names_and_paths() {
        let parent = root(json!({ "type": "object", "actor": "a", "class": "Object" }));
        let props = LoadedProperties::new().with_property("a b/c", PropertyDescriptor::value(1.0));
        let nodes = make_nodes_for_properties(&props, &parent, &InspectorConfig::new());
        assert_eq!(nodes[0].name(), "\"a b/c\"");
        assert_eq!(nodes[0].path().as_str(), "root/a b\\/c");
    }

    #[test]
    fn promise_fields_are_optional() {
        let pending = root(json!({
            "type": "object", "actor": "a", "class": "Promise",
            "promiseState": { "state": "pending" }
        }));
        let nodes = make_nodes_for_promise_properties(&pending);
        assert_eq!(names(&nodes), vec!["<state>"]);
        assert_eq!(nodes[0].value(), Some(&Grip::from("pending")));

        let rejected = root(json!({
            "type": "object", "actor": "a", "class": "Promise",
            "promiseState": { "state": "rejected", "reason": "boom" }
        }));
        let nodes = make_nodes_for_promise_properties(&rejected);
        assert_eq!(names(&nodes), vec!["<state>", "<reason>"]);
        assert_eq!(nodes[1].path().as_str(), "root/##-reason");
    }

    #[test]
    fn promise_children_follow_properties() {
        let promise = root(json!({
            "type": "object", "actor": "a", "class": "Promise",
            "promiseState": { "state": "fulfilled", "value": 42 }
        }));
        let props = LoadedProperties::new().with_property("z", PropertyDescriptor::value(1.0));
        let nodes = make_nodes_for_properties(&props, &promise, &InspectorConfig::new());
        assert_eq!(names(&nodes), vec!["z", "<state>", "<value>"]);
    }

    #[test]
    fn proxy_has_target_then_handler() {
        let proxy = root(json!({
            "type": "object", "actor": "a", "class": "Proxy",
            "proxyTarget": { "type": "object", "actor": "t", "class": "Object" },
            "proxyHandler": { "type": "object", "actor": "h", "class": "Object" }
        }));
        let nodes = make_nodes_for_proxy_properties(&proxy);
        assert_eq!(names(&nodes), vec!["<target>", "<handler>"]);
        assert_eq!(nodes[0].kind(), NodeKind::ProxyTarget);
        assert_eq!(nodes[1].path().as_str(), "root/##-handler");
    }

    #[test]
    fn entries_from_complete_preview() {
        let map = root(json!({
            "type": "object", "actor": "a", "class": "Map",
            "preview": { "kind": "MapLike", "size": 2, "entries": [["a", 1], ["b", 2]] }
        }));
        let entries = make_node_for_entries(&map);
        assert!(entries.is_entries());
        assert_eq!(entries.path().as_str(), "root/##-entries");

        let children = entries.materialized_children().expect("children");
        assert_eq!(children.len(), 2);
        assert!(children[0].is_map_entry());
        assert_eq!(children[1].path().as_str(), "root/##-entries/1");
        assert!(children[0].parent().is_some_and(|p| Rc::ptr_eq(&p, &map)));
    }

    #[test]
    fn entries_from_items_are_set_entries() {
        let set = root(json!({
            "type": "object", "actor": "a", "class": "Set",
            "preview": { "kind": "ArrayLike", "length": 2, "items": ["x", "y"] }
        }));
        let entries = make_node_for_entries(&set);
        let children = entries.materialized_children().expect("children");
        assert_eq!(names(children), vec!["0", "1"]);
        assert!(children.iter().all(|c| c.kind() == NodeKind::SetEntry));
    }

    #[test]
    fn entries_pending_when_preview_incomplete() {
        let map = root(json!({
            "type": "object", "actor": "a", "class": "Map",
            "preview": { "kind": "MapLike", "size": 20, "entries": [["a", 1]] }
        }));
        let entries = make_node_for_entries(&map);
        assert!(matches!(entries.contents(), NodeContents::Pending));
    }

    #[test]
    fn map_entry_key_and_value() {
        let entry = Node::root(
            "0",
            NodePath::new("root/##-entries/0"),
            Grip::map_entry(Grip::from("A"), Grip::Null),
        );
        let nodes = make_nodes_for_map_entry(&entry);
        assert_eq!(names(&nodes), vec!["<key>", "<value>"]);
        assert_eq!(nodes[0].path().as_str(), "root/##-entries/0/##key");
        assert_eq!(nodes[1].value(), Some(&Grip::Null));
    }

    #[test]
    fn undefined_accessors_are_skipped() {
        let node = Node::root("root", NodePath::new("root"), Grip::Null);
        let accessor = Node::create(
            Some(&node),
            "x",
            node.path().join_property("x"),
            Some(NodeContents::Descriptor(PropertyDescriptor::accessor(
                Some(grip(json!({ "type": "object", "class": "Function" }))),
                Some(grip(json!({ "type": "undefined" }))),
            ))),
            NodeKind::Grip,
        )
        .expect("node");

        let nodes = make_nodes_for_accessors(&accessor);
        assert_eq!(names(&nodes), vec!["<get>"]);
        assert_eq!(nodes[0].path().as_str(), "root/x/##-get");
    }

    #[test]
    fn window_defaults_are_grouped_last() {
        let window = root(json!({ "type": "object", "actor": "w", "class": "Window" }));
        let props = LoadedProperties::new()
            .with_property("document", PropertyDescriptor::value(1.0))
            .with_property("myGlobal", PropertyDescriptor::value(2.0))
            .with_property("location", PropertyDescriptor::value(3.0));
        let config = InspectorConfig::with_window_defaults(["document", "location"]);

        let nodes = make_nodes_for_properties(&props, &window, &config);
        assert_eq!(names(&nodes), vec!["myGlobal", "[default properties]"]);

        let group = &nodes[1];
        assert!(group.is_default_properties());
        assert_eq!(group.path().as_str(), "root/##-default");
        let defaults = group.materialized_children().expect("defaults");
        assert_eq!(names(defaults), vec!["document", "location"]);
        assert_eq!(defaults[1].path().as_str(), "root/##-bucket1/location");
        assert!(defaults[0].parent().is_some_and(|p| Rc::ptr_eq(&p, group)));
    }

    #[test]
    fn window_without_defaults_has_no_group() {
        let window = root(json!({ "type": "object", "actor": "w", "class": "Window" }));
        let props = LoadedProperties::new().with_property("mine", PropertyDescriptor::value(1.0));
        let config = InspectorConfig::with_window_defaults(["document"]);
        let nodes = make_nodes_for_properties(&props, &window, &config);
        assert_eq!(names(&nodes), vec!["mine"]);
    }
}
