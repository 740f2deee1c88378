//! # Core Type Definitions
//!
//! This module contains the wire-level types the engine consumes:
//! - Value snapshots (`Grip`, `ObjectGrip`, `Preview`, `PromiseState`)
//! - Property data (`PropertyDescriptor`, `SymbolDescriptor`, `LoadedProperties`)
//! - Error types (`InspectorError`)
//!
//! ## Wire Compatibility
//!
//! Grips are produced by an external value-inspection protocol and use its
//! camelCase field names. They are treated as immutable input: nothing in the
//! engine rewrites a grip, it only classifies and wraps them.
//!
//! Inside descriptors and previews an explicit JSON `null` is a *present*
//! value (`Some(Grip::Null)`), distinct from a missing field (`None`).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// GRIP
// =============================================================================

/// Snapshot description of a runtime value.
///
/// Primitives travel as plain JSON values; everything else (objects, but also
/// `undefined`, `null`-typed grips, symbols and long strings) is an
/// [`ObjectGrip`] carrying a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Grip {
    /// JSON `null`.
    Null,
    /// A boolean primitive.
    Bool(bool),
    /// A number primitive.
    Number(f64),
    /// A string primitive.
    String(String),
    /// A described value with a `type` tag.
    Object(Box<ObjectGrip>),
}

impl Grip {
    /// Synthesize a map-entry grip wrapping a key/value pair.
    #[must_use]
    pub fn map_entry(key: Grip, value: Grip) -> Self {
        Self::Object(Box::new(ObjectGrip {
            grip_type: MAP_ENTRY_TYPE.to_string(),
            preview: Some(Preview {
                key: Some(key),
                value: Some(value),
                ..Preview::default()
            }),
            ..ObjectGrip::default()
        }))
    }

    /// Whether this is a JSON `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The object grip, if this is not a primitive.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectGrip> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The `type` tag of an object grip.
    #[must_use]
    pub fn grip_type(&self) -> Option<&str> {
        self.as_object().map(|o| o.grip_type.as_str())
    }

    /// The `class` of an object grip.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.as_object().and_then(|o| o.class_name.as_deref())
    }

    /// The preview of an object grip.
    #[must_use]
    pub fn preview(&self) -> Option<&Preview> {
        self.as_object().and_then(|o| o.preview.as_ref())
    }

    /// Whether the grip describes an object (`type == "object"`).
    #[must_use]
    pub fn is_object_type(&self) -> bool {
        self.grip_type() == Some("object")
    }

    /// Whether the grip is an actor-backed object with an array-like preview.
    #[must_use]
    pub fn is_array_like(&self) -> bool {
        self.as_object().is_some_and(|o| {
            o.actor.is_some() && o.preview.as_ref().is_some_and(|p| p.kind_is("ArrayLike"))
        })
    }

    /// Declared length of an array-like grip (0 when not declared).
    #[must_use]
    pub fn array_length(&self) -> u64 {
        self.preview()
            .and_then(|p| p.length.or(p.child_nodes_length))
            .unwrap_or(0)
    }

    /// Whether the grip is an actor-backed object with a map-like preview.
    #[must_use]
    pub fn is_map_like(&self) -> bool {
        self.as_object().is_some_and(|o| {
            o.actor.is_some() && o.preview.as_ref().is_some_and(|p| p.kind_is("MapLike"))
        })
    }

    /// Declared size of a map-like grip (0 when not declared).
    #[must_use]
    pub fn map_size(&self) -> u64 {
        self.preview().and_then(|p| p.size).unwrap_or(0)
    }

    /// Whether the grip is a synthesized map entry.
    #[must_use]
    pub fn is_map_entry(&self) -> bool {
        self.as_object()
            .is_some_and(|o| o.grip_type == MAP_ENTRY_TYPE && o.preview.is_some())
    }
}

/// `type` tag of synthesized map-entry grips.
pub const MAP_ENTRY_TYPE: &str = "mapEntry";

impl From<ObjectGrip> for Grip {
    fn from(object: ObjectGrip) -> Self {
        Self::Object(Box::new(object))
    }
}

impl From<&str> for Grip {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Grip {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Grip {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Grip {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Deserialize a field so that an explicit `null` is kept as `Some(Grip::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Grip>, D::Error>
where
    D: Deserializer<'de>,
{
    Grip::deserialize(deserializer).map(Some)
}

// =============================================================================
// OBJECT GRIP
// =============================================================================

/// A described (non-primitive) value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGrip {
    /// The `type` tag (`"object"`, `"undefined"`, `"null"`, `"mapEntry"`, ...).
    #[serde(rename = "type")]
    pub grip_type: String,
    /// Remote actor backing the value. Only actor-backed grips can be fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Runtime class (`"Array"`, `"Map"`, `"Promise"`, `"Proxy"`, `"Window"`, ...).
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Partial materialization of the contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
    /// The value was optimized out by the engine.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optimized_out: bool,
    /// The value is a missing `arguments` object.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing_arguments: bool,
    /// Settlement state of a promise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promise_state: Option<PromiseState>,
    /// Target of a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_target: Option<Grip>,
    /// Handler of a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_handler: Option<Grip>,
}

impl ObjectGrip {
    /// Create an object grip with the given `type` tag.
    #[must_use]
    pub fn new(grip_type: impl Into<String>) -> Self {
        Self {
            grip_type: grip_type.into(),
            ..Self::default()
        }
    }

    /// Set the actor.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the class.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the preview.
    #[must_use]
    pub fn with_preview(mut self, preview: Preview) -> Self {
        self.preview = Some(preview);
        self
    }
}

// =============================================================================
// PREVIEW
// =============================================================================

/// Partial, protocol-supplied materialization of a grip's contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    /// Preview flavour (`"ArrayLike"`, `"MapLike"`, `"Object"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// First entries of a map-like value, as `[key, value]` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<(Grip, Grip)>>,
    /// First items of an array-like value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Grip>>,
    /// Declared length of an array-like value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Declared size of a map-like value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Child count of DOM node lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_nodes_length: Option<u64>,
    /// Key of a map entry.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<Grip>,
    /// Value of a map entry.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Grip>,
}

impl Preview {
    fn kind_is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

// =============================================================================
// PROMISE STATE
// =============================================================================

/// Settlement state of a promise grip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PromiseState {
    /// `"pending"`, `"fulfilled"` or `"rejected"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Fulfillment value.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Grip>,
    /// Rejection reason.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason: Option<Grip>,
}

// =============================================================================
// PROPERTY DATA
// =============================================================================

/// Descriptor of one own property, as returned by a property fetch.
///
/// Also used as the `{value}` wrapper nodes store around a grip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Data value.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Grip>,
    /// Value obtained by safely invoking a getter.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub getter_value: Option<Grip>,
    /// Getter function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Grip>,
    /// Setter function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Grip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    /// Prototype depth at which a safe getter was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter_prototype_level: Option<u32>,
}

impl PropertyDescriptor {
    /// A data descriptor wrapping `value`.
    #[must_use]
    pub fn value(value: impl Into<Grip>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// An accessor descriptor.
    #[must_use]
    pub fn accessor(get: Option<Grip>, set: Option<Grip>) -> Self {
        Self {
            get,
            set,
            ..Self::default()
        }
    }

    /// Whether the descriptor exposes anything displayable.
    ///
    /// Property names whose descriptor exposes none of `value`,
    /// `getterValue`, `get` or `set` are dropped from the tree.
    #[must_use]
    pub fn exposes_value(&self) -> bool {
        self.value.is_some()
            || self.getter_value.is_some()
            || self.get.is_some()
            || self.set.is_some()
    }
}

/// An own symbol-keyed property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    /// Display name of the symbol (e.g. `Symbol(foo)`).
    pub name: String,
    /// Descriptor, when the protocol supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<PropertyDescriptor>,
}

/// Deferred "expand to fetch more" result for one node path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own_properties: Option<BTreeMap<String, PropertyDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own_symbols: Option<Vec<SymbolDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype: Option<Grip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_getter_values: Option<BTreeMap<String, PropertyDescriptor>>,
}

impl LoadedProperties {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an own property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        self.own_properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), descriptor);
        self
    }

    /// Add an own symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: SymbolDescriptor) -> Self {
        self.own_symbols.get_or_insert_with(Vec::new).push(symbol);
        self
    }

    /// Set the prototype.
    #[must_use]
    pub fn with_prototype(mut self, prototype: Grip) -> Self {
        self.prototype = Some(prototype);
        self
    }

    /// Whether any of the four fields was supplied.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.own_properties.is_some()
            || self.own_symbols.is_some()
            || self.safe_getter_values.is_some()
            || self.prototype.is_some()
    }

    /// Merge a later fetch result into this record.
    ///
    /// Fields present in `other` replace the existing ones; absent fields
    /// keep their current value.
    pub fn merge(&mut self, other: LoadedProperties) {
        if other.own_properties.is_some() {
            self.own_properties = other.own_properties;
        }
        if other.own_symbols.is_some() {
            self.own_symbols = other.own_symbols;
        }
        if other.prototype.is_some() {
            self.prototype = other.prototype;
        }
        if other.safe_getter_values.is_some() {
            self.safe_getter_values = other.safe_getter_values;
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur at the engine's fallible edges.
///
/// Tree construction itself never fails: absent data is omitted from the
/// tree. Only snapshot and configuration handling produce errors.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// A snapshot payload exceeded the accepted size.
    #[error("Snapshot too large: {size} bytes (limit {limit})")]
    SnapshotTooLarge { size: usize, limit: usize },

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A configuration value was invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grip(value: serde_json::Value) -> Grip {
        serde_json::from_value(value).expect("grip")
    }

    #[test]
    fn primitives_deserialize_untagged() {
        assert_eq!(grip(json!(null)), Grip::Null);
        assert_eq!(grip(json!(true)), Grip::Bool(true));
        assert_eq!(grip(json!(3)), Grip::Number(3.0));
        assert_eq!(grip(json!("a")), Grip::from("a"));
    }

    #[test]
    fn object_grip_reads_wire_names() {
        let g = grip(json!({
            "type": "object",
            "actor": "server1.conn1.obj2",
            "class": "Array",
            "preview": { "kind": "ArrayLike", "length": 3 },
            "optimizedOut": false
        }));

        assert!(g.is_object_type());
        assert_eq!(g.class_name(), Some("Array"));
        assert!(g.is_array_like());
        assert_eq!(g.array_length(), 3);
        assert!(!g.is_map_like());
    }

    #[test]
    fn array_like_requires_actor() {
        let g = grip(json!({
            "type": "object",
            "class": "Array",
            "preview": { "kind": "ArrayLike", "length": 3 }
        }));
        assert!(!g.is_array_like());
    }

    #[test]
    fn array_length_falls_back_to_child_nodes() {
        let g = grip(json!({
            "type": "object",
            "actor": "a",
            "class": "NodeList",
            "preview": { "kind": "ArrayLike", "childNodesLength": 7 }
        }));
        assert_eq!(g.array_length(), 7);
    }

    #[test]
    fn map_entry_round_trips_through_constructor() {
        let entry = Grip::map_entry(Grip::from("A"), Grip::Number(0.0));
        assert!(entry.is_map_entry());
        let preview = entry.preview().expect("preview");
        assert_eq!(preview.key, Some(Grip::from("A")));
        assert_eq!(preview.value, Some(Grip::Number(0.0)));
    }

    #[test]
    fn explicit_null_is_present_in_descriptor() {
        let with_null: PropertyDescriptor =
            serde_json::from_value(json!({ "value": null })).expect("descriptor");
        assert_eq!(with_null.value, Some(Grip::Null));
        assert!(with_null.exposes_value());

        let empty: PropertyDescriptor =
            serde_json::from_value(json!({ "enumerable": true })).expect("descriptor");
        assert_eq!(empty.value, None);
        assert!(!empty.exposes_value());
    }

    #[test]
    fn loaded_properties_presence() {
        assert!(!LoadedProperties::new().has_any());

        let props: LoadedProperties =
            serde_json::from_value(json!({ "ownProperties": {} })).expect("props");
        assert!(props.has_any());

        let proto_only: LoadedProperties =
            serde_json::from_value(json!({ "prototype": { "type": "null" } })).expect("props");
        assert!(proto_only.has_any());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let mut props = LoadedProperties::new().with_property("a", PropertyDescriptor::value(1.0));
        props.merge(LoadedProperties::new().with_prototype(grip(json!({ "type": "object" }))));

        assert!(props.own_properties.is_some());
        assert!(props.prototype.is_some());
    }
}
