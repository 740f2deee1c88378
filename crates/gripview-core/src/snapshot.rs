//! # Inspection Snapshot
//!
//! JSON interchange format for a recorded inspection: the root values plus
//! every loaded-properties record fetched so far.
//!
//! ```json
//! {
//!   "roots": [{ "name": "obj", "grip": { "type": "object", "actor": "a1", "class": "Object" } }],
//!   "loadedProperties": { "obj": { "ownProperties": { "x": { "value": 1 } } } }
//! }
//! ```

use crate::children::LoadedPropertiesMap;
use crate::primitives::MAX_SNAPSHOT_SIZE;
use crate::types::{Grip, InspectorError};
use serde::{Deserialize, Serialize};

/// One named root value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootSnapshot {
    pub name: String,
    pub grip: Grip,
}

/// Roots and loaded properties of one inspection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSnapshot {
    #[serde(default)]
    pub roots: Vec<RootSnapshot>,
    #[serde(default)]
    pub loaded_properties: LoadedPropertiesMap,
}

impl InspectionSnapshot {
    /// Parse a snapshot.
    ///
    /// Payloads over [`MAX_SNAPSHOT_SIZE`] are rejected before parsing.
    pub fn from_json(data: &str) -> Result<Self, InspectorError> {
        if data.len() > MAX_SNAPSHOT_SIZE {
            return Err(InspectorError::SnapshotTooLarge {
                size: data.len(),
                limit: MAX_SNAPSHOT_SIZE,
            });
        }
        serde_json::from_str(data).map_err(|e| InspectorError::Deserialization(e.to_string()))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, InspectorError> {
        serde_json::to_string_pretty(self).map_err(|e| InspectorError::Serialization(e.to_string()))
    }
}
