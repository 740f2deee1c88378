//! # Inspector Configuration
//!
//! Values injected into the engine at construction time.
//!
//! The only configurable input is the allow-list of "platform default"
//! property names of window objects. These names are grouped under a
//! `[default properties]` node so that user-defined globals stand out.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration of a [`ChildMaterializer`](crate::ChildMaterializer).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Property names considered intrinsic to window objects.
    pub window_default_properties: BTreeSet<String>,
}

impl InspectorConfig {
    /// Create an empty configuration (no default window properties).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with the given default window property names.
    #[must_use]
    pub fn with_window_defaults<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            window_default_properties: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` is a default window property.
    #[must_use]
    pub fn is_default_window_property(&self, name: &str) -> bool {
        self.window_default_properties.contains(name)
    }
}
