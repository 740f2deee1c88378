//! # Configuration
//!
//! TOML configuration of the CLI.
//!
//! ```toml
//! [inspector]
//! window_default_properties = ["document", "location", "alert"]
//!
//! [display]
//! depth = 2
//! ```
//!
//! The file comes from `--config`, else from `GRIPVIEW_CONFIG`, else the
//! built-in defaults apply.

use crate::error::CliError;
use gripview_core::InspectorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "GRIPVIEW_CONFIG";

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Default expansion depth of `inspect`.
pub const DEFAULT_DEPTH: usize = 1;

/// Properties every browser window carries, grouped under
/// `[default properties]` unless the configuration overrides them.
pub const DEFAULT_WINDOW_PROPERTIES: &[&str] = &[
    "addEventListener",
    "alert",
    "atob",
    "blur",
    "btoa",
    "caches",
    "cancelAnimationFrame",
    "clearInterval",
    "clearTimeout",
    "close",
    "closed",
    "confirm",
    "console",
    "crypto",
    "customElements",
    "devicePixelRatio",
    "dispatchEvent",
    "document",
    "fetch",
    "focus",
    "frameElement",
    "frames",
    "getComputedStyle",
    "getSelection",
    "history",
    "indexedDB",
    "innerHeight",
    "innerWidth",
    "localStorage",
    "location",
    "matchMedia",
    "name",
    "navigator",
    "open",
    "opener",
    "outerHeight",
    "outerWidth",
    "parent",
    "performance",
    "postMessage",
    "print",
    "prompt",
    "removeEventListener",
    "requestAnimationFrame",
    "screen",
    "screenX",
    "screenY",
    "scroll",
    "scrollBy",
    "scrollTo",
    "scrollX",
    "scrollY",
    "self",
    "sessionStorage",
    "setInterval",
    "setTimeout",
    "status",
    "top",
    "window",
];

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub inspector: InspectorSection,
    pub display: DisplaySection,
}

/// `[inspector]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectorSection {
    /// Overrides [`DEFAULT_WINDOW_PROPERTIES`] when set.
    pub window_default_properties: Option<Vec<String>>,
}

/// `[display]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    /// Levels expanded by `inspect` when `--depth` is not given.
    pub depth: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl AppConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Load the configuration from `path`, else from `GRIPVIEW_CONFIG`,
    /// else use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let Some(path) = path else {
            tracing::debug!("no configuration file, using defaults");
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(&path).map_err(|e| {
            CliError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(CliError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            CliError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_toml_str(&content)
    }

    /// Engine configuration derived from this file.
    #[must_use]
    pub fn inspector_config(&self) -> InspectorConfig {
        match &self.inspector.window_default_properties {
            Some(names) => InspectorConfig::with_window_defaults(names.iter().cloned()),
            None => InspectorConfig::with_window_defaults(DEFAULT_WINDOW_PROPERTIES.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("config");
        assert_eq!(config.display.depth, DEFAULT_DEPTH);
        assert!(
            config
                .inspector_config()
                .is_default_window_property("document")
        );
    }

    #[test]
    fn tables_override_defaults() {
        let config = AppConfig::from_toml_str(
            "[inspector]\nwindow_default_properties = [\"myLib\"]\n\n[display]\ndepth = 3\n",
        )
        .expect("config");
        assert_eq!(config.display.depth, 3);

        let inspector = config.inspector_config();
        assert!(inspector.is_default_window_property("myLib"));
        assert!(!inspector.is_default_window_property("document"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml_str("[display]\ncolour = true\n").expect_err("should fail");
        assert!(matches!(err, CliError::Config(_)));
    }
}
