//! Built-in settings (layer 1)
//!
//! Hardcoded defaults for every tool setting.

use custom_config_schema::KeyCheck;
use serde::{Deserialize, Serialize};

/// Manifest file looked up in the project root.
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Manifest property holding the overlay.
pub const DEFAULT_OVERLAY_PROPERTY: &str = "createReactAppCustomConfig";

/// Built-in default setting values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Manifest file name (default: "package.json")
    pub manifest_file: String,

    /// Overlay property name (default: "createReactAppCustomConfig")
    pub overlay_property: String,

    /// Indent width used when rewriting the manifest (default: 4)
    pub manifest_indent: usize,

    /// Overlay key-set comparison (default: exact)
    pub key_check: KeyCheck,

    /// Clear the terminal before resolving (default: true)
    pub clear_console: bool,

    /// Print the closing banner on halt (default: true)
    pub banner: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            overlay_property: DEFAULT_OVERLAY_PROPERTY.to_string(),
            manifest_indent: 4,
            key_check: KeyCheck::Exact,
            clear_console: true,
            banner: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "manifest": {
                "file": self.manifest_file,
                "property": self.overlay_property,
                "indent": self.manifest_indent
            },
            "validation": {
                "key_check": self.key_check
            },
            "output": {
                "clear_console": self.clear_console,
                "banner": self.banner
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.manifest_file, "package.json");
        assert_eq!(defaults.overlay_property, "createReactAppCustomConfig");
        assert_eq!(defaults.manifest_indent, 4);
        assert_eq!(defaults.key_check, KeyCheck::Exact);
        assert!(defaults.clear_console);
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();

        assert_eq!(value["manifest"]["indent"], 4);
        assert_eq!(value["validation"]["key_check"], "exact");
        assert_eq!(value["output"]["banner"], true);
    }
}
