//! Configurable schema for project path overlays.
//!
//! Defines the fixed set of overridable path keys, the typed overlay record
//! stored in the project manifest, and the shape validation applied to it.

mod error;
mod record;

pub use error::SchemaError;
pub use record::{KeyCheck, OverlayRecord, ParsedOverlay};

use serde::{Deserialize, Serialize};

/// Number of configurable keys every overlay must carry.
pub const CONFIGURABLE_COUNT: usize = 10;

/// A single overridable path setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Configurable {
    AppPath,
    AppBuild,
    AppPublic,
    AppHtml,
    AppIndexJs,
    AppTsConfig,
    AppJsConfig,
    WebpackFile,
    PreCompileScript,
    PostCompileScript,
}

impl Configurable {
    /// All configurables in schema order.
    pub const ALL: [Configurable; CONFIGURABLE_COUNT] = [
        Configurable::AppPath,
        Configurable::AppBuild,
        Configurable::AppPublic,
        Configurable::AppHtml,
        Configurable::AppIndexJs,
        Configurable::AppTsConfig,
        Configurable::AppJsConfig,
        Configurable::WebpackFile,
        Configurable::PreCompileScript,
        Configurable::PostCompileScript,
    ];

    /// Key name as it appears in the manifest.
    pub fn key(&self) -> &'static str {
        match self {
            Configurable::AppPath => "appPath",
            Configurable::AppBuild => "appBuild",
            Configurable::AppPublic => "appPublic",
            Configurable::AppHtml => "appHtml",
            Configurable::AppIndexJs => "appIndexJs",
            Configurable::AppTsConfig => "appTsConfig",
            Configurable::AppJsConfig => "appJsConfig",
            Configurable::WebpackFile => "webpackFile",
            Configurable::PreCompileScript => "preCompileScript",
            Configurable::PostCompileScript => "postCompileScript",
        }
    }

    /// Look up a configurable by its manifest key name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Configurable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The recognized key set, in schema order.
pub fn schema() -> &'static [Configurable] {
    &Configurable::ALL
}

/// Key names of the schema, in schema order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    Configurable::ALL.iter().map(|c| c.key())
}

/// Overlay written when a custom configuration is created: every key empty.
pub fn defaults() -> OverlayRecord {
    OverlayRecord::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_ten_unique_keys() {
        let keys: std::collections::BTreeSet<_> = keys().collect();
        assert_eq!(keys.len(), CONFIGURABLE_COUNT);
        assert!(keys.contains("appHtml"));
        assert!(keys.contains("postCompileScript"));
    }

    #[test]
    fn test_from_key_roundtrips_names() {
        for c in schema() {
            assert_eq!(Configurable::from_key(c.key()), Some(*c));
        }
        assert_eq!(Configurable::from_key("appPackageJson"), None);
        assert_eq!(Configurable::from_key("apphtml"), None);
    }

    #[test]
    fn test_serde_name_matches_key() {
        let json = serde_json::to_string(&Configurable::AppTsConfig).unwrap();
        assert_eq!(json, "\"appTsConfig\"");
    }

    #[test]
    fn test_defaults_are_empty() {
        let defaults = defaults();
        assert!(defaults.entries().all(|(_, v)| v.is_empty()));
        assert_eq!(defaults.overrides().count(), 0);
    }
}
