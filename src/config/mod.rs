//! Tool settings
//!
//! Layered merge, lowest precedence first:
//! 1. Built-in defaults
//! 2. Host config (~/.config/custom-config/config.toml)
//! 3. Repo config (.custom-config.toml in the project root)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::{BuiltinDefaults, DEFAULT_MANIFEST_FILE, DEFAULT_OVERLAY_PROPERTY};
pub use effective::{
    ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, ManifestSettings, OutputSettings,
    Settings, ValidationSettings,
};
pub use merge::{deep_merge, merge_layers};

/// Repo settings file name, looked up in the project root.
pub const REPO_CONFIG_FILE: &str = ".custom-config.toml";
