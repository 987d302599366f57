//! Effective settings with provenance
//!
//! Captures the merged settings plus where each contributing layer came from.

use chrono::{DateTime, Utc};
use custom_config_schema::KeyCheck;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Schema identifier for the printed effective settings
pub const SCHEMA_ID: &str = "custom-config/effective_settings@1";

/// Largest accepted manifest indent width.
const MAX_INDENT: usize = 8;

/// Origin of a settings layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Repo,
    Cli,
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Manifest location and formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestSettings {
    pub file: String,
    pub property: String,
    pub indent: usize,
}

/// Overlay validation strictness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationSettings {
    pub key_check: KeyCheck,
}

/// Console behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputSettings {
    pub clear_console: bool,
    pub banner: bool,
}

/// Typed view of the merged settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub manifest: ManifestSettings,
    pub validation: ValidationSettings,
    pub output: OutputSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            manifest: ManifestSettings {
                file: defaults.manifest_file,
                property: defaults.overlay_property,
                indent: defaults.manifest_indent,
            },
            validation: ValidationSettings {
                key_check: defaults.key_check,
            },
            output: OutputSettings {
                clear_console: defaults.clear_console,
                banner: defaults.banner,
            },
        }
    }
}

/// Effective settings with provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub schema_id: String,

    /// When these settings were computed
    pub created_at: DateTime<Utc>,

    /// The merged settings object
    pub config: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,

    #[serde(skip)]
    settings: Settings,
}

impl EffectiveConfig {
    /// Build effective settings from layers. Missing files are skipped.
    pub fn build(
        host_config_path: Option<&Path>,
        repo_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Repo, repo_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            tracing::debug!(origin = ?origin, path = %path.display(), "loaded settings layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let settings: Settings = serde_json::from_value(merged.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Self::validate_settings(&settings)?;

        Ok(Self {
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
            settings,
        })
    }

    /// Typed settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes).map_err(|e| {
            ConfigError::ParseError(format!("{}: invalid UTF-8: {}", path.display(), e))
        })?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
        if settings.manifest.file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "manifest.file must not be empty".to_string(),
            ));
        }

        if settings.manifest.property.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "manifest.property must not be empty".to_string(),
            ));
        }

        if settings.manifest.indent == 0 || settings.manifest.indent > MAX_INDENT {
            return Err(ConfigError::ValidationError(format!(
                "manifest.indent must be in [1, {}]",
                MAX_INDENT
            )));
        }

        Ok(())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
