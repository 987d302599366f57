//! Typed overlay record and its validation against the schema.

use crate::error::{value_kind, SchemaError};
use crate::{Configurable, CONFIGURABLE_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How strictly an overlay's key set is compared against the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCheck {
    /// Key names must equal the schema key set exactly.
    #[default]
    Exact,
    /// Only the number of keys is compared; every key is resolved as given.
    Count,
}

impl KeyCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCheck::Exact => "exact",
            KeyCheck::Count => "count",
        }
    }
}

impl std::str::FromStr for KeyCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(KeyCheck::Exact),
            "count" => Ok(KeyCheck::Count),
            other => Err(format!("unknown key check '{}' (expected exact or count)", other)),
        }
    }
}

/// Overlay of relative paths, one field per configurable.
///
/// An empty value means "no override".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayRecord {
    pub app_path: String,
    pub app_build: String,
    pub app_public: String,
    pub app_html: String,
    pub app_index_js: String,
    pub app_ts_config: String,
    pub app_js_config: String,
    pub webpack_file: String,
    pub pre_compile_script: String,
    pub post_compile_script: String,
}

/// Result of validating a raw overlay value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOverlay {
    /// The schema keys as a typed record.
    pub record: OverlayRecord,

    /// Every key and value, in overlay order. In count mode this includes
    /// keys outside the schema.
    pub entries: Vec<(String, String)>,

    /// Keys that are not part of the schema (count mode only).
    pub unrecognized: Vec<String>,
}

impl ParsedOverlay {
    /// Entries with a non-empty value, in overlay order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl OverlayRecord {
    /// Value for a configurable.
    pub fn get(&self, key: Configurable) -> &str {
        match key {
            Configurable::AppPath => &self.app_path,
            Configurable::AppBuild => &self.app_build,
            Configurable::AppPublic => &self.app_public,
            Configurable::AppHtml => &self.app_html,
            Configurable::AppIndexJs => &self.app_index_js,
            Configurable::AppTsConfig => &self.app_ts_config,
            Configurable::AppJsConfig => &self.app_js_config,
            Configurable::WebpackFile => &self.webpack_file,
            Configurable::PreCompileScript => &self.pre_compile_script,
            Configurable::PostCompileScript => &self.post_compile_script,
        }
    }

    /// Set the value for a configurable.
    pub fn set(&mut self, key: Configurable, value: impl Into<String>) {
        let slot = match key {
            Configurable::AppPath => &mut self.app_path,
            Configurable::AppBuild => &mut self.app_build,
            Configurable::AppPublic => &mut self.app_public,
            Configurable::AppHtml => &mut self.app_html,
            Configurable::AppIndexJs => &mut self.app_index_js,
            Configurable::AppTsConfig => &mut self.app_ts_config,
            Configurable::AppJsConfig => &mut self.app_js_config,
            Configurable::WebpackFile => &mut self.webpack_file,
            Configurable::PreCompileScript => &mut self.pre_compile_script,
            Configurable::PostCompileScript => &mut self.post_compile_script,
        };
        *slot = value.into();
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: Configurable, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// All entries in schema order, including empty ones.
    pub fn entries(&self) -> impl Iterator<Item = (Configurable, &str)> + '_ {
        Configurable::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    /// Entries with a non-empty value.
    pub fn overrides(&self) -> impl Iterator<Item = (Configurable, &str)> + '_ {
        self.entries().filter(|(_, v)| !v.is_empty())
    }

    /// Convert to a JSON object in schema order.
    pub fn to_value(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .entries()
            .map(|(c, v)| (c.key().to_string(), Value::String(v.to_string())))
            .collect();
        Value::Object(map)
    }

    /// Validate a raw manifest value and convert it to a typed record.
    pub fn from_value(value: &Value, check: KeyCheck) -> Result<ParsedOverlay, SchemaError> {
        let map = value.as_object().ok_or(SchemaError::NotAnObject {
            found: value_kind(value),
        })?;

        let missing: Vec<String> = Configurable::ALL
            .iter()
            .filter(|c| !map.contains_key(c.key()))
            .map(|c| c.key().to_string())
            .collect();
        let unknown: Vec<String> = map
            .keys()
            .filter(|k| Configurable::from_key(k).is_none())
            .cloned()
            .collect();

        let shape_ok = match check {
            KeyCheck::Exact => missing.is_empty() && unknown.is_empty(),
            KeyCheck::Count => map.len() == CONFIGURABLE_COUNT,
        };
        if !shape_ok {
            return Err(SchemaError::Malformed {
                expected: CONFIGURABLE_COUNT,
                found: map.len(),
                missing,
                unknown,
            });
        }

        let mut record = OverlayRecord::default();
        let mut entries = Vec::with_capacity(map.len());
        for (key, raw) in map {
            let path = raw.as_str().ok_or_else(|| SchemaError::NonStringValue {
                key: key.clone(),
                found: value_kind(raw),
            })?;
            if let Some(configurable) = Configurable::from_key(key) {
                record.set(configurable, path);
            }
            entries.push((key.clone(), path.to_string()));
        }

        Ok(ParsedOverlay {
            record,
            entries,
            unrecognized: unknown,
        })
    }
}
