//! Project manifest access.
//!
//! The manifest (`package.json`) is treated as an opaque JSON object apart
//! from one property that may hold the custom configuration overlay.

mod json;

pub use json::JsonManifestStore;

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Loads and persists the project manifest.
pub trait ManifestStore {
    /// Whether a manifest exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the manifest. Fails with [`ManifestError::NotFound`] if absent.
    fn read(&self, path: &Path) -> Result<ManifestRecord, ManifestError>;

    /// Persist the manifest, fully replacing the file.
    fn write(&self, path: &Path, record: &ManifestRecord) -> Result<(), ManifestError>;
}

impl<T: ManifestStore + ?Sized> ManifestStore for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> Result<ManifestRecord, ManifestError> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, record: &ManifestRecord) -> Result<(), ManifestError> {
        (**self).write(path, record)
    }
}

/// A loaded manifest. Key order is preserved across read and write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestRecord(Map<String, Value>);

impl ManifestRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The overlay stored under `property`.
    ///
    /// Missing properties and falsy values (`null`, `false`, `0`, `""`)
    /// count as no overlay.
    pub fn overlay(&self, property: &str) -> Option<&Value> {
        self.0.get(property).filter(|v| !is_falsy(v))
    }

    /// Store `overlay` under `property`, replacing any previous value.
    pub fn set_overlay(&mut self, property: &str, overlay: Value) {
        self.0.insert(property.to_string(), overlay);
    }

    /// Remove `property`, returning its old value.
    pub fn remove_overlay(&mut self, property: &str) -> Option<Value> {
        self.0.shift_remove(property)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for ManifestRecord {
    type Error = ManifestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ManifestError::NotAnObject),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Manifest access errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Manifest is not a JSON object")]
    NotAnObject,

    #[error("Invalid manifest JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
