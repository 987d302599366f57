//! JSON file manifest store.

use super::{ManifestError, ManifestRecord, ManifestStore};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads and writes the manifest as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonManifestStore {
    indent: String,
}

impl JsonManifestStore {
    /// Store that writes with `indent` spaces per level.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent),
        }
    }

    fn render(&self, record: &ManifestRecord) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        record.fields().serialize(&mut ser)?;
        out.push(b'\n');
        Ok(out)
    }
}

impl Default for JsonManifestStore {
    fn default() -> Self {
        Self::new(4)
    }
}

impl ManifestStore for JsonManifestStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<ManifestRecord, ManifestError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
            _ => ManifestError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ManifestError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(path = %path.display(), "read manifest");
        ManifestRecord::try_from(value)
    }

    fn write(&self, path: &Path, record: &ManifestRecord) -> Result<(), ManifestError> {
        let bytes = self.render(record).map_err(ManifestError::Serialize)?;

        fs::write(path, bytes).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "wrote manifest");
        Ok(())
    }
}
