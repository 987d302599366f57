//! Resolution halts and their exit codes.

use crate::manifest::ManifestError;
use crate::options::REPAIR_FLAG;
use custom_config_schema::SchemaError;
use std::path::PathBuf;

/// Exit code for a failed resolution.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for a requested administrative change.
pub const EXIT_SUCCESS: i32 = 0;

/// Why a resolution could not produce a path mapping.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Given paths are missing required key {0}")]
    MissingGivenPath(&'static str),

    #[error("No manifest detected at {}", .path.display())]
    ManifestNotFound { path: PathBuf },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Custom configuration is not properly formatted: {0}")]
    OverlayMalformed(#[from] SchemaError),

    #[error("Custom configuration has {} invalid path(s)", .paths.len())]
    OverlayPathInvalid { paths: Vec<PathBuf> },
}

impl ResolveError {
    /// Lines shown to the user, including remediation hints.
    pub fn report_lines(&self, manifest_file: &str) -> Vec<String> {
        match self {
            ResolveError::ManifestNotFound { path } => vec![
                format!("No {} detected", manifest_file),
                path.display().to_string(),
            ],
            ResolveError::OverlayMalformed(detail) => vec![
                "Custom configuration is not properly formatted, please try".to_string(),
                String::new(),
                "Using npm:".to_string(),
                format!("npm start --{}", REPAIR_FLAG),
                String::new(),
                "Using yarn:".to_string(),
                format!("yarn start --{}", REPAIR_FLAG),
                String::new(),
                detail.to_string(),
            ],
            ResolveError::OverlayPathInvalid { paths } => {
                let mut lines = vec!["Custom configuration has invalid paths:".to_string()];
                lines.extend(paths.iter().map(|p| p.display().to_string()));
                lines.push(String::new());
                lines.push(
                    "Please review or leave those properties empty, then try again.".to_string(),
                );
                lines
            }
            other => vec![other.to_string()],
        }
    }
}

/// Administrative change performed on the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Created,
    Deleted,
    Repaired,
}

impl AdminAction {
    /// Repair exits non-zero so the caller has to run again.
    pub fn exit_code(&self) -> i32 {
        match self {
            AdminAction::Created | AdminAction::Deleted => EXIT_SUCCESS,
            AdminAction::Repaired => EXIT_FAILURE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Created => "created",
            AdminAction::Deleted => "deleted",
            AdminAction::Repaired => "repaired",
        }
    }
}

/// Why [`resolve`](super::OverlayResolver::resolve) did not return paths.
///
/// Every halt ends the run; the process boundary decides how to exit.
#[derive(Debug, thiserror::Error)]
pub enum Halt {
    #[error(transparent)]
    Failed(#[from] ResolveError),

    #[error("Custom configuration {}", .0.as_str())]
    Administered(AdminAction),
}

impl Halt {
    pub fn exit_code(&self) -> i32 {
        match self {
            Halt::Failed(_) => EXIT_FAILURE,
            Halt::Administered(action) => action.exit_code(),
        }
    }

    /// Whether the run closes with the banner. Repair exits without it.
    pub fn shows_banner(&self) -> bool {
        !matches!(self, Halt::Administered(AdminAction::Repaired))
    }
}

impl From<ManifestError> for Halt {
    fn from(err: ManifestError) -> Self {
        Halt::Failed(err.into())
    }
}

impl From<SchemaError> for Halt {
    fn from(err: SchemaError) -> Self {
        Halt::Failed(err.into())
    }
}
