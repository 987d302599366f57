//! Machine-readable resolution summary.

use crate::paths::{GivenPaths, ResolvedPaths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema identifier for [`ResolutionReport`]
pub const REPORT_SCHEMA_ID: &str = "custom-config/resolution@1";

/// Summary of a completed resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub schema_id: String,

    pub created_at: DateTime<Utc>,

    /// Base directory overlay paths were resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Whether a validated overlay was applied
    pub overlay_applied: bool,

    /// Keys whose path differs from the given default
    pub overridden: Vec<String>,

    /// The full resolved mapping
    pub paths: ResolvedPaths,
}

impl ResolutionReport {
    pub fn new(given: &GivenPaths, resolved: &ResolvedPaths, overlay_applied: bool) -> Self {
        Self {
            schema_id: REPORT_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            project_root: given.project_root().map(PathBuf::from),
            overlay_applied,
            overridden: resolved.changed_keys(given),
            paths: resolved.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One `key  path` line per entry, overridden keys marked with `*`.
    pub fn to_human(&self) -> String {
        let width = self.paths.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        self.paths
            .iter()
            .map(|(key, path)| {
                let mark = if self.overridden.iter().any(|k| k == key) {
                    '*'
                } else {
                    ' '
                };
                format!("{} {:<width$}  {}", mark, key, path.display(), width = width)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn given() -> GivenPaths {
        [
            ("appPath", "/app"),
            ("appPackageJson", "/app/package.json"),
            ("appHtml", "/app/public/index.html"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_report_marks_overridden_keys() {
        let given = given();
        let resolved = given.overridden_by([("appHtml", PathBuf::from("/app/tpl/index.html"))]);

        let report = ResolutionReport::new(&given, &resolved, true);

        assert_eq!(report.overridden, vec!["appHtml".to_string()]);
        assert_eq!(report.project_root.as_deref(), Some(Path::new("/app")));

        let human = report.to_human();
        assert!(human.contains("* appHtml"));
        assert!(human.contains("  appPath"));
    }

    #[test]
    fn test_report_json_shape() {
        let given = given();
        let report = ResolutionReport::new(&given, &given, false);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["schema_id"], REPORT_SCHEMA_ID);
        assert_eq!(json["overlay_applied"], false);
        assert_eq!(json["paths"]["appHtml"], "/app/public/index.html");
        assert!(json["overridden"].as_array().unwrap().is_empty());
    }
}
