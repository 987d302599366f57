//! Overlay resolution.
//!
//! [`OverlayResolver::resolve`] walks the check sequence once per resolver:
//!
//! 1. read the administrative flags
//! 2. load the manifest (missing manifest halts)
//! 3. branch on overlay presence: passthrough, create, delete or repair
//! 4. validate the overlay shape against the configurable schema
//! 5. resolve every non-empty overlay path against the project root, in
//!    overlay order
//! 6. merge the existing ones over the given paths, or halt listing the
//!    missing ones
//!
//! Administrative operations persist the manifest and then halt; the caller
//! owns process termination.

mod error;
mod report;

pub use error::{AdminAction, Halt, ResolveError, EXIT_FAILURE, EXIT_SUCCESS};
pub use report::{ResolutionReport, REPORT_SCHEMA_ID};

use crate::config::Settings;
use crate::manifest::{ManifestRecord, ManifestStore};
use crate::options::{AdminFlags, OptionSource};
use crate::paths::{resolve_relative, GivenPaths, ResolvedPaths, APP_PACKAGE_JSON, APP_PATH};
use crate::reporter::Reporter;
use custom_config_schema::{defaults, OverlayRecord};
use std::path::{Path, PathBuf};

/// Outcome remembered after the first successful resolution.
#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    /// No overlay; the caller's paths apply unchanged.
    Passthrough,
    Merged(ResolvedPaths),
}

/// Resolves the custom configuration overlay against given paths.
///
/// Construct one per process and reuse it; the first outcome is cached.
pub struct OverlayResolver<S, O, R> {
    store: S,
    options: O,
    reporter: R,
    settings: Settings,
    resolved: Option<Resolution>,
}

impl<S, O, R> OverlayResolver<S, O, R>
where
    S: ManifestStore,
    O: OptionSource,
    R: Reporter,
{
    pub fn new(store: S, options: O, reporter: R, settings: Settings) -> Self {
        Self {
            store,
            options,
            reporter,
            settings,
            resolved: None,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a previous call already produced paths.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Whether the cached outcome came from a validated overlay.
    pub fn overlay_applied(&self) -> bool {
        matches!(self.resolved, Some(Resolution::Merged(_)))
    }

    /// Resolve `given` against the manifest overlay.
    ///
    /// Later calls return the cached outcome without touching the file
    /// system. A passthrough outcome hands back the `given` of that call.
    pub fn resolve(&mut self, given: &GivenPaths) -> Result<ResolvedPaths, Halt> {
        if let Some(resolution) = &self.resolved {
            tracing::debug!("returning cached resolution");
            return Ok(match resolution {
                Resolution::Passthrough => given.clone(),
                Resolution::Merged(paths) => paths.clone(),
            });
        }

        if self.settings.output.clear_console {
            self.reporter.clear();
        }

        let flags = AdminFlags::read(&self.options);
        tracing::debug!(?flags, "read administrative flags");

        let resolution = self.check(given, flags)?;
        let paths = match &resolution {
            Resolution::Passthrough => given.clone(),
            Resolution::Merged(paths) => paths.clone(),
        };
        self.resolved = Some(resolution);
        Ok(paths)
    }

    fn check(&self, given: &GivenPaths, flags: AdminFlags) -> Result<Resolution, Halt> {
        let manifest_path = given
            .manifest_path()
            .ok_or(ResolveError::MissingGivenPath(APP_PACKAGE_JSON))?;
        let manifest_file = &self.settings.manifest.file;
        let property = &self.settings.manifest.property;

        self.reporter.action(&format!("Checking for {}...", manifest_file));
        if !self.store.exists(manifest_path) {
            tracing::info!(path = %manifest_path.display(), "manifest missing");
            return Err(ResolveError::ManifestNotFound {
                path: manifest_path.to_path_buf(),
            }
            .into());
        }
        self.reporter.ok(&format!("{} detected.", manifest_file));

        let mut manifest = self.load(manifest_path)?;

        self.reporter.action("Checking for Custom Configuration Data...");
        let Some(raw) = manifest.overlay(property).cloned() else {
            if flags.needs_create {
                self.reporter.ok("No custom data detected, creating it.");
                return Err(self.create(manifest_path, &mut manifest)?);
            }
            if flags.needs_delete || flags.needs_repair {
                self.reporter.warn("No custom configuration to delete or repair.");
            }
            tracing::info!("no overlay; proceeding with given paths");
            self.reporter.info(&[
                "No custom data detected, proceeding as usual.".to_string(),
                String::new(),
                String::new(),
            ]);
            return Ok(Resolution::Passthrough);
        };

        if flags.needs_delete {
            self.reporter.ok("Custom Configuration detected, deleting it.");
            return Err(self.remove(manifest_path, &mut manifest, AdminAction::Deleted)?);
        }
        if flags.needs_repair {
            return Err(self.remove(manifest_path, &mut manifest, AdminAction::Repaired)?);
        }
        if flags.needs_create {
            self.reporter
                .warn("Custom configuration already exists; ignoring create request.");
        }

        self.reporter.ok("Custom configuration detected.");
        self.validate(given, &raw).map(Resolution::Merged)
    }

    fn load(&self, path: &Path) -> Result<ManifestRecord, Halt> {
        use crate::manifest::ManifestError;

        self.store.read(path).map_err(|e| -> Halt {
            match e {
                ManifestError::NotFound(path) => ResolveError::ManifestNotFound { path }.into(),
                other => other.into(),
            }
        })
    }

    fn create(&self, path: &Path, manifest: &mut ManifestRecord) -> Result<Halt, Halt> {
        self.reporter.action("Creating Custom Configuration...");
        manifest.set_overlay(&self.settings.manifest.property, defaults().to_value());
        self.store.write(path, manifest)?;
        tracing::info!(path = %path.display(), "overlay created");
        self.reporter.ok("Custom Configuration Created.");
        Ok(Halt::Administered(AdminAction::Created))
    }

    fn remove(
        &self,
        path: &Path,
        manifest: &mut ManifestRecord,
        action: AdminAction,
    ) -> Result<Halt, Halt> {
        self.reporter.action("Deleting Custom Configuration...");
        manifest.remove_overlay(&self.settings.manifest.property);
        self.store.write(path, manifest)?;
        tracing::info!(path = %path.display(), action = action.as_str(), "overlay removed");
        self.reporter.ok("Custom Configuration Deleted.");
        Ok(Halt::Administered(action))
    }

    fn validate(&self, given: &GivenPaths, raw: &serde_json::Value) -> Result<ResolvedPaths, Halt> {
        let key_check = self.settings.validation.key_check;
        let parsed = OverlayRecord::from_value(raw, key_check)?;
        tracing::debug!(
            key_check = key_check.as_str(),
            keys = parsed.entries.len(),
            "overlay shape ok"
        );
        for key in &parsed.unrecognized {
            self.reporter.warn(&format!(
                "Custom configuration key {} is not a known path; resolving it as given",
                key
            ));
        }

        let root = given
            .project_root()
            .ok_or(ResolveError::MissingGivenPath(APP_PATH))?;
        let (valid, invalid) = classify(root, parsed.overrides(), |p| p.exists());

        if !invalid.is_empty() {
            tracing::info!(count = invalid.len(), "overlay has invalid paths");
            return Err(ResolveError::OverlayPathInvalid { paths: invalid }.into());
        }

        tracing::info!(overrides = valid.len(), "overlay validated");
        self.reporter.ok("Valid configuration detected.");
        self.reporter.info(&[String::new(), String::new()]);
        Ok(given.overridden_by(valid))
    }
}

/// Split non-empty overlay entries into existing and missing paths.
///
/// Existing entries are returned keyed by their overlay key; missing ones
/// as the resolved absolute path. Both keep the order of `overrides`.
fn classify<'a>(
    root: &Path,
    overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    exists: impl Fn(&Path) -> bool,
) -> (Vec<(String, PathBuf)>, Vec<PathBuf>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for (key, value) in overrides {
        let resolved = resolve_relative(root, value);
        if exists(&resolved) {
            valid.push((key.to_string(), resolved));
        } else {
            invalid.push(resolved);
        }
    }
    (valid, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use custom_config_schema::{Configurable, KeyCheck};
    use serde_json::json;

    #[test]
    fn test_classify_splits_existing_and_missing() {
        let record = OverlayRecord::default()
            .with(Configurable::AppHtml, "public/index.html")
            .with(Configurable::WebpackFile, "missing/webpack.js");
        let parsed = OverlayRecord::from_value(&record.to_value(), KeyCheck::Exact).unwrap();

        let (valid, invalid) = classify(Path::new("/app"), parsed.overrides(), |p| {
            p == Path::new("/app/public/index.html")
        });

        assert_eq!(
            valid,
            vec![("appHtml".to_string(), PathBuf::from("/app/public/index.html"))]
        );
        assert_eq!(invalid, vec![PathBuf::from("/app/missing/webpack.js")]);
    }

    #[test]
    fn test_classify_empty_overlay() {
        let parsed = OverlayRecord::from_value(&defaults().to_value(), KeyCheck::Exact).unwrap();
        let (valid, invalid) = classify(Path::new("/app"), parsed.overrides(), |_| {
            panic!("empty values are never resolved")
        });
        assert!(valid.is_empty());
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_classify_reports_missing_in_overlay_order() {
        let overlay = json!({
            "postCompileScript": "z.js",
            "appPath": "",
            "appBuild": "a",
            "appPublic": "",
            "appHtml": "",
            "appIndexJs": "",
            "appTsConfig": "",
            "appJsConfig": "",
            "webpackFile": "",
            "preCompileScript": ""
        });
        let parsed = OverlayRecord::from_value(&overlay, KeyCheck::Exact).unwrap();
        let (valid, invalid) = classify(Path::new("/app"), parsed.overrides(), |_| false);
        assert!(valid.is_empty());
        assert_eq!(
            invalid,
            vec![PathBuf::from("/app/z.js"), PathBuf::from("/app/a")]
        );
    }
}
