//! Shared helpers for resolver integration tests.

#![allow(dead_code)]

use custom_config::manifest::{JsonManifestStore, ManifestError, ManifestRecord, ManifestStore};
use custom_config::options::ArgList;
use custom_config::paths::GivenPaths;
use custom_config::reporter::Reporter;
use custom_config::{KeyCheck, OverlayResolver, Settings};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const OVERLAY_PROPERTY: &str = "createReactAppCustomConfig";

/// A temporary project directory with a package.json.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// Project whose manifest is `manifest`.
    pub fn with_manifest(manifest: Value) -> Self {
        let project = Self::without_manifest();
        fs::write(
            project.manifest_path(),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        project
    }

    /// Project with a plain manifest and no overlay.
    pub fn plain() -> Self {
        Self::with_manifest(json!({"name": "app", "version": "0.1.0"}))
    }

    /// Project whose manifest carries `overlay`.
    pub fn with_overlay(overlay: Value) -> Self {
        let mut manifest = json!({"name": "app", "version": "0.1.0"});
        manifest[OVERLAY_PROPERTY] = overlay;
        Self::with_manifest(manifest)
    }

    pub fn without_manifest() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("package.json")
    }

    /// Create an empty file (and its parents) relative to the root.
    pub fn touch(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    pub fn given(&self) -> GivenPaths {
        GivenPaths::for_project(self.root(), "package.json")
    }

    pub fn manifest(&self) -> Value {
        serde_json::from_str(&fs::read_to_string(self.manifest_path()).unwrap()).unwrap()
    }
}

/// Overlay with every key empty except those in `set`.
pub fn overlay(set: &[(&str, &str)]) -> Value {
    let mut value = custom_config::OverlayRecord::default().to_value();
    for (key, path) in set {
        value[*key] = json!(path);
    }
    value
}

/// Settings with console clearing off.
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.output.clear_console = false;
    settings
}

/// Reporter that records every message.
#[derive(Default)]
pub struct RecordingReporter {
    pub lines: RefCell<Vec<String>>,
    pub clears: Cell<usize>,
}

impl RecordingReporter {
    fn push(&self, kind: &str, text: &str) {
        self.lines.borrow_mut().push(format!("{}: {}", kind, text));
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    pub fn count(&self, kind: &str) -> usize {
        let prefix = format!("{}: ", kind);
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.starts_with(&prefix))
            .count()
    }
}

impl Reporter for RecordingReporter {
    fn clear(&self) {
        self.clears.set(self.clears.get() + 1);
    }

    fn action(&self, message: &str) {
        self.push("action", message);
    }

    fn info(&self, lines: &[String]) {
        for line in lines {
            self.push("info", line);
        }
    }

    fn ok(&self, message: &str) {
        self.push("ok", message);
    }

    fn warn(&self, message: &str) {
        self.push("warn", message);
    }

    fn error(&self, lines: &[String]) {
        for line in lines {
            self.push("error", line);
        }
    }

    fn fatal(&self, code: i32) -> ! {
        panic!("resolver must not terminate the process (code {})", code)
    }

    fn exit(&self, code: i32) -> ! {
        panic!("resolver must not terminate the process (code {})", code)
    }
}

/// JSON store that counts file operations.
#[derive(Default)]
pub struct CountingStore {
    inner: JsonManifestStore,
    pub exists_calls: Cell<usize>,
    pub reads: Cell<usize>,
    pub writes: Cell<usize>,
}

impl CountingStore {
    pub fn io_calls(&self) -> usize {
        self.exists_calls.get() + self.reads.get() + self.writes.get()
    }
}

impl ManifestStore for CountingStore {
    fn exists(&self, path: &Path) -> bool {
        self.exists_calls.set(self.exists_calls.get() + 1);
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<ManifestRecord, ManifestError> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read(path)
    }

    fn write(&self, path: &Path, record: &ManifestRecord) -> Result<(), ManifestError> {
        self.writes.set(self.writes.get() + 1);
        self.inner.write(path, record)
    }
}

pub type TestResolver<'a> = OverlayResolver<&'a CountingStore, ArgList, &'a RecordingReporter>;

/// Resolver over borrowed test doubles, with `flags` passed as `--<flag>`.
pub fn resolver<'a>(
    store: &'a CountingStore,
    reporter: &'a RecordingReporter,
    flags: &[&str],
) -> TestResolver<'a> {
    let args = ArgList::new(flags.iter().map(|f| format!("--{}", f)));
    OverlayResolver::new(store, args, reporter, settings())
}

/// Resolver using the count-only key check.
pub fn count_resolver<'a>(
    store: &'a CountingStore,
    reporter: &'a RecordingReporter,
) -> TestResolver<'a> {
    let mut settings = settings();
    settings.validation.key_check = KeyCheck::Count;
    OverlayResolver::new(store, ArgList::default(), reporter, settings)
}
