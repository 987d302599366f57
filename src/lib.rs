//! custom-config - project path overlays for the build tool
//!
//! Reads the custom configuration overlay embedded in a project's
//! `package.json`, validates it against the configurable schema, and merges
//! it over the tool's default paths. Also creates, deletes and repairs the
//! overlay on request.

pub mod config;
pub mod manifest;
pub mod options;
pub mod paths;
pub mod reporter;
pub mod resolver;

pub use config::{EffectiveConfig, Settings};
pub use custom_config_schema::{Configurable, KeyCheck, OverlayRecord};
pub use manifest::{JsonManifestStore, ManifestRecord, ManifestStore};
pub use options::{AdminFlags, OptionSource};
pub use paths::{GivenPaths, PathMap, ResolvedPaths};
pub use reporter::{ConsoleReporter, Reporter};
pub use resolver::{AdminAction, Halt, OverlayResolver, ResolutionReport, ResolveError};
