//! Project path maps.
//!
//! A [`PathMap`] is the caller-supplied default layout ([`GivenPaths`]) and,
//! after resolution, the customized layout ([`ResolvedPaths`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Key holding the project root; base for every relative overlay path.
pub const APP_PATH: &str = "appPath";

/// Key holding the manifest location.
pub const APP_PACKAGE_JSON: &str = "appPackageJson";

/// Conventional project layout, relative to the project root.
const PROJECT_LAYOUT: &[(&str, &str)] = &[
    ("appBuild", "build"),
    ("appPublic", "public"),
    ("appHtml", "public/index.html"),
    ("appIndexJs", "src/index.js"),
    ("appSrc", "src"),
    ("appTsConfig", "tsconfig.json"),
    ("appJsConfig", "jsconfig.json"),
    ("appNodeModules", "node_modules"),
    ("yarnLockFile", "yarn.lock"),
    ("testsSetup", "src/setupTests"),
    ("proxySetup", "src/setupProxy.js"),
    ("dotenv", ".env"),
];

/// Key → absolute path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathMap(BTreeMap<String, PathBuf>);

/// Default paths computed by the tool before customization.
pub type GivenPaths = PathMap;

/// Given paths with valid overlay entries applied.
pub type ResolvedPaths = PathMap;

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventional layout for a project rooted at `root`.
    ///
    /// `root` should already be absolute; see [`absolutize`].
    pub fn for_project(root: &Path, manifest_file: &str) -> Self {
        let mut map = Self::new();
        map.insert(APP_PATH, root);
        map.insert(APP_PACKAGE_JSON, root.join(manifest_file));
        for (key, rel) in PROJECT_LAYOUT {
            map.insert(*key, root.join(rel));
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&Path> {
        self.0.get(key).map(PathBuf::as_path)
    }

    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Option<PathBuf> {
        self.0.insert(key.into(), path.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// The project root (`appPath`).
    pub fn project_root(&self) -> Option<&Path> {
        self.get(APP_PATH)
    }

    /// The manifest location (`appPackageJson`).
    pub fn manifest_path(&self) -> Option<&Path> {
        self.get(APP_PACKAGE_JSON)
    }

    /// Copy of this map with `overrides` applied on top.
    pub fn overridden_by<I, K>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, PathBuf)>,
        K: Into<String>,
    {
        let mut merged = self.clone();
        for (key, path) in overrides {
            merged.insert(key, path);
        }
        merged
    }

    /// Keys whose value differs from (or is absent in) `base`.
    pub fn changed_keys(&self, base: &PathMap) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| base.0.get(k.as_str()) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl<K: Into<String>, P: Into<PathBuf>> FromIterator<(K, P)> for PathMap {
    fn from_iter<T: IntoIterator<Item = (K, P)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, p)| (k.into(), p.into())).collect())
    }
}

/// Resolve `relative` against `base`, normalizing `.` and `..` lexically.
///
/// An absolute `relative` replaces `base`. Symlinks are not followed.
pub fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
    normalize(&base.join(relative))
}

/// Make `path` absolute against the current directory and normalize it.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(path)))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_joins_and_normalizes() {
        let base = Path::new("/work/app");
        assert_eq!(
            resolve_relative(base, "public/index.html"),
            PathBuf::from("/work/app/public/index.html")
        );
        assert_eq!(
            resolve_relative(base, "./config/../dist/"),
            PathBuf::from("/work/app/dist")
        );
        assert_eq!(
            resolve_relative(base, "../shared/webpack.js"),
            PathBuf::from("/work/shared/webpack.js")
        );
    }

    #[test]
    fn test_resolve_absolute_value_replaces_base() {
        assert_eq!(
            resolve_relative(Path::new("/work/app"), "/opt/tpl/index.html"),
            PathBuf::from("/opt/tpl/index.html")
        );
    }

    #[test]
    fn test_parent_above_root_stays_at_root() {
        assert_eq!(resolve_relative(Path::new("/"), "../../etc"), PathBuf::from("/etc"));
    }

    #[test]
    fn test_for_project_layout() {
        let paths = PathMap::for_project(Path::new("/work/app"), "package.json");
        assert_eq!(paths.project_root(), Some(Path::new("/work/app")));
        assert_eq!(
            paths.manifest_path(),
            Some(Path::new("/work/app/package.json"))
        );
        assert_eq!(
            paths.get("appHtml"),
            Some(Path::new("/work/app/public/index.html"))
        );
        assert!(!paths.contains_key("webpackFile"));
    }

    #[test]
    fn test_overridden_by_and_changed_keys() {
        let given: PathMap = [("appPath", "/a"), ("appBuild", "/a/build")]
            .into_iter()
            .collect();
        let merged = given.overridden_by([
            ("appBuild", PathBuf::from("/a/dist")),
            ("webpackFile", PathBuf::from("/a/webpack.js")),
        ]);

        assert_eq!(merged.get("appBuild"), Some(Path::new("/a/dist")));
        assert_eq!(merged.get("appPath"), Some(Path::new("/a")));
        assert_eq!(given.get("appBuild"), Some(Path::new("/a/build")));
        assert_eq!(
            merged.changed_keys(&given),
            vec!["appBuild".to_string(), "webpackFile".to_string()]
        );
    }

    #[test]
    fn test_absolutize_relative_uses_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("./x/../y")).unwrap(), cwd.join("y"));
    }
}
