//! Administrative flag lookup.
//!
//! Flags can arrive through the tool's own argument list or, when launched
//! from an npm script, through the `npm_config_argv` environment variable.

use serde::Deserialize;

/// Create the overlay with empty defaults.
pub const CREATE_FLAG: &str = "createCustomConfiguration";

/// Remove the overlay.
pub const DELETE_FLAG: &str = "deleteCustomConfiguration";

/// Remove the overlay so it can be recreated.
pub const REPAIR_FLAG: &str = "repairCustomConfiguration";

/// Environment variable npm uses to pass the original invocation.
pub const NPM_CONFIG_ARGV: &str = "npm_config_argv";

/// Answers whether a named flag was supplied to this invocation.
pub trait OptionSource {
    fn has_flag(&self, name: &str) -> bool;
}

impl<T: OptionSource + ?Sized> OptionSource for &T {
    fn has_flag(&self, name: &str) -> bool {
        (**self).has_flag(name)
    }
}

impl<T: OptionSource + ?Sized> OptionSource for Box<T> {
    fn has_flag(&self, name: &str) -> bool {
        (**self).has_flag(name)
    }
}

/// Administrative flags read once at the start of a resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminFlags {
    pub needs_delete: bool,
    pub needs_create: bool,
    pub needs_repair: bool,
}

impl AdminFlags {
    pub fn read(source: &impl OptionSource) -> Self {
        Self {
            needs_delete: source.has_flag(DELETE_FLAG),
            needs_create: source.has_flag(CREATE_FLAG),
            needs_repair: source.has_flag(REPAIR_FLAG),
        }
    }
}

/// Matches `--<name>` in a list of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgList(Vec<String>);

impl ArgList {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    /// Append `--<name>` when `set` is true.
    pub fn with_flag(mut self, name: &str, set: bool) -> Self {
        if set {
            self.0.push(format!("--{}", name));
        }
        self
    }
}

impl OptionSource for ArgList {
    fn has_flag(&self, name: &str) -> bool {
        let wanted = format!("--{}", name);
        self.0.iter().any(|a| *a == wanted)
    }
}

/// Invocation recorded by npm in `npm_config_argv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NpmConfigArgv {
    /// Arguments after npm's own expansion.
    #[serde(default)]
    pub cooked: Vec<String>,

    /// Arguments exactly as typed.
    #[serde(default)]
    pub original: Vec<String>,
}

impl NpmConfigArgv {
    pub fn parse(json: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(json).map_err(|e| OptionsError::NpmArgv(e.to_string()))
    }

    /// Read from the environment. `Ok(None)` when the variable is unset.
    pub fn from_env() -> Result<Option<Self>, OptionsError> {
        match std::env::var(NPM_CONFIG_ARGV) {
            Ok(raw) => Self::parse(&raw).map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(OptionsError::NpmArgv(e.to_string())),
        }
    }
}

impl OptionSource for NpmConfigArgv {
    fn has_flag(&self, name: &str) -> bool {
        let wanted = format!("--{}", name);
        self.cooked.iter().chain(&self.original).any(|a| *a == wanted)
    }
}

/// True when any inner source has the flag.
#[derive(Default)]
pub struct AnyOf(Vec<Box<dyn OptionSource>>);

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl OptionSource + 'static) -> Self {
        self.0.push(Box::new(source));
        self
    }
}

impl OptionSource for AnyOf {
    fn has_flag(&self, name: &str) -> bool {
        self.0.iter().any(|s| s.has_flag(name))
    }
}

/// Option source errors
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("Invalid npm_config_argv: {0}")]
    NpmArgv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_list_exact_match() {
        let args = ArgList::new(["--deleteCustomConfiguration", "start"]);
        assert!(args.has_flag(DELETE_FLAG));
        assert!(!args.has_flag(CREATE_FLAG));
        assert!(!ArgList::new(["deleteCustomConfiguration"]).has_flag(DELETE_FLAG));
    }

    #[test]
    fn test_with_flag() {
        let args = ArgList::default()
            .with_flag(CREATE_FLAG, true)
            .with_flag(REPAIR_FLAG, false);
        assert_eq!(
            AdminFlags::read(&args),
            AdminFlags {
                needs_create: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_npm_argv_matches_either_list() {
        let argv = NpmConfigArgv::parse(
            r#"{"remain":[],"cooked":["run","start"],"original":["start","--repairCustomConfiguration"]}"#,
        )
        .unwrap();
        assert!(argv.has_flag(REPAIR_FLAG));
        assert!(!argv.has_flag(DELETE_FLAG));

        let cooked_only =
            NpmConfigArgv::parse(r#"{"cooked":["--createCustomConfiguration"]}"#).unwrap();
        assert!(cooked_only.has_flag(CREATE_FLAG));
    }

    #[test]
    fn test_npm_argv_invalid_json() {
        assert!(NpmConfigArgv::parse("not json").is_err());
    }

    #[test]
    fn test_any_of() {
        let source = AnyOf::new()
            .with(ArgList::new(["--createCustomConfiguration"]))
            .with(NpmConfigArgv {
                cooked: vec![],
                original: vec!["--deleteCustomConfiguration".to_string()],
            });
        let flags = AdminFlags::read(&source);
        assert!(flags.needs_create);
        assert!(flags.needs_delete);
        assert!(!flags.needs_repair);
        assert_eq!(AdminFlags::read(&AnyOf::new()), AdminFlags::default());
    }
}
