//! Overlay shape errors.

/// Reasons an overlay record does not match the configurable schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Overlay must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error(
        "Overlay has {found} keys, expected {expected} (missing: [{}], unknown: [{}])",
        .missing.join(", "),
        .unknown.join(", ")
    )]
    Malformed {
        expected: usize,
        found: usize,
        missing: Vec<String>,
        unknown: Vec<String>,
    },

    #[error("Overlay key {key} must be a string, found {found}")]
    NonStringValue { key: String, found: &'static str },
}

/// JSON type name used in error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
