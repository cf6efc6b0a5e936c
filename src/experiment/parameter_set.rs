//! Parameter set - opaque nested mapping read from an experiment's params file

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of one experiment: group name → parameter name → value.
///
/// No schema is enforced; the mapping is passed through as-is and serializes
/// as a plain JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ParameterSet(Map<String, Value>);

impl ParameterSet {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    ///
    /// Returns `None` for any other JSON type.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Parse YAML text (the on-disk format of `params.yaml`).
    ///
    /// An empty document yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns the YAML error text if the document does not parse or its root
    /// is not a mapping.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        Self::from_value(value).ok_or_else(|| "root of the document is not a mapping".to_string())
    }

    /// Render as YAML text.
    ///
    /// # Errors
    ///
    /// Returns the YAML error text if serialization fails.
    pub fn to_yaml_string(&self) -> std::result::Result<String, String> {
        serde_yaml::to_string(&self.0).map_err(|e| e.to_string())
    }

    /// Get a parameter group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Map<String, Value>> {
        self.0.get(name).and_then(Value::as_object)
    }

    /// Number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
