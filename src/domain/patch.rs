//! Document patch wrapper.
//!
//! Patch contents are interpreted by an external patch library at resolution
//! time; this engine only checks shape and carries them opaquely through
//! deltas.

use crate::foundation::error::SidetreeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Patch(Value);

impl Patch {
    /// Parse a patch from its JSON text. A patch is either a JSON-patch array
    /// (non-empty) or a patch-action object.
    pub fn from_json(json: &str) -> Result<Self, SidetreeError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SidetreeError> {
        match &value {
            Value::Array(entries) if !entries.is_empty() => Ok(Self(value)),
            Value::Object(_) => Ok(Self(value)),
            Value::Array(_) => Err(SidetreeError::schema("patch array must not be empty".to_string())),
            _ => Err(SidetreeError::schema("patch must be a JSON array or object".to_string())),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}
