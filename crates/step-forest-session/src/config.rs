use serde::{Deserialize, Serialize};
use step_forest::{HeapKind, TraversalKind, Value};

use crate::error::SessionError;

/// Inclusive range of values a session accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: Value,
    pub max: Value,
}

impl ValueBounds {
    pub fn contains(&self, value: Value) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ValueBounds {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ordering mode the heap starts in.
    pub heap_kind: HeapKind,
    /// Order used when a traverse call names none.
    pub default_traversal: TraversalKind,
    /// `None` accepts any value.
    pub value_bounds: Option<ValueBounds>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heap_kind: HeapKind::Min,
            default_traversal: TraversalKind::Inorder,
            value_bounds: Some(ValueBounds::default()),
        }
    }
}

impl SessionConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, SessionError> {
        let config: SessionConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        match self.value_bounds {
            Some(ValueBounds { min, max }) if min > max => {
                Err(SessionError::InvalidBounds { min, max })
            }
            _ => Ok(()),
        }
    }

    pub fn check_value(&self, value: Value) -> Result<(), SessionError> {
        match self.value_bounds {
            Some(bounds) if !bounds.contains(value) => Err(SessionError::OutOfRange {
                value,
                min: bounds.min,
                max: bounds.max,
            }),
            _ => Ok(()),
        }
    }
}
