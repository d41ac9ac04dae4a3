use step_forest::{ParseError, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("value {value} is outside the accepted range {min}..={max}")]
    OutOfRange { value: Value, min: Value, max: Value },
    #[error("unknown tree kind: {0}")]
    UnknownTree(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid session config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid value bounds: min {min} is greater than max {max}")]
    InvalidBounds { min: Value, max: Value },
}
