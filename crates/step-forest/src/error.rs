use thiserror::Error;

use crate::types::Value;

/// Failure to read an enum-like option from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown traversal order: {0}")]
    Traversal(String),
    #[error("unknown heap kind: {0}")]
    HeapKind(String),
}

/// A structural property an engine is expected to hold does not hold.
///
/// Returned by the `assert_valid()` validators. Red-black removal uses the
/// label from [`InvariantError::rule`] to flag the properties it may break.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("root has a parent link")]
    RootHasParent,
    #[error("broken parent link below node {0}")]
    BrokenParentLink(Value),
    #[error("ordering violated at node {0}")]
    OrderViolated(Value),
    #[error("cached height of node {value} is {cached}, actual height is {actual}")]
    StaleHeight {
        value: Value,
        cached: i32,
        actual: i32,
    },
    #[error("cached balance factor of node {value} is {cached}, actual factor is {actual}")]
    StaleBalance {
        value: Value,
        cached: i32,
        actual: i32,
    },
    #[error("node {value} is out of balance (factor {balance_factor})")]
    Unbalanced { value: Value, balance_factor: i32 },
    #[error("root is not black")]
    RedRoot,
    #[error("red node {0} has a red child")]
    RedRed(Value),
    #[error("black height differs between the subtrees of node {0}")]
    BlackHeight(Value),
    #[error("heap order violated between index {parent} and index {child}")]
    HeapOrder { parent: usize, child: usize },
}

impl InvariantError {
    /// Short rule label suitable for a step's `rule_broken` field.
    pub fn rule(&self) -> &'static str {
        match self {
            InvariantError::RootHasParent | InvariantError::BrokenParentLink(_) => {
                "Parent and child links must agree"
            }
            InvariantError::OrderViolated(_) => "BST ordering",
            InvariantError::StaleHeight { .. } | InvariantError::StaleBalance { .. } => {
                "AVL height bookkeeping"
            }
            InvariantError::Unbalanced { .. } => "AVL balance factor must stay within [-1, 1]",
            InvariantError::RedRoot => "Root must be black",
            InvariantError::RedRed(_) => "A red node cannot have a red child",
            InvariantError::BlackHeight(_) => {
                "Every root-to-leaf path must have the same number of black nodes"
            }
            InvariantError::HeapOrder { .. } => "Heap order",
        }
    }
}
