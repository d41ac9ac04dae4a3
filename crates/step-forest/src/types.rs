//! Node link traits and small shared value types.
//!
//! Each engine keeps its nodes in a `Vec` arena and links them through
//! `Option<u32>` indices. Tree manipulation helpers in [`crate::util`] take the
//! arena as a slice and work purely with indices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ParseError;
use crate::step::NodeSnapshot;

/// Values stored by every engine.
pub type Value = i64;

/// Parent / left / right links.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// A linked node that can be rendered into a [`NodeSnapshot`].
pub trait StepNode: Node {
    fn id(&self) -> NodeId;
    fn value(&self) -> Value;
    fn set_value(&mut self, value: Value);

    /// Adds engine-specific fields (color, height, balance factor).
    fn decorate(&self, _snapshot: &mut NodeSnapshot) {}
}

/// Stable visual identity of a node, rendered as `"{prefix}-{seq}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    prefix: &'static str,
    seq: u32,
}

impl NodeId {
    pub const fn new(prefix: &'static str, seq: u32) -> Self {
        Self { prefix, seq }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.seq)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-instance node id generator. Reset by the owning engine's `clear()`.
#[derive(Clone, Debug)]
pub(crate) struct IdGen {
    prefix: &'static str,
    next: u32,
}

impl IdGen {
    pub(crate) const fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.prefix, self.next);
        self.next += 1;
        id
    }

    pub(crate) fn reset(&mut self) {
        self.next = 0;
    }
}

/// Red-black node color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering mode of a [`crate::Heap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapKind {
    #[default]
    Min,
    Max,
}

impl HeapKind {
    /// `true` when `a` belongs above `b`.
    #[inline]
    pub fn prefers(&self, a: Value, b: Value) -> bool {
        match self {
            HeapKind::Min => a < b,
            HeapKind::Max => a > b,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeapKind::Min => "Min",
            HeapKind::Max => "Max",
        }
    }

    pub(crate) fn extreme(&self) -> &'static str {
        match self {
            HeapKind::Min => "minimum",
            HeapKind::Max => "maximum",
        }
    }

    pub(crate) fn operator(&self) -> &'static str {
        match self {
            HeapKind::Min => "<",
            HeapKind::Max => ">",
        }
    }
}

impl FromStr for HeapKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(HeapKind::Min),
            "max" => Ok(HeapKind::Max),
            _ => Err(ParseError::HeapKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_renders_prefix_and_sequence() {
        let mut ids = IdGen::new("avl");
        assert_eq!(ids.next_id().to_string(), "avl-0");
        assert_eq!(ids.next_id().to_string(), "avl-1");
        ids.reset();
        assert_eq!(ids.next_id(), NodeId::new("avl", 0));
    }

    #[test]
    fn heap_kind_parses_case_insensitively() {
        assert_eq!("MAX".parse::<HeapKind>(), Ok(HeapKind::Max));
        assert_eq!(" min ".parse::<HeapKind>(), Ok(HeapKind::Min));
        assert_eq!(
            "median".parse::<HeapKind>(),
            Err(ParseError::HeapKind("median".to_string()))
        );
    }
}
