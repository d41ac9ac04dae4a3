//! Step records and tree snapshots handed to the presentation layer.
//!
//! Everything here is plain owned data. Once an engine returns a step, the
//! step has no further connection to the engine.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::traversal::TraversalKind;
use crate::types::{Color, HeapKind, NodeId, Value};

/// Which public operation produced a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Remove,
    Search,
    Traverse,
    Sort,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Remove => "remove",
            OperationKind::Search => "search",
            OperationKind::Traverse => "traverse",
            OperationKind::Sort => "sort",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

/// Directed edge between two nodes, rendered `"{from}->{to}"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub from: NodeId,
    pub to: NodeId,
}

impl EdgeId {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Acyclic copy of a (sub)tree. Never carries a parent link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<NodeSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<NodeSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_factor: Option<i32>,
}

impl NodeSnapshot {
    pub fn new(id: NodeId, value: Value) -> Self {
        Self {
            id,
            value,
            left: None,
            right: None,
            color: None,
            height: None,
            balance_factor: None,
        }
    }

    pub fn left(&self) -> Option<&NodeSnapshot> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&NodeSnapshot> {
        self.right.as_deref()
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.left().map_or(0, NodeSnapshot::len) + self.right().map_or(0, NodeSnapshot::len)
    }

    /// Always `false`; a snapshot holds at least its own node.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Height of this subtree, a leaf being `0`.
    pub fn depth(&self) -> i32 {
        1 + self
            .left()
            .map_or(-1, NodeSnapshot::depth)
            .max(self.right().map_or(-1, NodeSnapshot::depth))
    }

    pub fn inorder(&self) -> Vec<Value> {
        fn walk(node: Option<&NodeSnapshot>, out: &mut Vec<Value>) {
            if let Some(n) = node {
                walk(n.left(), out);
                out.push(n.value);
                walk(n.right(), out);
            }
        }
        let mut out = Vec::new();
        walk(Some(self), &mut out);
        out
    }

    /// First node with `value` in preorder.
    pub fn find(&self, value: Value) -> Option<&NodeSnapshot> {
        if self.value == value {
            return Some(self);
        }
        self.left()
            .and_then(|l| l.find(value))
            .or_else(|| self.right().and_then(|r| r.find(value)))
    }

    fn label(&self) -> String {
        let mut label = self.value.to_string();
        if let Some(color) = self.color {
            label.push_str(&format!(" ({color})"));
        }
        if let (Some(height), Some(bf)) = (self.height, self.balance_factor) {
            label.push_str(&format!(" (h={height}, bf={bf})"));
        }
        label
    }

    /// Renders the subtree with `├─`/`└─` branches, children tagged `←`/`→`.
    pub fn render(&self, tab: &str) -> String {
        let mut out = self.label();
        let children: Vec<(&str, &NodeSnapshot)> = [("←", self.left()), ("→", self.right())]
            .into_iter()
            .filter_map(|(side, child)| child.map(|c| (side, c)))
            .collect();
        let last = children.len().saturating_sub(1);
        for (i, (side, child)) in children.into_iter().enumerate() {
            let is_last = i == last;
            let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
            out.push('\n');
            out.push_str(tab);
            out.push_str(if is_last { "└─ " } else { "├─ " });
            out.push_str(side);
            out.push(' ');
            out.push_str(&child.render(&child_tab));
        }
        out
    }
}

impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Outcome of comparing a search target with a visited node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Left,
    Right,
    Match,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoveCase {
    Found,
    NotFound,
    Leaf,
    SingleChild,
    TwoChildren,
    SuccessorLeaf,
    SuccessorSingleChild,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImbalanceCase {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
}

impl ImbalanceCase {
    pub fn label(&self) -> &'static str {
        match self {
            ImbalanceCase::LeftLeft => "Left-Left",
            ImbalanceCase::RightRight => "Right-Right",
            ImbalanceCase::LeftRight => "Left-Right",
            ImbalanceCase::RightLeft => "Right-Left",
        }
    }
}

/// Red-black insert fix-up cases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixupCase {
    UncleRed,
    Triangle,
    Line,
    RootBlack,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMeta {
    pub inserted_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub became_root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMeta {
    pub case: RemoveCase,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub successor: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_child: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub target: Value,
    pub path_sequence: Vec<Value>,
    pub iteration: usize,
    pub visited_count: usize,
    pub complexity: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_factor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_index: Option<usize>,
}

impl SearchMeta {
    pub fn new(target: Value, complexity: &'static str) -> Self {
        Self {
            target,
            path_sequence: Vec::new(),
            iteration: 0,
            visited_count: 0,
            complexity,
            comparison: None,
            found: None,
            total_iterations: None,
            balance_factor: None,
            color: None,
            current_index: None,
            found_index: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraverseMeta {
    pub traversal: TraversalKind,
    pub order_snapshot: Vec<Value>,
    pub current: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceMeta {
    pub value: Value,
    pub height: i32,
    pub balance_factor: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imbalance: Option<ImbalanceCase>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationMeta {
    pub rotation: Direction,
    /// Value of the node that moved down.
    pub pivot: Value,
    /// Value of the node that took its place.
    pub promoted: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecolorMeta {
    pub case: FixupCase,
    pub node: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncle: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grandparent: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeapMeta {
    pub heap_kind: HeapKind,
    pub value: Value,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swapped_with: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortMeta {
    pub heap_kind: HeapKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<Value>,
    pub remaining: usize,
}

/// Structured per-step payload, one variant per concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepMeta {
    Insert(InsertMeta),
    Duplicate { value: Value },
    Remove(RemoveMeta),
    Search(SearchMeta),
    Traverse(TraverseMeta),
    Balance(BalanceMeta),
    Rotation(RotationMeta),
    Recolor(RecolorMeta),
    Heap(HeapMeta),
    Sort(SortMeta),
}

/// One immutable frame of an operation's execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub description: String,
    pub tree: Option<NodeSnapshot>,
    pub highlighted_nodes: Vec<NodeId>,
    pub highlighted_edges: Vec<EdgeId>,
    pub explanation: String,
    pub timestamp: u64,
    pub notes: Vec<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_broken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StepMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted_elements: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_snapshot: Option<Vec<Value>>,
}

impl Step {
    pub fn search_meta(&self) -> Option<&SearchMeta> {
        match &self.metadata {
            Some(StepMeta::Search(meta)) => Some(meta),
            _ => None,
        }
    }

    pub fn rotation_meta(&self) -> Option<&RotationMeta> {
        match &self.metadata {
            Some(StepMeta::Rotation(meta)) => Some(meta),
            _ => None,
        }
    }

    pub fn remove_meta(&self) -> Option<&RemoveMeta> {
        match &self.metadata {
            Some(StepMeta::Remove(meta)) => Some(meta),
            _ => None,
        }
    }
}
