use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::recorder::{snapshot, StepDraft, StepRecorder};
use crate::step::{OperationKind, Step, StepMeta, TraverseMeta};
use crate::types::{StepNode, Value};
use crate::util::{get_l, get_r, value_of};

/// Visiting order of a traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalKind {
    #[default]
    Inorder,
    Preorder,
    Postorder,
    Levelorder,
}

impl TraversalKind {
    pub const ALL: [TraversalKind; 4] = [
        TraversalKind::Inorder,
        TraversalKind::Preorder,
        TraversalKind::Postorder,
        TraversalKind::Levelorder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalKind::Inorder => "inorder",
            TraversalKind::Preorder => "preorder",
            TraversalKind::Postorder => "postorder",
            TraversalKind::Levelorder => "levelorder",
        }
    }

    fn note(&self) -> &'static str {
        match self {
            TraversalKind::Inorder => "Node visited after its left subtree",
            TraversalKind::Preorder => "Node visited before its children",
            TraversalKind::Postorder => "Node visited after both children",
            TraversalKind::Levelorder => "Nodes visited level by level using a queue",
        }
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inorder" | "in-order" => Ok(TraversalKind::Inorder),
            "preorder" | "pre-order" => Ok(TraversalKind::Preorder),
            "postorder" | "post-order" => Ok(TraversalKind::Postorder),
            "levelorder" | "level-order" | "level" => Ok(TraversalKind::Levelorder),
            _ => Err(ParseError::Traversal(s.to_string())),
        }
    }
}

/// Result of a traverse call: one step per visited node plus the visit order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Traversal {
    pub steps: Vec<Step>,
    pub order: Vec<Value>,
}

/// Arena indices under `root` in `kind` order.
pub(crate) fn visit_order<N: StepNode>(
    arena: &[N],
    root: Option<u32>,
    kind: TraversalKind,
) -> Vec<u32> {
    fn depth_first<N: StepNode>(
        arena: &[N],
        node: Option<u32>,
        kind: TraversalKind,
        out: &mut Vec<u32>,
    ) {
        let Some(i) = node else {
            return;
        };
        if kind == TraversalKind::Preorder {
            out.push(i);
        }
        depth_first(arena, get_l(arena, i), kind, out);
        if kind == TraversalKind::Inorder {
            out.push(i);
        }
        depth_first(arena, get_r(arena, i), kind, out);
        if kind == TraversalKind::Postorder {
            out.push(i);
        }
    }

    let mut out = Vec::new();
    if kind == TraversalKind::Levelorder {
        let mut queue: VecDeque<u32> = root.into_iter().collect();
        while let Some(i) = queue.pop_front() {
            out.push(i);
            queue.extend(get_l(arena, i));
            queue.extend(get_r(arena, i));
        }
    } else {
        depth_first(arena, root, kind, &mut out);
    }
    out
}

/// Walks the tree under `root`, recording one step per visited node.
pub(crate) fn traverse<N: StepNode>(
    arena: &[N],
    root: Option<u32>,
    kind: TraversalKind,
    recorder: &mut StepRecorder,
) -> Traversal {
    let tree = snapshot(arena, root);
    let mut result = Traversal::default();
    for idx in visit_order(arena, root, kind) {
        let value = value_of(arena, idx);
        result.order.push(value);
        let joined = join_values(&result.order, ", ");
        let step = recorder.record(
            StepDraft::new(OperationKind::Traverse, format!("Visiting {value}"))
                .tree(tree.clone())
                .highlight(arena[idx as usize].id())
                .explain(format!("{kind} traversal: visiting {value}. Order: {joined}"))
                .note(kind.note())
                .meta(StepMeta::Traverse(TraverseMeta {
                    traversal: kind,
                    order_snapshot: result.order.clone(),
                    current: value,
                })),
        );
        result.steps.push(step);
    }
    result
}

pub(crate) fn join_values(values: &[Value], sep: &str) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("InOrder".parse::<TraversalKind>(), Ok(TraversalKind::Inorder));
        assert_eq!("level-order".parse::<TraversalKind>(), Ok(TraversalKind::Levelorder));
        assert_eq!("level".parse::<TraversalKind>(), Ok(TraversalKind::Levelorder));
        assert_eq!("post-order".parse::<TraversalKind>(), Ok(TraversalKind::Postorder));
        assert_eq!(
            "zigzag".parse::<TraversalKind>(),
            Err(ParseError::Traversal("zigzag".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in TraversalKind::ALL {
            assert_eq!(kind.to_string().parse::<TraversalKind>(), Ok(kind));
        }
    }
}
