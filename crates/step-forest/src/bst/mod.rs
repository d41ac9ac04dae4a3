//! Unbalanced binary search tree.
//!
//! Equal values are routed into the right subtree and inserted, so the tree
//! may hold duplicates. The balanced engines reject them instead.

pub mod types;

use crate::error::InvariantError;
use crate::recorder::{snapshot, StepDraft, StepRecorder};
use crate::search::{self, BST_COMPLEXITY};
use crate::step::{
    Direction, EdgeId, InsertMeta, NodeSnapshot, OperationKind, RemoveCase, RemoveMeta, Step,
    StepMeta,
};
use crate::traversal::{self, Traversal, TraversalKind};
use crate::types::{IdGen, StepNode, Value};
use crate::util::{self, get_l, get_r, set_l, set_p, set_r, value_of};

pub use types::BstNode;

const SCOPE: &str = "node";

fn remove_meta(case: RemoveCase, value: Value) -> StepMeta {
    StepMeta::Remove(RemoveMeta {
        case,
        value,
        successor: None,
        promoted_child: None,
    })
}

pub struct BinaryTree {
    nodes: Vec<BstNode>,
    root: Option<u32>,
    ids: IdGen,
    recorder: StepRecorder,
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            ids: IdGen::new(SCOPE),
            recorder: StepRecorder::new("bst"),
        }
    }

    fn record(&mut self, draft: StepDraft) -> Step {
        self.recorder.record_tree(&self.nodes, self.root, draft)
    }

    pub fn insert(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("bst insert {value}");
        let id = self.ids.next_id();
        let idx = self.nodes.len() as u32;
        self.nodes.push(BstNode::new(id, value));

        let Some(mut curr) = self.root else {
            self.root = Some(idx);
            let step = self.record(
                StepDraft::new(OperationKind::Insert, format!("Insert {value} as root"))
                    .highlight(id)
                    .explain(format!("Node {value} inserted as root"))
                    .note("The tree was empty")
                    .note("The first value always becomes the root")
                    .meta(StepMeta::Insert(InsertMeta {
                        inserted_value: value,
                        parent_value: None,
                        direction: None,
                        became_root: true,
                        color: None,
                    })),
            );
            return vec![step];
        };

        let direction = loop {
            let direction = if value < value_of(&self.nodes, curr) {
                Direction::Left
            } else {
                Direction::Right
            };
            let next = match direction {
                Direction::Left => get_l(&self.nodes, curr),
                Direction::Right => get_r(&self.nodes, curr),
            };
            match next {
                Some(n) => curr = n,
                None => break direction,
            }
        };
        set_p(&mut self.nodes, idx, Some(curr));
        match direction {
            Direction::Left => set_l(&mut self.nodes, curr, Some(idx)),
            Direction::Right => set_r(&mut self.nodes, curr, Some(idx)),
        }

        let parent = &self.nodes[curr as usize];
        let (parent_id, parent_value) = (parent.id, parent.v);
        let side = direction.as_str();
        let reason = match direction {
            Direction::Left => "Smaller, so the new node goes into the left subtree",
            Direction::Right => "Greater or equal, so the new node goes into the right subtree",
        };
        let step = self.record(
            StepDraft::new(
                OperationKind::Insert,
                format!("Insert {value} to the {side} of {parent_value}"),
            )
            .highlight(id)
            .edge(EdgeId::new(parent_id, id))
            .explain(format!("Node {value} inserted on the {side}"))
            .note(format!("Comparing {value} with {parent_value}"))
            .note(reason)
            .meta(StepMeta::Insert(InsertMeta {
                inserted_value: value,
                parent_value: Some(parent_value),
                direction: Some(direction),
                became_root: false,
                color: None,
            })),
        );
        tracing::debug!("bst insert {value}: 1 step");
        vec![step]
    }

    pub fn remove(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("bst remove {value}");
        let mut steps = Vec::new();

        let Some(target) = util::find(&self.nodes, self.root, value) else {
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Remove, format!("Value {value} not found"))
                        .explain("The value does not exist in the tree")
                        .note("Walked the tree without locating the value")
                        .note(format!("Searched value: {value}"))
                        .warning()
                        .meta(remove_meta(RemoveCase::NotFound, value)),
                ),
            );
            return steps;
        };

        let target_id = self.nodes[target as usize].id;
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("Found node with value {value}"))
                    .highlight(target_id)
                    .explain(format!("Removing node {value}"))
                    .note("Located the target node")
                    .note("Next: identify which removal case applies")
                    .meta(remove_meta(RemoveCase::Found, value)),
            ),
        );

        match (get_l(&self.nodes, target), get_r(&self.nodes, target)) {
            (None, None) => {
                util::transplant(&mut self.nodes, &mut self.root, target, None);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("Node {value} removed (it was a leaf)"),
                        )
                        .explain("Leaf node removed")
                        .note("A leaf can be detached without touching any other node")
                        .meta(remove_meta(RemoveCase::Leaf, value)),
                    ),
                );
            }
            (Some(child), None) | (None, Some(child)) => {
                let promoted = value_of(&self.nodes, child);
                let promoted_id = self.nodes[child as usize].id;
                util::transplant(&mut self.nodes, &mut self.root, target, Some(child));
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("Node {value} removed (one child)"),
                        )
                        .highlight(promoted_id)
                        .explain("Node with a single child removed")
                        .note("The only child is promoted to keep the BST property")
                        .meta(StepMeta::Remove(RemoveMeta {
                            case: RemoveCase::SingleChild,
                            value,
                            successor: None,
                            promoted_child: Some(promoted),
                        })),
                    ),
                );
            }
            (Some(_), Some(right)) => {
                let mut succ = right;
                while let Some(l) = get_l(&self.nodes, succ) {
                    succ = l;
                }
                let succ_value = value_of(&self.nodes, succ);
                let succ_id = self.nodes[succ as usize].id;
                let two_children = StepMeta::Remove(RemoveMeta {
                    case: RemoveCase::TwoChildren,
                    value,
                    successor: Some(succ_value),
                    promoted_child: None,
                });
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("Inorder successor found: {succ_value}"),
                        )
                        .highlight(succ_id)
                        .explain("Looking up the inorder successor")
                        .note("With two children, the smallest value of the right subtree is copied up")
                        .meta(two_children.clone()),
                    ),
                );

                self.nodes[target as usize].set_value(succ_value);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("Replacing value with {succ_value}"),
                        )
                        .highlight(target_id)
                        .explain("The successor's value is copied into the target before the successor is removed")
                        .note("Only the value moves, the structure stays")
                        .note("Next: remove the duplicated successor")
                        .meta(two_children),
                    ),
                );

                steps.push(self.remove_successor(succ));
            }
        }

        tracing::debug!("bst remove {value}: {} steps", steps.len());
        steps
    }

    /// Detaches the inorder successor, which never has a left child.
    fn remove_successor(&mut self, succ: u32) -> Step {
        let succ_value = value_of(&self.nodes, succ);
        let child = get_r(&self.nodes, succ);
        util::transplant(&mut self.nodes, &mut self.root, succ, child);
        match child {
            None => self.record(
                StepDraft::new(
                    OperationKind::Remove,
                    format!("Removing helper node {succ_value} (leaf)"),
                )
                .explain("The successor has no children, so it is simply detached")
                .note("This node was the inorder successor")
                .note("Being a leaf, it only needs to be disconnected")
                .meta(remove_meta(RemoveCase::SuccessorLeaf, succ_value)),
            ),
            Some(c) => {
                let promoted = value_of(&self.nodes, c);
                let promoted_id = self.nodes[c as usize].id;
                self.record(
                    StepDraft::new(
                        OperationKind::Remove,
                        format!("Removing helper node {succ_value} (one child)"),
                    )
                    .highlight(promoted_id)
                    .explain("The successor's only child takes its place")
                    .note("The successor had a single child")
                    .note("After promoting the child, the successor is gone")
                    .meta(StepMeta::Remove(RemoveMeta {
                        case: RemoveCase::SuccessorSingleChild,
                        value: succ_value,
                        successor: None,
                        promoted_child: Some(promoted),
                    })),
                )
            }
        }
    }

    pub fn search(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("bst search {value}");
        search::search(
            &self.nodes,
            self.root,
            value,
            BST_COMPLEXITY,
            &mut self.recorder,
            |_, _| {},
        )
    }

    pub fn traverse(&mut self, kind: TraversalKind) -> Traversal {
        tracing::debug!("bst traverse {kind}");
        traversal::traverse(&self.nodes, self.root, kind, &mut self.recorder)
    }

    /// Drops every node and restarts node ids. Step ids keep counting.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.ids.reset();
    }

    pub fn tree(&self) -> Option<NodeSnapshot> {
        snapshot(&self.nodes, self.root)
    }

    pub fn root_value(&self) -> Option<Value> {
        self.root.map(|r| value_of(&self.nodes, r))
    }

    pub fn len(&self) -> usize {
        util::size(&self.nodes, self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Values in ascending (inorder) order.
    pub fn values(&self) -> Vec<Value> {
        util::inorder_values(&self.nodes, self.root)
    }

    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        util::assert_links_and_order(&self.nodes, self.root, true)
    }
}
