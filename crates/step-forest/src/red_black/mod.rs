//! Red-black tree with step-recorded insert fix-up.
//!
//! Removal only splices nodes out of the tree and never repairs colors.
//! When a removal leaves the coloring invalid, the broken rule is reported
//! as a trailing warning step.

pub mod types;
pub mod util;

use crate::error::InvariantError;
use crate::recorder::{snapshot, StepDraft, StepRecorder};
use crate::search::{self, BALANCED_COMPLEXITY};
use crate::step::{
    Direction, EdgeId, FixupCase, InsertMeta, NodeSnapshot, OperationKind, RecolorMeta,
    RemoveCase, RemoveMeta, RotationMeta, Severity, Step, StepMeta,
};
use crate::traversal::{self, Traversal, TraversalKind};
use crate::types::{Color, IdGen, NodeId, StepNode, Value};
use crate::util::{self as tree, get_l, get_p, get_r, set_l, set_p, set_r, value_of};

pub use types::RbNode;

use self::util::{is_red, set_color};

const SCOPE: &str = "rbt";
const DUPLICATE_RULE: &str = "BST uniqueness: duplicate values are not allowed";

pub struct RedBlackTree {
    nodes: Vec<RbNode>,
    root: Option<u32>,
    ids: IdGen,
    recorder: StepRecorder,
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RedBlackTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            ids: IdGen::new(SCOPE),
            recorder: StepRecorder::new(SCOPE),
        }
    }

    fn record(&mut self, draft: StepDraft) -> Step {
        self.recorder.record_tree(&self.nodes, self.root, draft)
    }

    fn id(&self, idx: u32) -> NodeId {
        self.nodes[idx as usize].id
    }

    fn recolor_meta(&self, case: FixupCase, n: u32) -> StepMeta {
        let parent = get_p(&self.nodes, n);
        let grandparent = parent.and_then(|p| get_p(&self.nodes, p));
        let uncle = match (parent, grandparent) {
            (Some(p), Some(g)) if get_l(&self.nodes, g) == Some(p) => get_r(&self.nodes, g),
            (Some(_), Some(g)) => get_l(&self.nodes, g),
            _ => None,
        };
        let value = |i: Option<u32>| i.map(|i| value_of(&self.nodes, i));
        StepMeta::Recolor(RecolorMeta {
            case,
            node: value_of(&self.nodes, n),
            parent: value(parent),
            uncle: value(uncle),
            grandparent: value(grandparent),
        })
    }

    pub fn insert(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("rbt insert {value}");
        let mut steps = Vec::new();

        let Some(mut curr) = self.root else {
            let id = self.ids.next_id();
            self.nodes.push(RbNode::new(id, value, Color::Black));
            self.root = Some(self.nodes.len() as u32 - 1);
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Insert,
                        format!("Insert {value} as root (black)"),
                    )
                    .highlight(id)
                    .explain("The root is created black")
                    .meta(StepMeta::Insert(InsertMeta {
                        inserted_value: value,
                        parent_value: None,
                        direction: None,
                        became_root: true,
                        color: Some(Color::Black),
                    })),
                ),
            );
            return steps;
        };

        let direction = loop {
            let here = value_of(&self.nodes, curr);
            let (direction, next) = if value < here {
                (Direction::Left, get_l(&self.nodes, curr))
            } else if value > here {
                (Direction::Right, get_r(&self.nodes, curr))
            } else {
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Insert,
                            format!("Error: value {value} already exists"),
                        )
                        .explain(
                            "Red-black rule violation: a binary search tree cannot hold duplicate values",
                        )
                        .note("Every value must be unique")
                        .note("Duplicates break the search property")
                        .severity(Severity::Error)
                        .rule_broken(DUPLICATE_RULE)
                        .meta(StepMeta::Duplicate { value }),
                    ),
                );
                return steps;
            };
            match next {
                Some(n) => curr = n,
                None => break direction,
            }
        };

        let id = self.ids.next_id();
        let idx = self.nodes.len() as u32;
        self.nodes.push(RbNode::new(id, value, Color::Red));
        set_p(&mut self.nodes, idx, Some(curr));
        match direction {
            Direction::Left => set_l(&mut self.nodes, curr, Some(idx)),
            Direction::Right => set_r(&mut self.nodes, curr, Some(idx)),
        }

        let (parent_id, parent_value) = (self.id(curr), value_of(&self.nodes, curr));
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Insert, format!("{value} inserted as red"))
                    .highlight(id)
                    .edge(EdgeId::new(parent_id, id))
                    .explain("New red node added")
                    .meta(StepMeta::Insert(InsertMeta {
                        inserted_value: value,
                        parent_value: Some(parent_value),
                        direction: Some(direction),
                        became_root: false,
                        color: Some(Color::Red),
                    })),
            ),
        );

        self.fix_insert(idx, &mut steps);

        steps.push(
            self.record(
                StepDraft::new(
                    OperationKind::Insert,
                    format!("{value} inserted successfully"),
                )
                .explain("Red-black tree balanced"),
            ),
        );
        tracing::debug!("rbt insert {value}: {} steps", steps.len());
        steps
    }

    /// Restores the coloring rules after inserting the red node `n`.
    fn fix_insert(&mut self, mut n: u32, steps: &mut Vec<Step>) {
        while let Some(p) = get_p(&self.nodes, n).filter(|&p| is_red(&self.nodes, Some(p))) {
            let g = get_p(&self.nodes, p).expect("a red parent is never the root");
            let parent_is_left = get_l(&self.nodes, g) == Some(p);
            let uncle = if parent_is_left {
                get_r(&self.nodes, g)
            } else {
                get_l(&self.nodes, g)
            };

            if let Some(u) = uncle.filter(|&u| is_red(&self.nodes, Some(u))) {
                let (uv, pv) = (value_of(&self.nodes, u), value_of(&self.nodes, p));
                let highlighted = [self.id(n), self.id(p), self.id(u)];
                let meta = self.recolor_meta(FixupCase::UncleRed, n);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Insert,
                            "Case 1: uncle is red, recoloring",
                        )
                        .highlight_all(highlighted)
                        .explain(format!(
                            "Uncle {uv} and parent {pv} turn black, grandparent turns red"
                        ))
                        .meta(meta.clone()),
                    ),
                );
                set_color(&mut self.nodes, p, Color::Black);
                set_color(&mut self.nodes, u, Color::Black);
                set_color(&mut self.nodes, g, Color::Red);
                let g_id = self.id(g);
                steps.push(
                    self.record(
                        StepDraft::new(OperationKind::Insert, "Colors updated after recoloring")
                            .highlight(g_id)
                            .explain("Moving up to check the grandparent")
                            .meta(meta),
                    ),
                );
                n = g;
                continue;
            }

            let is_inner = if parent_is_left {
                get_r(&self.nodes, p) == Some(n)
            } else {
                get_l(&self.nodes, p) == Some(n)
            };
            let (straighten, balance) = if parent_is_left {
                (Direction::Left, Direction::Right)
            } else {
                (Direction::Right, Direction::Left)
            };

            if is_inner {
                let highlighted = [self.id(n), self.id(p)];
                let meta = self.recolor_meta(FixupCase::Triangle, n);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Insert,
                            format!("Case 2: red triangle, rotate {}", straighten.as_str()),
                        )
                        .highlight_all(highlighted)
                        .explain("Turning the triangle into a line")
                        .meta(meta),
                    ),
                );
                n = p;
                self.rotate(n, straighten, steps);
            }

            let p = get_p(&self.nodes, n).expect("a line case node has a parent");
            let g = get_p(&self.nodes, p).expect("a line case node has a grandparent");
            let meta = self.recolor_meta(FixupCase::Line, n);
            let highlighted = [self.id(n), self.id(p)];
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Insert,
                        format!("Case 3: red line, rotate {}", balance.as_str()),
                    )
                    .highlight_all(highlighted)
                    .explain("Balancing with a rotation")
                    .meta(meta.clone()),
                ),
            );
            set_color(&mut self.nodes, p, Color::Black);
            set_color(&mut self.nodes, g, Color::Red);
            let highlighted = [self.id(p), self.id(g)];
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Insert, "Colors changed before rotation")
                        .highlight_all(highlighted)
                        .explain("Parent turns black, grandparent turns red")
                        .meta(meta),
                ),
            );
            self.rotate(g, balance, steps);
            break;
        }

        if let Some(root) = self.root.filter(|&r| is_red(&self.nodes, Some(r))) {
            set_color(&mut self.nodes, root, Color::Black);
            let meta = self.recolor_meta(FixupCase::RootBlack, root);
            let root_id = self.id(root);
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Insert, "Root recolored black")
                        .highlight(root_id)
                        .explain("The root must stay black")
                        .meta(meta),
                ),
            );
        }
    }

    fn rotate(&mut self, n: u32, rotation: Direction, steps: &mut Vec<Step>) -> u32 {
        let pivot = value_of(&self.nodes, n);
        let promoted = match rotation {
            Direction::Left => tree::rotate_left(&mut self.nodes, &mut self.root, n),
            Direction::Right => tree::rotate_right(&mut self.nodes, &mut self.root, n),
        };
        let promoted_value = value_of(&self.nodes, promoted);
        let (promoted_id, pivot_id) = (self.id(promoted), self.id(n));
        let moved = match rotation {
            Direction::Left => "The right child takes its parent's position",
            Direction::Right => "The left child moves up",
        };
        steps.push(
            self.record(
                StepDraft::new(
                    OperationKind::Insert,
                    format!("Rotate {}: {promoted_value} moves up", rotation.as_str()),
                )
                .highlight(promoted_id)
                .highlight(pivot_id)
                .edge(EdgeId::new(promoted_id, pivot_id))
                .explain(format!("Node {promoted_value} rotated above {pivot}"))
                .note(moved)
                .note("A single rotation fixes the imbalance")
                .meta(StepMeta::Rotation(RotationMeta {
                    rotation,
                    pivot,
                    promoted: promoted_value,
                })),
            ),
        );
        promoted
    }

    /// Structural removal. Colors are left as they are.
    pub fn remove(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("rbt remove {value}");
        let mut steps = Vec::new();
        let remove_meta = |case, value, successor, promoted_child| {
            StepMeta::Remove(RemoveMeta {
                case,
                value,
                successor,
                promoted_child,
            })
        };

        let Some(target) = tree::find(&self.nodes, self.root, value) else {
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Remove, format!("Value {value} not found"))
                        .explain("The node does not exist")
                        .warning()
                        .meta(remove_meta(RemoveCase::NotFound, value, None, None)),
                ),
            );
            return steps;
        };

        let target_id = self.id(target);
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("Found {value}"))
                    .highlight(target_id)
                    .explain("Starting removal")
                    .meta(remove_meta(RemoveCase::Found, value, None, None)),
            ),
        );

        let mut node = target;
        if let (Some(_), Some(right)) = (get_l(&self.nodes, target), get_r(&self.nodes, target)) {
            let mut succ = right;
            while let Some(l) = get_l(&self.nodes, succ) {
                succ = l;
            }
            let succ_value = value_of(&self.nodes, succ);
            let succ_id = self.id(succ);
            let meta = remove_meta(RemoveCase::TwoChildren, value, Some(succ_value), None);
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Remove,
                        format!("Successor found: {succ_value}"),
                    )
                    .highlight(target_id)
                    .highlight(succ_id)
                    .explain("Using the inorder successor")
                    .note("The node has two children")
                    .note("The inorder successor's value is copied up")
                    .meta(meta.clone()),
                ),
            );
            self.nodes[target as usize].set_value(succ_value);
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Remove,
                        format!("Replacing {value} with {succ_value}"),
                    )
                    .highlight(target_id)
                    .explain("Next the successor node itself is removed")
                    .meta(meta),
                ),
            );
            node = succ;
        }

        let removed = value_of(&self.nodes, node);
        let child = get_l(&self.nodes, node).or(get_r(&self.nodes, node));
        let promoted_child = child.map(|c| value_of(&self.nodes, c));
        let case = match (node == target, child.is_some()) {
            (true, false) => RemoveCase::Leaf,
            (true, true) => RemoveCase::SingleChild,
            (false, false) => RemoveCase::SuccessorLeaf,
            (false, true) => RemoveCase::SuccessorSingleChild,
        };
        tree::transplant(&mut self.nodes, &mut self.root, node, child);
        let highlighted: Vec<NodeId> = child.map(|c| self.id(c)).into_iter().collect();
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("{removed} removed successfully"))
                    .highlight_all(highlighted)
                    .explain("The node was spliced out of the tree")
                    .note("Removal is structural only")
                    .note("Node colors are not repaired")
                    .meta(remove_meta(case, removed, None, promoted_child)),
            ),
        );

        if let Err(err) = util::assert_red_black_tree(&self.nodes, self.root) {
            tracing::debug!("rbt remove {value} left an invalid coloring: {err}");
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Remove,
                        "Red-black property broken after removal",
                    )
                    .explain(err.to_string())
                    .note("Removal splices nodes without a color fix-up")
                    .note(format!("Violated rule: {}", err.rule()))
                    .warning()
                    .rule_broken(err.rule())
                    .meta(remove_meta(RemoveCase::Complete, value, None, None)),
                ),
            );
        }

        tracing::debug!("rbt remove {value}: {} steps", steps.len());
        steps
    }

    pub fn search(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("rbt search {value}");
        search::search(
            &self.nodes,
            self.root,
            value,
            BALANCED_COMPLEXITY,
            &mut self.recorder,
            |node, meta| meta.color = Some(node.color),
        )
    }

    pub fn traverse(&mut self, kind: TraversalKind) -> Traversal {
        tracing::debug!("rbt traverse {kind}");
        traversal::traverse(&self.nodes, self.root, kind, &mut self.recorder)
    }

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

    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|r| self.nodes[r as usize].color)
    }

    pub fn len(&self) -> usize {
        tree::size(&self.nodes, self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn values(&self) -> Vec<Value> {
        tree::inorder_values(&self.nodes, self.root)
    }

    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        util::assert_red_black_tree(&self.nodes, self.root)
    }
}
