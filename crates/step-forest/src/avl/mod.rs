//! Height-balanced binary search tree.
//!
//! Heights and balance factors are stored on every node and recomputed for
//! each ancestor on the way back up from an insert or remove, so a cached
//! value is never older than the last structural change below it.

pub mod types;
pub mod util;

use crate::error::InvariantError;
use crate::recorder::{snapshot, StepDraft, StepRecorder};
use crate::search::{self, BALANCED_COMPLEXITY};
use crate::step::{
    BalanceMeta, Direction, EdgeId, ImbalanceCase, InsertMeta, NodeSnapshot, OperationKind,
    RemoveCase, RemoveMeta, RotationMeta, Step, StepMeta,
};
use crate::traversal::{self, Traversal, TraversalKind};
use crate::types::{IdGen, NodeId, StepNode, Value};
use crate::util::{self as tree, get_l, get_p, get_r, set_l, set_p, set_r, value_of};

pub use types::AvlNode;

use self::util::{bf, rotate_left, rotate_right, update_height};

const SCOPE: &str = "avl";

fn remove_meta(case: RemoveCase, value: Value) -> StepMeta {
    StepMeta::Remove(RemoveMeta {
        case,
        value,
        successor: None,
        promoted_child: None,
    })
}

pub struct AvlTree {
    nodes: Vec<AvlNode>,
    root: Option<u32>,
    ids: IdGen,
    recorder: StepRecorder,
}

impl Default for AvlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AvlTree {
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

    pub fn insert(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("avl insert {value}");
        let mut steps = Vec::new();

        if let Some(existing) = tree::find(&self.nodes, self.root, value) {
            let id = self.id(existing);
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Insert, format!("Value {value} already exists"))
                        .highlight(id)
                        .explain("Duplicate value ignored")
                        .meta(StepMeta::Duplicate { value }),
                ),
            );
            return steps;
        }

        let id = self.ids.next_id();
        let idx = self.nodes.len() as u32;
        self.nodes.push(AvlNode::new(id, value));

        let mut parent = None;
        let mut direction = None;
        let mut curr = self.root;
        while let Some(c) = curr {
            parent = Some(c);
            if value < value_of(&self.nodes, c) {
                direction = Some(Direction::Left);
                curr = get_l(&self.nodes, c);
            } else {
                direction = Some(Direction::Right);
                curr = get_r(&self.nodes, c);
            }
        }
        match (parent, direction) {
            (Some(p), Some(Direction::Left)) => set_l(&mut self.nodes, p, Some(idx)),
            (Some(p), _) => set_r(&mut self.nodes, p, Some(idx)),
            (None, _) => self.root = Some(idx),
        }
        set_p(&mut self.nodes, idx, parent);

        let parent_value = parent.map(|p| value_of(&self.nodes, p));
        let mut draft = StepDraft::new(OperationKind::Insert, format!("Insert {value}"))
            .highlight(id)
            .explain(format!("Node {value} created"))
            .meta(StepMeta::Insert(InsertMeta {
                inserted_value: value,
                parent_value,
                direction,
                became_root: parent.is_none(),
                color: None,
            }));
        if let Some(p) = parent {
            draft = draft.edge(EdgeId::new(self.id(p), id));
        }
        steps.push(self.record(draft));

        self.rebalance_upwards(parent, OperationKind::Insert, Some(value), &mut steps);

        steps.push(
            self.record(
                StepDraft::new(
                    OperationKind::Insert,
                    format!("{value} inserted successfully"),
                )
                .highlight(id)
                .explain("Insert complete"),
            ),
        );
        tracing::debug!("avl insert {value}: {} steps", steps.len());
        steps
    }

    pub fn remove(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("avl remove {value}");
        let mut steps = Vec::new();

        let Some(target) = tree::find(&self.nodes, self.root, value) else {
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Remove, format!("Value {value} not found"))
                        .explain("The node does not exist")
                        .warning()
                        .meta(remove_meta(RemoveCase::NotFound, value)),
                ),
            );
            return steps;
        };

        let target_id = self.id(target);
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("Found node {value}"))
                    .highlight(target_id)
                    .explain(format!("Removing {value}"))
                    .meta(remove_meta(RemoveCase::Found, value)),
            ),
        );

        let start = match (get_l(&self.nodes, target), get_r(&self.nodes, target)) {
            (None, None) => {
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("{value} is a leaf, removing"),
                        )
                        .highlight(target_id)
                        .explain("Leaf node removed")
                        .meta(remove_meta(RemoveCase::Leaf, value)),
                    ),
                );
                self.detach(target, None)
            }
            (Some(child), None) | (None, Some(child)) => {
                let side = if get_l(&self.nodes, target) == Some(child) {
                    "left"
                } else {
                    "right"
                };
                let child_id = self.id(child);
                let promoted = value_of(&self.nodes, child);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Remove,
                            format!("{value} has only a {side} child"),
                        )
                        .highlight(target_id)
                        .highlight(child_id)
                        .explain(format!("Replacing it with its {side} child"))
                        .meta(StepMeta::Remove(RemoveMeta {
                            case: RemoveCase::SingleChild,
                            value,
                            successor: None,
                            promoted_child: Some(promoted),
                        })),
                    ),
                );
                self.detach(target, Some(child))
            }
            (Some(_), Some(right)) => {
                let mut succ = right;
                while let Some(l) = get_l(&self.nodes, succ) {
                    succ = l;
                }
                let succ_value = value_of(&self.nodes, succ);
                let succ_id = self.id(succ);
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
                            format!("Inorder successor: {succ_value}"),
                        )
                        .highlight(target_id)
                        .highlight(succ_id)
                        .explain("Successor found")
                        .meta(two_children.clone()),
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
                        .explain("The successor's value is copied into the target node")
                        .meta(two_children),
                    ),
                );

                let child = get_r(&self.nodes, succ);
                let promoted_child = child.map(|c| value_of(&self.nodes, c));
                let (case, description) = match child {
                    None => (
                        RemoveCase::SuccessorLeaf,
                        format!("Removing successor {succ_value} (leaf)"),
                    ),
                    Some(_) => (
                        RemoveCase::SuccessorSingleChild,
                        format!("Removing successor {succ_value} (one child)"),
                    ),
                };
                steps.push(
                    self.record(
                        StepDraft::new(OperationKind::Remove, description)
                            .highlight(succ_id)
                            .explain("The duplicated successor leaves the right subtree")
                            .meta(StepMeta::Remove(RemoveMeta {
                                case,
                                value: succ_value,
                                successor: None,
                                promoted_child,
                            })),
                    ),
                );
                self.detach(succ, child)
            }
        };

        self.rebalance_upwards(start, OperationKind::Remove, None, &mut steps);

        steps.push(
            self.record(
                StepDraft::new(
                    OperationKind::Remove,
                    format!("Removal of {value} complete"),
                )
                .explain("Tree rebalanced")
                .meta(remove_meta(RemoveCase::Complete, value)),
            ),
        );
        tracing::debug!("avl remove {value}: {} steps", steps.len());
        steps
    }

    /// Splices `child` into the slot of `node`. Returns the old parent, where
    /// rebalancing has to start.
    fn detach(&mut self, node: u32, child: Option<u32>) -> Option<u32> {
        let parent = get_p(&self.nodes, node);
        tree::transplant(&mut self.nodes, &mut self.root, node, child);
        parent
    }

    /// Refreshes and rebalances every node from `start` up to the root.
    ///
    /// `inserted` selects the insert-time case test (compare the inserted
    /// value with the heavy child); without it the child's balance sign is
    /// used, as removal requires.
    fn rebalance_upwards(
        &mut self,
        start: Option<u32>,
        op: OperationKind,
        inserted: Option<Value>,
        steps: &mut Vec<Step>,
    ) {
        let mut curr = start;
        while let Some(n) = curr {
            update_height(&mut self.nodes, n);
            let node = &self.nodes[n as usize];
            let (id, value, height, balance) = (node.id, node.v, node.height, node.bf);
            steps.push(
                self.record(
                    StepDraft::new(
                        op,
                        format!("Check balance of {value}: factor = {balance}"),
                    )
                    .highlight(id)
                    .explain(format!("Balance factor: {balance}"))
                    .meta(StepMeta::Balance(BalanceMeta {
                        value,
                        height,
                        balance_factor: balance,
                        imbalance: None,
                    })),
                ),
            );

            let top = match self.imbalance(n, inserted) {
                Some(case) => {
                    let heavy = match case {
                        ImbalanceCase::LeftLeft | ImbalanceCase::LeftRight => {
                            get_l(&self.nodes, n)
                        }
                        _ => get_r(&self.nodes, n),
                    }
                    .expect("an unbalanced node has a child on its heavy side");
                    let heavy_id = self.id(heavy);
                    let fix = match case {
                        ImbalanceCase::LeftLeft => "A right rotation is needed",
                        ImbalanceCase::RightRight => "A left rotation is needed",
                        _ => "A double rotation is needed",
                    };
                    steps.push(
                        self.record(
                            StepDraft::new(
                                op,
                                format!("{} imbalance detected at {value}", case.label()),
                            )
                            .highlight(id)
                            .highlight(heavy_id)
                            .explain(fix)
                            .meta(StepMeta::Balance(BalanceMeta {
                                value,
                                height,
                                balance_factor: balance,
                                imbalance: Some(case),
                            })),
                        ),
                    );
                    self.fix(n, heavy, case, op, steps)
                }
                None => n,
            };
            curr = get_p(&self.nodes, top);
        }
    }

    fn imbalance(&self, n: u32, inserted: Option<Value>) -> Option<ImbalanceCase> {
        let balance = self.nodes[n as usize].bf;
        let l = get_l(&self.nodes, n);
        let r = get_r(&self.nodes, n);
        match inserted {
            Some(v) if balance > 1 => {
                let lv = value_of(&self.nodes, l?);
                if v < lv {
                    Some(ImbalanceCase::LeftLeft)
                } else {
                    Some(ImbalanceCase::LeftRight)
                }
            }
            Some(v) if balance < -1 => {
                let rv = value_of(&self.nodes, r?);
                if v > rv {
                    Some(ImbalanceCase::RightRight)
                } else {
                    Some(ImbalanceCase::RightLeft)
                }
            }
            None if balance > 1 => {
                if bf(&self.nodes, l) >= 0 {
                    Some(ImbalanceCase::LeftLeft)
                } else {
                    Some(ImbalanceCase::LeftRight)
                }
            }
            None if balance < -1 => {
                if bf(&self.nodes, r) <= 0 {
                    Some(ImbalanceCase::RightRight)
                } else {
                    Some(ImbalanceCase::RightLeft)
                }
            }
            _ => None,
        }
    }

    /// Applies the rotations for `case` at `n`. Returns the new subtree root.
    fn fix(
        &mut self,
        n: u32,
        heavy: u32,
        case: ImbalanceCase,
        op: OperationKind,
        steps: &mut Vec<Step>,
    ) -> u32 {
        match case {
            ImbalanceCase::LeftLeft => self.rotate(n, Direction::Right, op, steps),
            ImbalanceCase::RightRight => self.rotate(n, Direction::Left, op, steps),
            ImbalanceCase::LeftRight => {
                self.rotate(heavy, Direction::Left, op, steps);
                self.rotate(n, Direction::Right, op, steps)
            }
            ImbalanceCase::RightLeft => {
                self.rotate(heavy, Direction::Right, op, steps);
                self.rotate(n, Direction::Left, op, steps)
            }
        }
    }

    fn rotate(
        &mut self,
        n: u32,
        rotation: Direction,
        op: OperationKind,
        steps: &mut Vec<Step>,
    ) -> u32 {
        let pivot = value_of(&self.nodes, n);
        let promoted = match rotation {
            Direction::Left => rotate_left(&mut self.nodes, &mut self.root, n),
            Direction::Right => rotate_right(&mut self.nodes, &mut self.root, n),
        };
        let promoted_value = value_of(&self.nodes, promoted);
        let (promoted_id, pivot_id) = (self.id(promoted), self.id(n));
        let side = rotation.as_str();
        let moved = match rotation {
            Direction::Left => "The right child takes its parent's place",
            Direction::Right => "The left child takes its parent's place",
        };
        steps.push(
            self.record(
                StepDraft::new(
                    op,
                    format!("Rotate {side}: {promoted_value} moves up"),
                )
                .highlight(promoted_id)
                .highlight(pivot_id)
                .edge(EdgeId::new(promoted_id, pivot_id))
                .explain(format!("Node {promoted_value} rotated above {pivot}"))
                .note(moved)
                .note(format!("The {} path is rebalanced", rotation.opposite().as_str()))
                .meta(StepMeta::Rotation(RotationMeta {
                    rotation,
                    pivot,
                    promoted: promoted_value,
                })),
            ),
        );
        promoted
    }

    pub fn search(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("avl search {value}");
        search::search(
            &self.nodes,
            self.root,
            value,
            BALANCED_COMPLEXITY,
            &mut self.recorder,
            |node, meta| meta.balance_factor = Some(node.bf),
        )
    }

    pub fn traverse(&mut self, kind: TraversalKind) -> Traversal {
        tracing::debug!("avl traverse {kind}");
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
        util::assert_avl_tree(&self.nodes, self.root)
    }
}
