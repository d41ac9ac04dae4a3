use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use step_forest::{
    AvlTree, BinaryTree, Heap, HeapKind, NodeSnapshot, OperationKind, RedBlackTree, Step,
    Traversal, TraversalKind, Value,
};

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Which engine an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Binary,
    Heap,
    Avl,
    Redblack,
}

impl TreeKind {
    pub const ALL: [TreeKind; 4] = [
        TreeKind::Binary,
        TreeKind::Heap,
        TreeKind::Avl,
        TreeKind::Redblack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::Binary => "binary",
            TreeKind::Heap => "heap",
            TreeKind::Avl => "avl",
            TreeKind::Redblack => "redblack",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreeKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "bst" => Ok(TreeKind::Binary),
            "heap" => Ok(TreeKind::Heap),
            "avl" => Ok(TreeKind::Avl),
            "redblack" | "red-black" | "rbt" => Ok(TreeKind::Redblack),
            _ => Err(SessionError::UnknownTree(s.to_string())),
        }
    }
}

/// One logged call and the steps it produced.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub tree: TreeKind,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub steps: Vec<Step>,
}

/// Serializes calls onto one engine per tree kind and logs their steps.
pub struct Session {
    config: SessionConfig,
    binary: BinaryTree,
    heap: Heap,
    avl: AvlTree,
    red_black: RedBlackTree,
    log: Vec<Operation>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            heap: Heap::new(config.heap_kind),
            binary: BinaryTree::new(),
            avl: AvlTree::new(),
            red_black: RedBlackTree::new(),
            log: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn push(
        &mut self,
        tree: TreeKind,
        kind: OperationKind,
        value: Option<Value>,
        steps: Vec<Step>,
    ) -> Vec<Step> {
        tracing::debug!(
            "logged {kind} on {tree} (value {value:?}): {} steps",
            steps.len()
        );
        self.log.push(Operation {
            tree,
            kind,
            value,
            steps: steps.clone(),
        });
        steps
    }

    fn insert_unchecked(&mut self, tree: TreeKind, value: Value) -> Vec<Step> {
        let steps = match tree {
            TreeKind::Binary => self.binary.insert(value),
            TreeKind::Heap => self.heap.insert(value),
            TreeKind::Avl => self.avl.insert(value),
            TreeKind::Redblack => self.red_black.insert(value),
        };
        self.push(tree, OperationKind::Insert, Some(value), steps)
    }

    pub fn insert(&mut self, tree: TreeKind, value: Value) -> Result<Vec<Step>, SessionError> {
        self.config.check_value(value)?;
        Ok(self.insert_unchecked(tree, value))
    }

    /// Inserts each value as its own logged operation.
    ///
    /// All values are checked before the first insert, so a bad value leaves
    /// the session untouched.
    pub fn insert_many(
        &mut self,
        tree: TreeKind,
        values: &[Value],
    ) -> Result<Vec<Step>, SessionError> {
        for &value in values {
            self.config.check_value(value)?;
        }
        Ok(values
            .iter()
            .flat_map(|&value| self.insert_unchecked(tree, value))
            .collect())
    }

    /// Removes `value`. The heap ignores it and removes its top element.
    pub fn remove(&mut self, tree: TreeKind, value: Value) -> Result<Vec<Step>, SessionError> {
        if tree != TreeKind::Heap {
            self.config.check_value(value)?;
        }
        let (logged, steps) = match tree {
            TreeKind::Binary => (Some(value), self.binary.remove(value)),
            TreeKind::Heap => (None, self.heap.remove()),
            TreeKind::Avl => (Some(value), self.avl.remove(value)),
            TreeKind::Redblack => (Some(value), self.red_black.remove(value)),
        };
        Ok(self.push(tree, OperationKind::Remove, logged, steps))
    }

    pub fn search(&mut self, tree: TreeKind, value: Value) -> Result<Vec<Step>, SessionError> {
        self.config.check_value(value)?;
        let steps = match tree {
            TreeKind::Binary => self.binary.search(value),
            TreeKind::Heap => self.heap.search(value),
            TreeKind::Avl => self.avl.search(value),
            TreeKind::Redblack => self.red_black.search(value),
        };
        Ok(self.push(tree, OperationKind::Search, Some(value), steps))
    }

    /// Traverses in the named order, or the configured default when `kind`
    /// is `None`. The heap always walks level order.
    pub fn traverse(
        &mut self,
        tree: TreeKind,
        kind: Option<&str>,
    ) -> Result<Traversal, SessionError> {
        let kind = match kind {
            Some(s) => s.parse::<TraversalKind>()?,
            None => self.config.default_traversal,
        };
        let traversal = match tree {
            TreeKind::Binary => self.binary.traverse(kind),
            TreeKind::Heap => self.heap.traverse(),
            TreeKind::Avl => self.avl.traverse(kind),
            TreeKind::Redblack => self.red_black.traverse(kind),
        };
        let steps = self.push(tree, OperationKind::Traverse, None, traversal.steps);
        Ok(Traversal {
            steps,
            order: traversal.order,
        })
    }

    /// Heap sort over a copy of the heap.
    pub fn sort(&mut self) -> Vec<Step> {
        let steps = self.heap.sort();
        self.push(TreeKind::Heap, OperationKind::Sort, None, steps)
    }

    /// Switches the heap's ordering mode, which empties it.
    pub fn set_heap_kind(&mut self, kind: HeapKind) {
        tracing::info!("heap switched to {} mode", kind.label());
        self.config.heap_kind = kind;
        self.heap.set_kind(kind);
    }

    /// Empties every engine and the log.
    pub fn clear(&mut self) {
        tracing::info!("session cleared ({} operations dropped)", self.log.len());
        self.log.clear();
        self.binary.clear();
        self.heap.clear();
        self.avl.clear();
        self.red_black.clear();
    }

    pub fn operations(&self) -> &[Operation] {
        &self.log
    }

    /// Every logged step in call order.
    pub fn all_steps(&self) -> Vec<Step> {
        self.log
            .iter()
            .flat_map(|op| op.steps.iter().cloned())
            .collect()
    }

    /// Logged steps of operations of `kind`, in call order.
    pub fn steps_of(&self, kind: OperationKind) -> Vec<Step> {
        self.log
            .iter()
            .filter(|op| op.kind == kind)
            .flat_map(|op| op.steps.iter().cloned())
            .collect()
    }

    pub fn tree(&self, tree: TreeKind) -> Option<NodeSnapshot> {
        match tree {
            TreeKind::Binary => self.binary.tree(),
            TreeKind::Heap => self.heap.tree(),
            TreeKind::Avl => self.avl.tree(),
            TreeKind::Redblack => self.red_black.tree(),
        }
    }

    pub fn binary(&self) -> &BinaryTree {
        &self.binary
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn avl(&self) -> &AvlTree {
        &self.avl
    }

    pub fn red_black(&self) -> &RedBlackTree {
        &self.red_black
    }
}
