use crate::step::NodeSnapshot;
use crate::types::{Node, NodeId, StepNode, Value};

/// AVL node with explicitly maintained height and balance factor.
#[derive(Clone, Debug)]
pub struct AvlNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub id: NodeId,
    pub v: Value,
    /// Height of this subtree, a leaf being `0`.
    pub height: i32,
    /// Balance factor, `height(left) - height(right)`.
    pub bf: i32,
}

impl AvlNode {
    pub fn new(id: NodeId, v: Value) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            id,
            v,
            height: 0,
            bf: 0,
        }
    }
}

impl Node for AvlNode {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl StepNode for AvlNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn value(&self) -> Value {
        self.v
    }

    fn set_value(&mut self, value: Value) {
        self.v = value;
    }

    fn decorate(&self, snapshot: &mut NodeSnapshot) {
        snapshot.height = Some(self.height);
        snapshot.balance_factor = Some(self.bf);
    }
}
