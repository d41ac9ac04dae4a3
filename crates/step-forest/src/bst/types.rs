use crate::types::{Node, NodeId, StepNode, Value};

/// Plain binary search tree node.
#[derive(Clone, Debug)]
pub struct BstNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub id: NodeId,
    pub v: Value,
}

impl BstNode {
    pub fn new(id: NodeId, v: Value) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            id,
            v,
        }
    }
}

impl Node for BstNode {
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

impl StepNode for BstNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn value(&self) -> Value {
        self.v
    }

    fn set_value(&mut self, value: Value) {
        self.v = value;
    }
}
