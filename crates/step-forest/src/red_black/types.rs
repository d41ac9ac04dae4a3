use crate::step::NodeSnapshot;
use crate::types::{Color, Node, NodeId, StepNode, Value};

#[derive(Clone, Debug)]
pub struct RbNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub id: NodeId,
    pub v: Value,
    pub color: Color,
}

impl RbNode {
    pub fn new(id: NodeId, v: Value, color: Color) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            id,
            v,
            color,
        }
    }
}

impl Node for RbNode {
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

impl StepNode for RbNode {
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
        snapshot.color = Some(self.color);
    }
}
