//! Turns engine state into [`Step`] records.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::step::{EdgeId, NodeSnapshot, OperationKind, Severity, Step, StepMeta};
use crate::types::{NodeId, StepNode, Value};
use crate::util::{get_l, get_r};

/// Deep copy of the subtree under `root`, following left/right links only.
pub fn snapshot<N: StepNode>(arena: &[N], root: Option<u32>) -> Option<NodeSnapshot> {
    let idx = root?;
    let node = &arena[idx as usize];
    let mut out = NodeSnapshot::new(node.id(), node.value());
    node.decorate(&mut out);
    out.left = snapshot(arena, get_l(arena, idx)).map(Box::new);
    out.right = snapshot(arena, get_r(arena, idx)).map(Box::new);
    Some(out)
}

/// Everything a step needs except its id and timestamp.
#[derive(Clone, Debug)]
pub struct StepDraft {
    kind: OperationKind,
    description: String,
    explanation: String,
    tree: Option<NodeSnapshot>,
    highlighted_nodes: Vec<NodeId>,
    highlighted_edges: Vec<EdgeId>,
    notes: Vec<String>,
    severity: Severity,
    rule_broken: Option<String>,
    metadata: Option<StepMeta>,
    sorted_elements: Option<Vec<Value>>,
    array_snapshot: Option<Vec<Value>>,
}

impl StepDraft {
    pub fn new(kind: OperationKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            explanation: String::new(),
            tree: None,
            highlighted_nodes: Vec::new(),
            highlighted_edges: Vec::new(),
            notes: Vec::new(),
            severity: Severity::Info,
            rule_broken: None,
            metadata: None,
            sorted_elements: None,
            array_snapshot: None,
        }
    }

    pub fn explain(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn tree(mut self, tree: Option<NodeSnapshot>) -> Self {
        self.tree = tree;
        self
    }

    pub fn highlight(mut self, id: NodeId) -> Self {
        self.highlighted_nodes.push(id);
        self
    }

    pub fn highlight_all(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.highlighted_nodes.extend(ids);
        self
    }

    pub fn edge(mut self, edge: EdgeId) -> Self {
        self.highlighted_edges.push(edge);
        self
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        self.highlighted_edges.extend(edges);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn warning(self) -> Self {
        self.severity(Severity::Warning)
    }

    pub fn rule_broken(mut self, rule: impl Into<String>) -> Self {
        self.rule_broken = Some(rule.into());
        self
    }

    pub fn meta(mut self, meta: StepMeta) -> Self {
        self.metadata = Some(meta);
        self
    }

    pub fn sorted(mut self, values: Vec<Value>) -> Self {
        self.sorted_elements = Some(values);
        self
    }

    pub fn array(mut self, values: Vec<Value>) -> Self {
        self.array_snapshot = Some(values);
        self
    }
}

/// Assigns step ids that stay unique for the life of one engine.
#[derive(Clone, Debug)]
pub struct StepRecorder {
    scope: &'static str,
    counter: u64,
}

impl StepRecorder {
    pub const fn new(scope: &'static str) -> Self {
        Self { scope, counter: 0 }
    }

    /// Number of steps recorded so far.
    pub fn recorded(&self) -> u64 {
        self.counter
    }

    pub fn record(&mut self, draft: StepDraft) -> Step {
        let id = format!("{}-step-{}", self.scope, self.counter);
        self.counter += 1;

        let StepDraft {
            kind,
            description,
            explanation,
            tree,
            highlighted_nodes,
            highlighted_edges,
            mut notes,
            severity,
            rule_broken,
            metadata,
            sorted_elements,
            array_snapshot,
        } = draft;
        if notes.is_empty() {
            notes = vec![description.clone(), explanation.clone()];
        }

        let step = Step {
            id,
            kind,
            description,
            tree,
            highlighted_nodes,
            highlighted_edges,
            explanation,
            timestamp: now_millis(),
            notes,
            severity,
            rule_broken,
            metadata,
            sorted_elements,
            array_snapshot,
        };
        tracing::trace!("{} {}: {}", step.id, step.kind, step.description);
        step
    }

    /// Records `draft` with a fresh snapshot of the tree under `root`.
    pub fn record_tree<N: StepNode>(
        &mut self,
        arena: &[N],
        root: Option<u32>,
        draft: StepDraft,
    ) -> Step {
        self.record(draft.tree(snapshot(arena, root)))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
