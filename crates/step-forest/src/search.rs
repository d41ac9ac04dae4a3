//! Iterative root-to-leaf search shared by the linked engines.

use std::cmp::Ordering;

use crate::recorder::{snapshot, StepDraft, StepRecorder};
use crate::step::{Comparison, EdgeId, OperationKind, SearchMeta, Step, StepMeta};
use crate::traversal::join_values;
use crate::types::{NodeId, StepNode, Value};
use crate::util::{get_l, get_r};

pub const BST_COMPLEXITY: &str = "O(h) | average O(log n), worst O(n)";
pub const BALANCED_COMPLEXITY: &str = "O(log n) guaranteed";

fn path_edges(ids: &[NodeId]) -> Vec<EdgeId> {
    ids.windows(2).map(|w| EdgeId::new(w[0], w[1])).collect()
}

fn visit_label(value: Value, meta: &SearchMeta) -> String {
    let mut label = value.to_string();
    if let Some(bf) = meta.balance_factor {
        label.push_str(&format!(", balance factor: {bf}"));
    }
    if let Some(color) = meta.color {
        label.push_str(&format!(" ({color})"));
    }
    label
}

/// Descends from `root` towards `target`, one step per visited node.
///
/// `decorate` adds engine-specific fields (balance factor, color) to the
/// metadata of each visit step.
pub(crate) fn search<N, F>(
    arena: &[N],
    root: Option<u32>,
    target: Value,
    complexity: &'static str,
    recorder: &mut StepRecorder,
    decorate: F,
) -> Vec<Step>
where
    N: StepNode,
    F: Fn(&N, &mut SearchMeta),
{
    let tree = snapshot(arena, root);
    let mut steps = Vec::new();
    let mut path: Vec<Value> = Vec::new();
    let mut ids: Vec<NodeId> = Vec::new();
    let mut curr = root;

    while let Some(idx) = curr {
        let node = &arena[idx as usize];
        let value = node.value();
        path.push(value);
        ids.push(node.id());
        let iteration = path.len();
        let joined = join_values(&path, " → ");

        let ord = target.cmp(&value);
        let (comparison, note) = match ord {
            Ordering::Less => (Comparison::Left, "Target is smaller: go left"),
            Ordering::Greater => (Comparison::Right, "Target is larger: go right"),
            Ordering::Equal => (Comparison::Match, "Values are equal"),
        };

        let mut meta = SearchMeta::new(target, complexity);
        meta.path_sequence = path.clone();
        meta.iteration = iteration;
        meta.visited_count = iteration;
        meta.comparison = Some(comparison);
        decorate(node, &mut meta);

        steps.push(
            recorder.record(
                StepDraft::new(
                    OperationKind::Search,
                    format!("Iteration {iteration}: visiting {}", visit_label(value, &meta)),
                )
                .tree(tree.clone())
                .highlight_all(ids.iter().copied())
                .edges(path_edges(&ids))
                .explain(format!(
                    "Iteration {iteration}: searching for {target}. Path: {joined}"
                ))
                .note(format!("Iteration {iteration}"))
                .note(format!("Comparing {target} with {value}"))
                .note(note)
                .note(format!("Expected complexity: {complexity}"))
                .meta(StepMeta::Search(meta)),
            ),
        );

        curr = match ord {
            Ordering::Equal => {
                let mut meta = SearchMeta::new(target, complexity);
                meta.path_sequence = path.clone();
                meta.iteration = iteration;
                meta.visited_count = iteration;
                meta.found = Some(true);
                meta.total_iterations = Some(iteration);
                steps.push(
                    recorder.record(
                        StepDraft::new(OperationKind::Search, format!("Found {target}"))
                            .tree(tree)
                            .highlight_all(ids.iter().copied())
                            .edges(path_edges(&ids))
                            .explain(format!(
                                "Value {target} found after {iteration} iteration(s). Path: {joined}"
                            ))
                            .note("The current value matches the target")
                            .note("Search finished")
                            .meta(StepMeta::Search(meta)),
                    ),
                );
                return steps;
            }
            Ordering::Less => get_l(arena, idx),
            Ordering::Greater => get_r(arena, idx),
        };
    }

    let total = path.len();
    let joined = if path.is_empty() {
        "(empty)".to_string()
    } else {
        join_values(&path, " → ")
    };
    let mut meta = SearchMeta::new(target, complexity);
    meta.path_sequence = path;
    meta.iteration = total;
    meta.visited_count = total;
    meta.found = Some(false);
    meta.total_iterations = Some(total);
    steps.push(
        recorder.record(
            StepDraft::new(OperationKind::Search, format!("Value {target} not found"))
                .tree(tree)
                .highlight_all(ids.iter().copied())
                .edges(path_edges(&ids))
                .explain(format!(
                    "Search failed after {total} iteration(s). Path walked: {joined}"
                ))
                .note(format!("Total iterations: {total}"))
                .note("Reached an empty branch")
                .note(format!("Path walked: {joined}"))
                .warning()
                .meta(StepMeta::Search(meta)),
        ),
    );
    steps
}
