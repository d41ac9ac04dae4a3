//! Array-backed binary heap in min or max mode.
//!
//! Node identity follows the value, not the slot: the first insert of a value
//! assigns it an id and every later copy of that value reuses it.

pub mod util;

use indexmap::IndexMap;

use crate::error::InvariantError;
use crate::recorder::{StepDraft, StepRecorder};
use crate::step::{
    HeapMeta, NodeSnapshot, OperationKind, SearchMeta, SortMeta, Step, StepMeta, TraverseMeta,
};
use crate::traversal::{join_values, Traversal, TraversalKind};
use crate::types::{HeapKind, IdGen, NodeId, Value};

use self::util::{bubble_target, build_snapshot, sift_target};

const SCOPE: &str = "heap";
const SORT_SCOPE: &str = "heap-sort";
const COMPLEXITY: &str = "O(n) linear scan over the heap array";

pub struct Heap {
    items: Vec<Value>,
    kind: HeapKind,
    ids_by_value: IndexMap<Value, NodeId>,
    ids: IdGen,
    extracted: Vec<Value>,
    recorder: StepRecorder,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapKind::default())
    }
}

impl Heap {
    pub fn new(kind: HeapKind) -> Self {
        Self {
            items: Vec::new(),
            kind,
            ids_by_value: IndexMap::new(),
            ids: IdGen::new(SCOPE),
            extracted: Vec::new(),
            recorder: StepRecorder::new(SCOPE),
        }
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    /// Switches ordering mode. The heap is cleared as a side effect.
    pub fn set_kind(&mut self, kind: HeapKind) {
        tracing::debug!("heap kind set to {}", kind.label());
        self.kind = kind;
        self.clear();
    }

    /// The live heap array.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Every value removed from the top so far, in removal order.
    pub fn extracted(&self) -> &[Value] {
        &self.extracted
    }

    fn id_at(&self, i: usize) -> NodeId {
        self.ids_by_value
            .get(&self.items[i])
            .copied()
            .unwrap_or(NodeId::new(SCOPE, i as u32))
    }

    fn ids_at(&self, indices: &[usize]) -> Vec<NodeId> {
        indices.iter().map(|&i| self.id_at(i)).collect()
    }

    fn meta(&self, index: usize, swapped_with: Option<usize>) -> StepMeta {
        StepMeta::Heap(HeapMeta {
            heap_kind: self.kind,
            value: self.items[index],
            index,
            swapped_with,
        })
    }

    fn record(&mut self, draft: StepDraft) -> Step {
        let draft = draft.tree(self.tree()).array(self.items.clone());
        self.recorder.record(draft)
    }

    fn record_empty(&mut self, kind: OperationKind, action: &str) -> Step {
        self.recorder.record(
            StepDraft::new(kind, "Heap is empty")
                .explain(format!("Cannot {action} an empty heap"))
                .note("The structure holds no elements")
                .warning()
                .array(Vec::new()),
        )
    }

    pub fn insert(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("heap insert {value}");
        let mut steps = Vec::new();
        self.items.push(value);
        if !self.ids_by_value.contains_key(&value) {
            let id = self.ids.next_id();
            self.ids_by_value.insert(value, id);
        }

        let mut curr = self.items.len() - 1;
        let label = self.kind.label();
        let highlight = self.id_at(curr);
        let meta = self.meta(curr, None);
        steps.push(
            self.record(
                StepDraft::new(
                    OperationKind::Insert,
                    format!("Insert {value} at the end of the {label} heap"),
                )
                .highlight(highlight)
                .explain(format!("{value} appended at index {curr}"))
                .meta(meta),
            ),
        );

        while let Some(p) = bubble_target(&self.items, curr, self.kind) {
            let (child_value, parent_value) = (self.items[curr], self.items[p]);
            let op = self.kind.operator();
            let highlighted = self.ids_at(&[curr, p]);
            let meta = self.meta(curr, Some(p));
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Insert,
                        format!("{child_value} {op} {parent_value}, swapping"),
                    )
                    .highlight_all(highlighted)
                    .explain(format!(
                        "Bubble up: swapping {child_value} with {parent_value}"
                    ))
                    .meta(meta),
                ),
            );
            self.items.swap(curr, p);
            curr = p;
        }

        let meta = self.meta(curr, None);
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Insert, format!("{value} placed correctly"))
                    .explain("Insert complete")
                    .meta(meta),
            ),
        );
        tracing::debug!("heap insert {value}: {} steps", steps.len());
        steps
    }

    /// Removes the top element (minimum or maximum per mode).
    pub fn remove(&mut self) -> Vec<Step> {
        tracing::debug!("heap remove top");
        if self.items.is_empty() {
            return vec![self.record_empty(OperationKind::Remove, "remove from")];
        }

        let mut steps = Vec::new();
        let top = self.items[0];
        self.extracted.push(top);
        let extreme = self.kind.extreme();
        let highlight = self.id_at(0);
        let meta = self.meta(0, None);
        let extracted = self.extracted.clone();
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("Remove {extreme}: {top}"))
                    .highlight(highlight)
                    .explain("Removing the root")
                    .sorted(extracted)
                    .meta(meta),
            ),
        );

        let last = self.items.len() - 1;
        self.items.swap(0, last);
        self.items.pop();

        let mut curr = 0;
        while let Some(target) = sift_target(&self.items, curr, self.kind) {
            let (a, b) = (self.items[curr], self.items[target]);
            let highlighted = self.ids_at(&[curr, target]);
            let meta = self.meta(curr, Some(target));
            let extracted = self.extracted.clone();
            steps.push(
                self.record(
                    StepDraft::new(OperationKind::Remove, format!("Swapping {a} with {b}"))
                        .highlight_all(highlighted)
                        .explain("Sift down")
                        .sorted(extracted)
                        .meta(meta),
                ),
            );
            self.items.swap(curr, target);
            curr = target;
        }

        let extracted = self.extracted.clone();
        let kind = self.kind;
        let remaining = self.items.len();
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Remove, format!("{top} removed"))
                    .explain("Removal complete")
                    .sorted(extracted)
                    .meta(StepMeta::Sort(SortMeta {
                        heap_kind: kind,
                        extracted: Some(top),
                        remaining,
                    })),
            ),
        );
        tracing::debug!("heap remove {top}: {} steps", steps.len());
        steps
    }

    /// Heap sort over a copy of the array. The live heap is left untouched.
    pub fn sort(&mut self) -> Vec<Step> {
        tracing::debug!("heap sort of {} items", self.items.len());
        if self.items.is_empty() {
            return vec![self.record_empty(OperationKind::Sort, "sort")];
        }

        let kind = self.kind;
        let (label, extreme) = (kind.label(), kind.extreme());
        let sort_id = |i: usize, _: Value| NodeId::new(SORT_SCOPE, i as u32);
        let total = self.items.len();
        let mut steps = Vec::new();
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Sort, format!("Starting heap sort ({label})"))
                    .explain("Sorting begins")
                    .sorted(Vec::new())
                    .meta(StepMeta::Sort(SortMeta {
                        heap_kind: kind,
                        extracted: None,
                        remaining: total,
                    })),
            ),
        );

        let mut work = self.items.clone();
        let mut sorted = Vec::with_capacity(work.len());
        while let Some(&top) = work.first() {
            steps.push(
                self.recorder.record(
                    StepDraft::new(OperationKind::Sort, format!("Extract {extreme}: {top}"))
                        .tree(build_snapshot(&work, sort_id))
                        .array(work.clone())
                        .highlight(sort_id(0, top))
                        .explain(format!("The {extreme} element {top} joins the result"))
                        .sorted(sorted.clone())
                        .meta(StepMeta::Sort(SortMeta {
                            heap_kind: kind,
                            extracted: Some(top),
                            remaining: work.len(),
                        })),
                ),
            );

            sorted.push(top);
            let last = work.len() - 1;
            work.swap(0, last);
            work.pop();

            let mut curr = 0;
            while let Some(target) = sift_target(&work, curr, kind) {
                let (a, b) = (work[curr], work[target]);
                steps.push(
                    self.recorder.record(
                        StepDraft::new(
                            OperationKind::Sort,
                            format!("Reorder heap: swap {a} and {b}"),
                        )
                        .tree(build_snapshot(&work, sort_id))
                        .array(work.clone())
                        .highlight(sort_id(curr, a))
                        .highlight(sort_id(target, b))
                        .explain(format!("Sift down to keep the {label} heap property"))
                        .sorted(sorted.clone())
                        .meta(StepMeta::Heap(HeapMeta {
                            heap_kind: kind,
                            value: a,
                            index: curr,
                            swapped_with: Some(target),
                        })),
                    ),
                );
                work.swap(curr, target);
                curr = target;
            }
        }

        steps.push(
            self.recorder.record(
                StepDraft::new(
                    OperationKind::Sort,
                    format!("Sort complete: [{}]", join_values(&sorted, ", ")),
                )
                .explain("Heap sort finished")
                .array(Vec::new())
                .sorted(sorted)
                .meta(StepMeta::Sort(SortMeta {
                    heap_kind: kind,
                    extracted: None,
                    remaining: 0,
                })),
            ),
        );
        tracing::debug!("heap sort: {} steps", steps.len());
        steps
    }

    /// Linear scan over the array in index order.
    pub fn search(&mut self, value: Value) -> Vec<Step> {
        tracing::debug!("heap search {value}");
        if self.items.is_empty() {
            let mut meta = SearchMeta::new(value, COMPLEXITY);
            meta.found = Some(false);
            let step = self.recorder.record(
                StepDraft::new(OperationKind::Search, "Heap is empty")
                    .explain("Cannot search an empty heap")
                    .note("The structure holds no elements")
                    .note(format!("Theoretical complexity: {COMPLEXITY}"))
                    .warning()
                    .array(Vec::new())
                    .meta(StepMeta::Search(meta)),
            );
            return vec![step];
        }

        let mut steps = Vec::new();
        let mut visited: Vec<usize> = Vec::new();
        for i in 0..self.items.len() {
            let iteration = i + 1;
            visited.push(i);
            let current = self.items[i];
            let path = self.items[..=i].to_vec();
            let joined = join_values(&path, " → ");
            let highlighted = self.ids_at(&visited);

            let mut meta = SearchMeta::new(value, COMPLEXITY);
            meta.path_sequence = path.clone();
            meta.iteration = iteration;
            meta.visited_count = iteration;
            meta.current_index = Some(i);
            steps.push(
                self.record(
                    StepDraft::new(
                        OperationKind::Search,
                        format!("Iteration {iteration}: visiting index {i} (value {current})"),
                    )
                    .highlight_all(highlighted.iter().copied())
                    .explain(format!(
                        "Iteration {iteration}: searching for {value}. Visited: {joined}"
                    ))
                    .note(format!("Iteration {iteration}"))
                    .note(format!("Comparing {value} with {current}"))
                    .note(format!("Running complexity: {COMPLEXITY}"))
                    .meta(StepMeta::Search(meta)),
                ),
            );

            if current == value {
                let mut meta = SearchMeta::new(value, COMPLEXITY);
                meta.path_sequence = path;
                meta.iteration = iteration;
                meta.visited_count = iteration;
                meta.found = Some(true);
                meta.found_index = Some(i);
                meta.total_iterations = Some(iteration);
                steps.push(
                    self.record(
                        StepDraft::new(
                            OperationKind::Search,
                            format!("Found {value} at index {i}"),
                        )
                        .highlight_all(highlighted)
                        .explain(format!(
                            "Element {value} found after {iteration} iteration(s). Visited: {joined}"
                        ))
                        .note("Search finished")
                        .note(format!("Total iterations: {iteration}"))
                        .meta(StepMeta::Search(meta)),
                    ),
                );
                return steps;
            }
        }

        let total = self.items.len();
        let joined = join_values(&self.items, " → ");
        let highlighted = self.ids_at(&visited);
        let mut meta = SearchMeta::new(value, COMPLEXITY);
        meta.path_sequence = self.items.clone();
        meta.iteration = total;
        meta.visited_count = total;
        meta.found = Some(false);
        meta.total_iterations = Some(total);
        steps.push(
            self.record(
                StepDraft::new(OperationKind::Search, format!("Value {value} not found"))
                    .highlight_all(highlighted)
                    .explain(format!(
                        "Element {value} is not in the heap after {total} iteration(s). Visited: {joined}"
                    ))
                    .note(format!("Total iterations: {total}"))
                    .note(format!("Observed complexity: {COMPLEXITY}"))
                    .warning()
                    .meta(StepMeta::Search(meta)),
            ),
        );
        steps
    }

    /// Level-order walk, which is plain array order.
    pub fn traverse(&mut self) -> Traversal {
        tracing::debug!("heap traverse");
        let mut result = Traversal::default();
        for i in 0..self.items.len() {
            let value = self.items[i];
            result.order.push(value);
            let joined = join_values(&result.order, ", ");
            let highlight = self.id_at(i);
            let step = self.record(
                StepDraft::new(OperationKind::Traverse, format!("Visiting {value}"))
                    .highlight(highlight)
                    .explain(format!("Level-order traversal: {value}. Order: {joined}"))
                    .meta(StepMeta::Traverse(TraverseMeta {
                        traversal: TraversalKind::Levelorder,
                        order_snapshot: result.order.clone(),
                        current: value,
                    })),
            );
            result.steps.push(step);
        }
        result
    }

    /// Empties the heap, forgets value ids and the extracted list.
    pub fn clear(&mut self) {
        self.items.clear();
        self.ids_by_value.clear();
        self.ids.reset();
        self.extracted.clear();
    }

    pub fn tree(&self) -> Option<NodeSnapshot> {
        build_snapshot(&self.items, |i, _| self.id_at(i))
    }

    pub fn peek(&self) -> Option<Value> {
        self.items.first().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Values in array order.
    pub fn values(&self) -> Vec<Value> {
        self.items.clone()
    }

    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        util::assert_heap(&self.items, self.kind)
    }
}
