use step_forest::{Heap, HeapKind, OperationKind, Severity, StepMeta, TraversalKind};

fn seeded(kind: HeapKind, values: &[i64]) -> Heap {
    let mut heap = Heap::new(kind);
    for &v in values {
        heap.insert(v);
    }
    heap
}

#[test]
fn heap_insert_array_matrix() {
    let cases: &[(HeapKind, &[i64], Vec<i64>)] = &[
        (HeapKind::Min, &[5, 3, 8, 1], vec![1, 3, 8, 5]),
        (HeapKind::Max, &[5, 3, 8, 1], vec![8, 3, 5, 1]),
        (HeapKind::Min, &[4, 4, 4], vec![4, 4, 4]),
        (HeapKind::Max, &[1, 2, 3, 4, 5], vec![5, 4, 2, 1, 3]),
    ];
    for (kind, input, expected) in cases {
        let heap = seeded(*kind, input);
        assert_eq!(heap.items(), expected.as_slice(), "{kind:?} {input:?}");
        heap.assert_valid().unwrap();
    }
}

#[test]
fn heap_insert_records_bubble_swaps() {
    let mut heap = seeded(HeapKind::Min, &[5, 3, 8]);
    let steps = heap.insert(1);
    let swaps: Vec<_> = steps
        .iter()
        .filter_map(|s| match &s.metadata {
            Some(StepMeta::Heap(m)) => m.swapped_with.map(|w| (m.index, w)),
            _ => None,
        })
        .collect();
    assert_eq!(swaps, vec![(3, 1), (1, 0)]);
    assert_eq!(
        steps.first().unwrap().array_snapshot,
        Some(vec![3, 5, 8, 1])
    );
    assert_eq!(steps.last().unwrap().array_snapshot, Some(vec![1, 3, 8, 5]));
    assert!(steps.iter().all(|s| s.id.starts_with("heap-step-")));
}

#[test]
fn heap_remove_extracts_top_and_sifts_down() {
    let mut heap = seeded(HeapKind::Min, &[5, 3, 8, 1]);
    let steps = heap.remove();
    assert_eq!(heap.items(), &[3, 5, 8]);
    assert_eq!(heap.extracted(), &[1]);
    assert!(steps.iter().all(|s| s.kind == OperationKind::Remove));
    assert_eq!(steps.last().unwrap().sorted_elements, Some(vec![1]));
    heap.assert_valid().unwrap();

    heap.remove();
    assert_eq!(heap.extracted(), &[1, 3]);
    assert_eq!(heap.peek(), Some(5));
}

#[test]
fn heap_sort_matrix() {
    let cases: &[(HeapKind, &[i64], Vec<i64>)] = &[
        (HeapKind::Min, &[5, 3, 8, 1], vec![1, 3, 5, 8]),
        (HeapKind::Max, &[5, 3, 8, 1], vec![8, 5, 3, 1]),
        (HeapKind::Min, &[2, 2, 1], vec![1, 2, 2]),
    ];
    for (kind, input, expected) in cases {
        let mut heap = seeded(*kind, input);
        let before = heap.values();
        let steps = heap.sort();
        let last = steps.last().unwrap();
        assert_eq!(last.sorted_elements.as_ref(), Some(expected));
        assert_eq!(heap.values(), before, "sort must not touch the live heap");
        assert!(steps.iter().all(|s| s.kind == OperationKind::Sort));
        assert!(steps
            .iter()
            .skip(1)
            .filter_map(|s| s.tree.as_ref())
            .all(|t| t.id.prefix() == "heap-sort"));
    }
}

#[test]
fn heap_search_is_a_linear_scan() {
    let mut heap = seeded(HeapKind::Min, &[5, 3, 8, 1]);
    let hit = heap.search(8);
    let meta = hit.last().unwrap().search_meta().unwrap();
    assert_eq!(meta.found, Some(true));
    assert_eq!(meta.found_index, Some(2));
    assert_eq!(meta.path_sequence, vec![1, 3, 8]);

    let miss = heap.search(42);
    let last = miss.last().unwrap();
    assert_eq!(last.severity, Severity::Warning);
    assert_eq!(last.search_meta().unwrap().total_iterations, Some(4));
    assert_eq!(miss.len(), 5);
}

#[test]
fn heap_empty_operations_warn_once() {
    let mut heap = Heap::default();
    for steps in [heap.remove(), heap.sort(), heap.search(1)] {
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].severity, Severity::Warning);
        assert_eq!(steps[0].array_snapshot, Some(Vec::new()));
    }
    assert!(heap.extracted().is_empty());
}

#[test]
fn heap_traverse_is_level_order() {
    let mut heap = seeded(HeapKind::Max, &[5, 3, 8, 1]);
    let traversal = heap.traverse();
    assert_eq!(traversal.order, vec![8, 3, 5, 1]);
    assert_eq!(traversal.steps.len(), 4);
    for step in &traversal.steps {
        match &step.metadata {
            Some(StepMeta::Traverse(m)) => assert_eq!(m.traversal, TraversalKind::Levelorder),
            other => panic!("unexpected metadata {other:?}"),
        }
    }
}

#[test]
fn heap_set_kind_clears() {
    let mut heap = seeded(HeapKind::Min, &[5, 3]);
    heap.remove();
    heap.set_kind(HeapKind::Max);
    assert!(heap.is_empty());
    assert!(heap.extracted().is_empty());
    assert_eq!(heap.kind(), HeapKind::Max);
    heap.insert(1);
    heap.insert(9);
    assert_eq!(heap.peek(), Some(9));
}

#[test]
fn heap_snapshot_shape_follows_array() {
    let heap = seeded(HeapKind::Min, &[5, 3, 8, 1]);
    let snap = heap.tree().unwrap();
    assert_eq!(snap.value, 1);
    assert_eq!(snap.left().map(|n| n.value), Some(3));
    assert_eq!(snap.right().map(|n| n.value), Some(8));
    assert_eq!(snap.left().and_then(|n| n.left()).map(|n| n.value), Some(5));
    assert_eq!(snap.len(), 4);
}
