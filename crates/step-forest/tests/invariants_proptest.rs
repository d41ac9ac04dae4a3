use std::collections::BTreeSet;

use proptest::prelude::*;
use step_forest::{
    AvlTree, BinaryTree, Heap, HeapKind, OperationKind, RedBlackTree, TraversalKind, Value,
};

const N_VALUES: usize = 48;

fn values() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(-100i64..100, 0..N_VALUES)
}

fn heap_kind() -> impl Strategy<Value = HeapKind> {
    prop_oneof![Just(HeapKind::Min), Just(HeapKind::Max)]
}

proptest! {
    /// Inorder always yields the inserted multiset in ascending order.
    #[test]
    fn prop_bst_inorder_is_sorted(input in values()) {
        let mut tree = BinaryTree::new();
        for &v in &input {
            tree.insert(v);
        }
        let mut expected = input.clone();
        expected.sort();
        prop_assert_eq!(tree.values(), expected);
        prop_assert!(tree.assert_valid().is_ok());
    }

    /// Removing every other distinct value leaves a valid tree holding the rest.
    #[test]
    fn prop_bst_remove_keeps_order(input in prop::collection::btree_set(-100i64..100, 0..N_VALUES)) {
        let mut tree = BinaryTree::new();
        for &v in &input {
            tree.insert(v);
        }
        let mut kept = Vec::new();
        for (i, &v) in input.iter().enumerate() {
            if i % 2 == 0 {
                tree.remove(v);
            } else {
                kept.push(v);
            }
        }
        prop_assert_eq!(tree.values(), kept);
        prop_assert!(tree.assert_valid().is_ok());
    }

    /// Every reachable AVL state is balanced with fresh heights.
    #[test]
    fn prop_avl_stays_balanced(input in values(), removals in values()) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();
        for &v in &input {
            tree.insert(v);
            model.insert(v);
            prop_assert!(tree.assert_valid().is_ok());
        }
        for &v in &removals {
            tree.remove(v);
            model.remove(&v);
            prop_assert!(tree.assert_valid().is_ok());
        }
        prop_assert_eq!(tree.values(), model.into_iter().collect::<Vec<_>>());
    }

    /// Insert-only red-black trees always satisfy every coloring rule.
    #[test]
    fn prop_red_black_insert_is_valid(input in values()) {
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();
        for &v in &input {
            tree.insert(v);
            model.insert(v);
        }
        prop_assert!(tree.assert_valid().is_ok());
        prop_assert_eq!(tree.values(), model.into_iter().collect::<Vec<_>>());
    }

    /// Heap order holds after every insert and remove.
    #[test]
    fn prop_heap_order_holds(kind in heap_kind(), input in values(), pops in 0usize..N_VALUES) {
        let mut heap = Heap::new(kind);
        for &v in &input {
            heap.insert(v);
            prop_assert!(heap.assert_valid().is_ok());
        }
        for _ in 0..pops.min(input.len()) {
            heap.remove();
            prop_assert!(heap.assert_valid().is_ok());
        }
        let extracted = heap.extracted().to_vec();
        let mut ordered = extracted.clone();
        match kind {
            HeapKind::Min => ordered.sort(),
            HeapKind::Max => ordered.sort_by(|a, b| b.cmp(a)),
        }
        prop_assert_eq!(extracted, ordered);
    }

    /// Heap sort matches a plain sort and leaves the live heap alone.
    #[test]
    fn prop_heap_sort_is_sorted(kind in heap_kind(), input in prop::collection::vec(-100i64..100, 1..N_VALUES)) {
        let mut heap = Heap::new(kind);
        for &v in &input {
            heap.insert(v);
        }
        let before = heap.values();
        let steps = heap.sort();
        let mut expected = input.clone();
        match kind {
            HeapKind::Min => expected.sort(),
            HeapKind::Max => expected.sort_by(|a, b| b.cmp(a)),
        }
        prop_assert_eq!(steps.last().and_then(|s| s.sorted_elements.clone()), Some(expected));
        prop_assert_eq!(heap.values(), before);
    }

    /// Each insert's final snapshot shows the tree as it was at that moment.
    #[test]
    fn prop_snapshots_are_frozen(input in prop::collection::vec(-100i64..100, 1..N_VALUES)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();
        let mut frozen = Vec::new();
        for &v in &input {
            let steps = tree.insert(v);
            model.insert(v);
            frozen.push((steps, model.iter().copied().collect::<Vec<_>>()));
        }
        for &v in &input {
            tree.remove(v);
        }
        prop_assert!(tree.is_empty());
        for (steps, expected) in frozen {
            let inorder = steps.last().and_then(|s| s.tree.as_ref()).map(|t| t.inorder());
            prop_assert_eq!(inorder, Some(expected));
        }
    }

    /// Traversal order lists exactly the stored values.
    #[test]
    fn prop_traversals_visit_everything(input in values()) {
        let mut tree = BinaryTree::new();
        for &v in &input {
            tree.insert(v);
        }
        for kind in TraversalKind::ALL {
            let traversal = tree.traverse(kind);
            let mut order = traversal.order.clone();
            order.sort();
            prop_assert_eq!(order, tree.values());
            prop_assert!(traversal.steps.iter().all(|s| s.kind == OperationKind::Traverse));
        }
    }
}
