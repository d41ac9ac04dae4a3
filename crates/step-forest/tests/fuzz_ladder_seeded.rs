use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use step_forest::{AvlTree, BinaryTree, Heap, HeapKind, RedBlackTree, Severity, Value};

const SEEDS: [u64; 6] = [1, 7, 42, 1337, 90210, 0xdead_beef];
const OPS: usize = 400;

fn rng(seed: u64) -> Xoshiro256StarStar {
    Xoshiro256StarStar::seed_from_u64(seed)
}

#[test]
fn fuzz_avl_against_sorted_set() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();
        for _ in 0..OPS {
            let v: Value = rng.gen_range(0..64);
            let steps = if rng.gen_bool(0.6) {
                model.insert(v);
                tree.insert(v)
            } else {
                let present = model.remove(&v);
                let steps = tree.remove(v);
                let warned = steps.iter().any(|s| s.severity == Severity::Warning);
                assert_eq!(warned, !present, "seed={seed} remove {v}");
                steps
            };
            assert!(!steps.is_empty(), "seed={seed}");
            tree.assert_valid()
                .unwrap_or_else(|e| panic!("seed={seed} after {v}: {e}"));
        }
        assert_eq!(
            tree.values(),
            model.iter().copied().collect::<Vec<_>>(),
            "seed={seed}"
        );
    }
}

#[test]
fn fuzz_bst_against_sorted_multiset() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let mut tree = BinaryTree::new();
        let mut model: Vec<Value> = Vec::new();
        for _ in 0..OPS {
            let v: Value = rng.gen_range(0..32);
            if rng.gen_bool(0.55) {
                tree.insert(v);
                model.push(v);
            } else {
                tree.remove(v);
                if let Some(pos) = model.iter().position(|&x| x == v) {
                    model.remove(pos);
                }
            }
            tree.assert_valid()
                .unwrap_or_else(|e| panic!("seed={seed} after {v}: {e}"));
        }
        model.sort();
        assert_eq!(tree.values(), model, "seed={seed}");
    }
}

#[test]
fn fuzz_red_black_inserts() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let mut tree = RedBlackTree::new();
        let mut model = BTreeSet::new();
        for _ in 0..OPS {
            let v: Value = rng.gen_range(-500..500);
            let steps = tree.insert(v);
            let duplicate = !model.insert(v);
            assert_eq!(
                steps.iter().any(|s| s.severity == Severity::Error),
                duplicate,
                "seed={seed} insert {v}"
            );
            tree.assert_valid()
                .unwrap_or_else(|e| panic!("seed={seed} after {v}: {e}"));
        }
        assert_eq!(tree.len(), model.len(), "seed={seed}");
    }
}

#[test]
fn fuzz_heap_against_sorted_vec() {
    for seed in SEEDS {
        let mut rng = rng(seed);
        let kind = if seed % 2 == 0 {
            HeapKind::Min
        } else {
            HeapKind::Max
        };
        let mut heap = Heap::new(kind);
        let mut model: Vec<Value> = Vec::new();
        for _ in 0..OPS {
            if rng.gen_bool(0.6) {
                let v: Value = rng.gen_range(-50..50);
                heap.insert(v);
                model.push(v);
            } else {
                heap.remove();
                model.sort();
                match kind {
                    HeapKind::Min if !model.is_empty() => {
                        model.remove(0);
                    }
                    HeapKind::Max => {
                        model.pop();
                    }
                    _ => {}
                }
            }
            heap.assert_valid()
                .unwrap_or_else(|e| panic!("seed={seed}: {e}"));
            assert_eq!(heap.len(), model.len(), "seed={seed}");
        }
        let mut expected = model.clone();
        expected.sort();
        if kind == HeapKind::Max {
            expected.reverse();
        }
        let sorted = heap.sort().last().and_then(|s| s.sorted_elements.clone());
        if !expected.is_empty() {
            assert_eq!(sorted, Some(expected), "seed={seed}");
        }
    }
}
