//! Index math and array helpers for the binary heap.

use crate::error::InvariantError;
use crate::step::NodeSnapshot;
use crate::types::{HeapKind, NodeId, Value};

#[inline]
pub fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline]
pub fn left(i: usize) -> usize {
    2 * i + 1
}

#[inline]
pub fn right(i: usize) -> usize {
    2 * i + 2
}

/// Child of `i` that should swap with it, if any.
///
/// The left child is considered first; the right child wins only when it is
/// strictly preferred over the best candidate so far.
pub fn sift_target(items: &[Value], i: usize, kind: HeapKind) -> Option<usize> {
    let mut best = i;
    let (l, r) = (left(i), right(i));
    if l < items.len() && kind.prefers(items[l], items[best]) {
        best = l;
    }
    if r < items.len() && kind.prefers(items[r], items[best]) {
        best = r;
    }
    (best != i).then_some(best)
}

/// Parent of `i` that should swap with it while bubbling up, if any.
pub fn bubble_target(items: &[Value], i: usize, kind: HeapKind) -> Option<usize> {
    if i == 0 {
        return None;
    }
    let p = parent(i);
    kind.prefers(items[i], items[p]).then_some(p)
}

/// Links the array into the implicit complete binary tree.
pub fn build_snapshot<F>(items: &[Value], id_of: F) -> Option<NodeSnapshot>
where
    F: Fn(usize, Value) -> NodeId,
{
    fn at<F: Fn(usize, Value) -> NodeId>(
        items: &[Value],
        i: usize,
        id_of: &F,
    ) -> Option<Box<NodeSnapshot>> {
        let value = *items.get(i)?;
        let mut node = NodeSnapshot::new(id_of(i, value), value);
        node.left = at(items, left(i), id_of);
        node.right = at(items, right(i), id_of);
        Some(Box::new(node))
    }
    at(items, 0, &id_of).map(|b| *b)
}

pub fn assert_heap(items: &[Value], kind: HeapKind) -> Result<(), InvariantError> {
    for child in 1..items.len() {
        let p = parent(child);
        if kind.prefers(items[child], items[p]) {
            return Err(InvariantError::HeapOrder { parent: p, child });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_math() {
        assert_eq!(parent(1), 0);
        assert_eq!(parent(2), 0);
        assert_eq!(parent(6), 2);
        assert_eq!((left(3), right(3)), (7, 8));
    }

    #[test]
    fn sift_prefers_left_on_ties() {
        assert_eq!(sift_target(&[9, 2, 2], 0, HeapKind::Min), Some(1));
        assert_eq!(sift_target(&[9, 3, 2], 0, HeapKind::Min), Some(2));
        assert_eq!(sift_target(&[1, 3, 2], 0, HeapKind::Min), None);
        assert_eq!(sift_target(&[1, 3, 2], 0, HeapKind::Max), Some(1));
    }

    #[test]
    fn snapshot_follows_index_layout() {
        let tree = build_snapshot(&[1, 3, 8, 5], |i, _| NodeId::new("heap-sort", i as u32)).unwrap();
        assert_eq!(tree.value, 1);
        assert_eq!(tree.left().and_then(|l| l.left()).map(|n| n.value), Some(5));
        assert_eq!(tree.right().map(|n| n.id.to_string()), Some("heap-sort-2".to_string()));
        assert!(build_snapshot(&[], |i, _| NodeId::new("heap", i as u32)).is_none());
    }

    #[test]
    fn heap_order_check() {
        assert!(assert_heap(&[1, 3, 8, 5], HeapKind::Min).is_ok());
        assert_eq!(
            assert_heap(&[1, 3, 8, 2], HeapKind::Min),
            Err(InvariantError::HeapOrder { parent: 1, child: 3 })
        );
        assert!(assert_heap(&[8, 5, 3, 1], HeapKind::Max).is_ok());
    }
}
