//! Arena helpers shared by the linked engines.
//!
//! All functions operate on `(arena, index)` pairs. Functions that can change
//! which node sits at the top of the tree take the owning `root` slot by
//! mutable reference and keep it in sync with the parent links.

use std::cmp::Ordering;

use crate::error::InvariantError;
use crate::types::{Node, StepNode, Value};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

#[inline]
pub(crate) fn value_of<N: StepNode>(arena: &[N], idx: u32) -> Value {
    arena[idx as usize].value()
}

/// Iterative BST lookup. Equal values stop the descent.
pub fn find<N: StepNode>(arena: &[N], root: Option<u32>, value: Value) -> Option<u32> {
    let mut curr = root;
    while let Some(i) = curr {
        curr = match value.cmp(&value_of(arena, i)) {
            Ordering::Equal => return Some(i),
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
        };
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Values under `root` in left-node-right order.
pub fn inorder_values<N: StepNode>(arena: &[N], root: Option<u32>) -> Vec<Value> {
    fn walk<N: StepNode>(arena: &[N], node: Option<u32>, out: &mut Vec<Value>) {
        if let Some(i) = node {
            walk(arena, get_l(arena, i), out);
            out.push(value_of(arena, i));
            walk(arena, get_r(arena, i), out);
        }
    }
    let mut out = Vec::new();
    walk(arena, root, &mut out);
    out
}

/// Points whatever referenced `old` (its parent's child slot, or the root
/// slot) at `new`.
pub(crate) fn replace_child<N: Node>(
    arena: &mut [N],
    root: &mut Option<u32>,
    parent: Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    match parent {
        Some(p) if get_l(arena, p) == Some(old) => set_l(arena, p, new),
        Some(p) => set_r(arena, p, new),
        None => *root = new,
    }
}

/// Splices `child` into the slot held by `node` and detaches `node`.
///
/// `node` must have at most one child and `child` must be that child.
pub(crate) fn transplant<N: Node>(
    arena: &mut [N],
    root: &mut Option<u32>,
    node: u32,
    child: Option<u32>,
) {
    let p = get_p(arena, node);
    if let Some(c) = child {
        set_p(arena, c, p);
    }
    replace_child(arena, root, p, node, child);
    set_p(arena, node, None);
    set_l(arena, node, None);
    set_r(arena, node, None);
}

/// Lifts the right child of `n` into its place. Returns the promoted node.
pub(crate) fn rotate_left<N: Node>(arena: &mut [N], root: &mut Option<u32>, n: u32) -> u32 {
    let nr = get_r(arena, n).expect("left rotation needs a right child");
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    set_p(arena, nr, p);
    replace_child(arena, root, p, n, Some(nr));
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));
    nr
}

/// Lifts the left child of `n` into its place. Returns the promoted node.
pub(crate) fn rotate_right<N: Node>(arena: &mut [N], root: &mut Option<u32>, n: u32) -> u32 {
    let nl = get_l(arena, n).expect("right rotation needs a left child");
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    set_p(arena, nl, p);
    replace_child(arena, root, p, n, Some(nl));
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));
    nl
}

/// Checks parent links and BST ordering under `root`.
///
/// With `equal_goes_right` a right subtree may hold values equal to its
/// ancestor, matching an insert that routes ties to the right.
pub fn assert_links_and_order<N: StepNode>(
    arena: &[N],
    root: Option<u32>,
    equal_goes_right: bool,
) -> Result<(), InvariantError> {
    let Some(root) = root else {
        return Ok(());
    };
    if get_p(arena, root).is_some() {
        return Err(InvariantError::RootHasParent);
    }

    // (node, lower bound and whether it is inclusive, exclusive upper bound)
    let mut stack: Vec<(u32, Option<(Value, bool)>, Option<Value>)> = vec![(root, None, None)];
    while let Some((node, lower, upper)) = stack.pop() {
        let value = value_of(arena, node);
        let above_lower = match lower {
            None => true,
            Some((bound, true)) => value >= bound,
            Some((bound, false)) => value > bound,
        };
        let below_upper = upper.map_or(true, |bound| value < bound);
        if !above_lower || !below_upper {
            return Err(InvariantError::OrderViolated(value));
        }
        if let Some(l) = get_l(arena, node) {
            if get_p(arena, l) != Some(node) {
                return Err(InvariantError::BrokenParentLink(value));
            }
            stack.push((l, lower, Some(value)));
        }
        if let Some(r) = get_r(arena, node) {
            if get_p(arena, r) != Some(node) {
                return Err(InvariantError::BrokenParentLink(value));
            }
            stack.push((r, Some((value, equal_goes_right)), upper));
        }
    }
    Ok(())
}
