use crate::error::InvariantError;
use crate::util::{self, get_l, get_r, value_of};

use super::types::AvlNode;

/// Cached height of `node`, `-1` for an empty subtree.
#[inline]
pub fn height(arena: &[AvlNode], node: Option<u32>) -> i32 {
    node.map_or(-1, |i| arena[i as usize].height)
}

/// Cached balance factor of `node`, `0` for an empty subtree.
#[inline]
pub fn bf(arena: &[AvlNode], node: Option<u32>) -> i32 {
    node.map_or(0, |i| arena[i as usize].bf)
}

/// Recomputes height and balance factor of `n` from its children.
///
/// Children must already be up to date.
pub fn update_height(arena: &mut [AvlNode], n: u32) {
    let lh = height(arena, get_l(arena, n));
    let rh = height(arena, get_r(arena, n));
    let node = &mut arena[n as usize];
    node.height = 1 + lh.max(rh);
    node.bf = lh - rh;
}

/// Left rotation around `n`; refreshes `n` and then the promoted node.
pub fn rotate_left(arena: &mut [AvlNode], root: &mut Option<u32>, n: u32) -> u32 {
    let promoted = util::rotate_left(arena, root, n);
    update_height(arena, n);
    update_height(arena, promoted);
    promoted
}

/// Right rotation around `n`; refreshes `n` and then the promoted node.
pub fn rotate_right(arena: &mut [AvlNode], root: &mut Option<u32>, n: u32) -> u32 {
    let promoted = util::rotate_right(arena, root, n);
    update_height(arena, n);
    update_height(arena, promoted);
    promoted
}

/// Checks links, strict ordering, cached heights and the balance bound.
pub fn assert_avl_tree(arena: &[AvlNode], root: Option<u32>) -> Result<(), InvariantError> {
    util::assert_links_and_order(arena, root, false)?;

    fn check(arena: &[AvlNode], node: Option<u32>) -> Result<i32, InvariantError> {
        let Some(n) = node else {
            return Ok(-1);
        };
        let lh = check(arena, get_l(arena, n))?;
        let rh = check(arena, get_r(arena, n))?;
        let actual = 1 + lh.max(rh);
        let value = value_of(arena, n);
        let cached = &arena[n as usize];
        if cached.height != actual {
            return Err(InvariantError::StaleHeight {
                value,
                cached: cached.height,
                actual,
            });
        }
        if cached.bf != lh - rh {
            return Err(InvariantError::StaleBalance {
                value,
                cached: cached.bf,
                actual: lh - rh,
            });
        }
        if !(-1..=1).contains(&cached.bf) {
            return Err(InvariantError::Unbalanced {
                value,
                balance_factor: cached.bf,
            });
        }
        Ok(actual)
    }

    check(arena, root).map(|_| ())
}
