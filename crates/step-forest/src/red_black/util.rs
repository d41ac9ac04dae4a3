use crate::error::InvariantError;
use crate::types::Color;
use crate::util::{self, get_l, get_r, value_of};

use super::types::RbNode;

/// Color of `node`; empty subtrees count as black.
#[inline]
pub fn color(arena: &[RbNode], node: Option<u32>) -> Color {
    node.map_or(Color::Black, |i| arena[i as usize].color)
}

#[inline]
pub fn is_red(arena: &[RbNode], node: Option<u32>) -> bool {
    color(arena, node) == Color::Red
}

#[inline]
pub fn set_color(arena: &mut [RbNode], i: u32, c: Color) {
    arena[i as usize].color = c;
}

/// Checks links, strict ordering and the red-black coloring rules.
pub fn assert_red_black_tree(arena: &[RbNode], root: Option<u32>) -> Result<(), InvariantError> {
    util::assert_links_and_order(arena, root, false)?;
    if is_red(arena, root) {
        return Err(InvariantError::RedRoot);
    }

    fn black_height(arena: &[RbNode], node: Option<u32>) -> Result<usize, InvariantError> {
        let Some(n) = node else {
            return Ok(0);
        };
        let (l, r) = (get_l(arena, n), get_r(arena, n));
        if is_red(arena, Some(n)) && (is_red(arena, l) || is_red(arena, r)) {
            return Err(InvariantError::RedRed(value_of(arena, n)));
        }
        let lh = black_height(arena, l)?;
        let rh = black_height(arena, r)?;
        if lh != rh {
            return Err(InvariantError::BlackHeight(value_of(arena, n)));
        }
        Ok(lh + usize::from(!is_red(arena, Some(n))))
    }

    black_height(arena, root).map(|_| ())
}
