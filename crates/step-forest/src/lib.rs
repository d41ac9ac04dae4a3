//! Step-recording tree and heap engines.
//!
//! Every engine owns one structure for its lifetime and answers each
//! operation with an ordered batch of [`Step`]s. A step carries a deep copy of
//! the whole structure at that instant plus the text and metadata a viewer
//! needs to scrub through the algorithm.
//!
//! All "pointers" are `Option<u32>` indices into an engine-owned `Vec` arena.
//! Parent links exist only for rotation bookkeeping and never leave the
//! engine: snapshots follow left/right children only.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] link trait, [`NodeId`], [`Color`], [`HeapKind`] |
//! | [`util`] | arena helpers: `find`, `transplant`, rotations, link validation |
//! | [`step`] | [`Step`], [`NodeSnapshot`], [`StepMeta`] payloads |
//! | [`recorder`] | [`StepRecorder`] and the snapshot contract |
//! | [`traversal`] | [`TraversalKind`] and the shared traversal routine |
//! | [`search`] | the shared iterative search routine |
//! | [`bst`] | [`BinaryTree`] |
//! | [`heap`] | [`Heap`] |
//! | [`avl`] | [`AvlTree`] |
//! | [`red_black`] | [`RedBlackTree`] |

pub mod avl;
pub mod bst;
pub mod error;
pub mod heap;
pub mod recorder;
pub mod red_black;
pub mod search;
pub mod step;
pub mod traversal;
pub mod types;
pub mod util;

pub use avl::AvlTree;
pub use bst::BinaryTree;
pub use error::{InvariantError, ParseError};
pub use heap::Heap;
pub use recorder::{snapshot, StepDraft, StepRecorder};
pub use red_black::RedBlackTree;
pub use step::{
    BalanceMeta, Comparison, Direction, EdgeId, FixupCase, HeapMeta, ImbalanceCase, InsertMeta,
    NodeSnapshot, OperationKind, RecolorMeta, RemoveCase, RemoveMeta, RotationMeta, SearchMeta,
    Severity, SortMeta, Step, StepMeta, TraverseMeta,
};
pub use traversal::{Traversal, TraversalKind};
pub use types::{Color, HeapKind, Node, NodeId, StepNode, Value};
