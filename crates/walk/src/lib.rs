//! Pre-order traversal of expression trees with bottom-up rebuilding.
//!
//! A traversal offers every node to a callback, which may replace it, prune its children, or
//! abort the whole walk. Parents are rebuilt only when a child actually changed; everything else
//! is shared with the input tree.

pub mod decision;
pub mod error;
pub mod rewrite;
pub mod walker;

pub use self::{
    decision::{Decision, Outcome},
    error::TraverseError,
    rewrite::{ReplacementTable, Rewrite, replace_all, replace_one, replace_where},
    walker::traverse,
};
