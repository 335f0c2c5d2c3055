//! A tree-walking evaluator for expression trees.
//!
//! Supports the arithmetic, closure and data-construction node kinds. Calls resolve to host
//! [`Intrinsics`] by method name.

pub mod env;
pub mod error;
pub mod evaluator;
pub mod intrinsics;
pub mod settings;
pub mod value;

pub use self::{
    env::Env,
    error::{EvalError, TypeError},
    evaluator::Evaluator,
    intrinsics::{IntrinsicFn, Intrinsics},
    settings::EvalSettings,
    value::{Closure, Value},
};
