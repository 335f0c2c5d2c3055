//! Expression trees with pre-order traversal, bottom-up rebuilding and lambda splicing.
//!
//! ```
//! use arbor::{Expr, Parameter, Rewrite, Type};
//!
//! let x = Parameter::new("x", Type::Int);
//! let y = Parameter::new("y", Type::Int);
//! let tree = Expr::multiply(
//!     Expr::add(x.expr(), y.expr()),
//!     Expr::subtract(x.expr(), y.expr()),
//! );
//!
//! let replaced = tree.replace_one(x.as_expr(), &Expr::constant(5)).unwrap();
//! assert_eq!(replaced.to_string(), "((5 + y) * (5 - y))");
//! ```

pub use arbor_ast as ast;
pub use arbor_compose as compose;
pub use arbor_eval as eval;
pub use arbor_walk as walk;

pub use self::{
    ast::{Expr, ExprKind, ModelError, Parameter, Type},
    compose::ComposeError,
    eval::{EvalError, EvalSettings, Evaluator, Value},
    walk::{Decision, Outcome, ReplacementTable, Rewrite, TraverseError, traverse},
};
