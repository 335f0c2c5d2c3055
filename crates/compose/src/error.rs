use arbor_ast::Type;
use arbor_walk::TraverseError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ComposeError {
    #[error("{helper} expects a Lambda node, found {found}")]
    NotALambda {
        helper: &'static str,
        found: String,
    },
    #[error("{helper} expects a lambda of {expected} parameter(s), found {found}")]
    Arity {
        helper: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{helper} cannot splice a `{found}` where a `{expected}` is expected")]
    TypeMismatch {
        helper: &'static str,
        expected: Type,
        found: Type,
    },
    #[error(transparent)]
    Traverse(#[from] TraverseError),
}
