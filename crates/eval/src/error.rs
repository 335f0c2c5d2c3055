use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, Copy, Error)]
#[error("type error, expected {expected}, found {found}")]
pub struct TypeError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl TypeError {
    pub fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cannot evaluate {0} nodes")]
    Unsupported(String),
    #[error("parameter `{0}` is not bound")]
    UnboundParameter(String),
    #[error(transparent)]
    TypeError(#[from] TypeError),
    #[error("integer overflow in `{0}`")]
    Overflow(&'static str),
    #[error("division by zero")]
    DivideByZero,
    #[error("no intrinsic named `{0}`")]
    UnknownMethod(String),
    #[error("{ty} has no member `{name}`")]
    UnknownMember { ty: &'static str, name: String },
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("closure takes {expected} argument(s), got {found}")]
    ArgumentCount { expected: usize, found: usize },
    #[error("call depth limit of {0} exceeded")]
    CallDepth(usize),
    #[error("uncaught throw of `{0}`")]
    Thrown(Value),
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}
