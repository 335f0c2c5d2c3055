use std::{fmt, sync::Arc};

use crate::types::Type;

/// A literal value held by a constant leaf.
#[derive(Debug, Clone)]
pub enum Constant {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Arc<str>),
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Null, Constant::Null) => true,
            (Constant::Boolean(a), Constant::Boolean(b)) => a == b,
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::String(a), Constant::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Constant::Boolean(b)
    }
}

impl From<i64> for Constant {
    fn from(i: i64) -> Self {
        Constant::Integer(i)
    }
}

impl From<i32> for Constant {
    fn from(i: i32) -> Self {
        Constant::Integer(i.into())
    }
}

impl From<f64> for Constant {
    fn from(f: f64) -> Self {
        Constant::Float(f)
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::String(s.into())
    }
}

impl Constant {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Constant::Null)
    }

    /// The type a constant gets when none is given explicitly.
    pub fn natural_type(&self) -> Type {
        match self {
            Constant::Null => Type::Object,
            Constant::Boolean(_) => Type::Bool,
            Constant::Integer(_) => Type::Int,
            Constant::Float(_) => Type::Float,
            Constant::String(_) => Type::String,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Boolean(b) => write!(f, "{b}"),
            Constant::Integer(i) => write!(f, "{i}"),
            Constant::Float(n) => write!(f, "{n:?}"),
            Constant::String(s) => write!(f, "{s:?}"),
        }
    }
}
