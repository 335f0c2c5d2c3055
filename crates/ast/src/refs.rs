//! Opaque references carried by nodes as metadata.
//!
//! None of these are ever traversed. A rebuilt node receives exactly the reference its original
//! carried.

use std::{fmt, hash, sync::Arc};

use crate::types::Type;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: Arc<str>,
    /// `None` for free functions, otherwise the type the method is declared on.
    pub declaring_type: Option<Type>,
    pub parameters: Vec<Type>,
    pub return_type: Type,
}

impl MethodRef {
    pub fn function(name: &str, parameters: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            parameters: parameters.into_iter().collect(),
            return_type: ret,
        }
    }

    pub fn method(
        declaring_type: Type,
        name: &str,
        parameters: impl IntoIterator<Item = Type>,
        ret: Type,
    ) -> Self {
        Self {
            name: name.into(),
            declaring_type: Some(declaring_type),
            parameters: parameters.into_iter().collect(),
            return_type: ret,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub kind: MemberKind,
    pub name: Arc<str>,
    pub declaring_type: Type,
    pub ty: Type,
}

impl MemberRef {
    pub fn field(declaring_type: Type, name: &str, ty: Type) -> Self {
        Self {
            kind: MemberKind::Field,
            name: name.into(),
            declaring_type,
            ty,
        }
    }

    pub fn property(declaring_type: Type, name: &str, ty: Type) -> Self {
        Self {
            kind: MemberKind::Property,
            name: name.into(),
            declaring_type,
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorRef {
    pub declaring_type: Type,
    pub parameters: Vec<Type>,
}

impl ConstructorRef {
    pub fn new(declaring_type: Type, parameters: impl IntoIterator<Item = Type>) -> Self {
        Self {
            declaring_type,
            parameters: parameters.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexerRef {
    pub declaring_type: Type,
    pub parameters: Vec<Type>,
    pub ty: Type,
}

impl IndexerRef {
    pub fn new(declaring_type: Type, parameters: impl IntoIterator<Item = Type>, ty: Type) -> Self {
        Self {
            declaring_type,
            parameters: parameters.into_iter().collect(),
            ty,
        }
    }
}

/// Late-bound operation descriptor for dynamic calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binder {
    pub operation: Arc<str>,
}

impl Binder {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

#[derive(Debug)]
struct LabelInner {
    name: Option<Arc<str>>,
    ty: Type,
}

/// A jump target shared between `Goto`, `Label` and `Loop` nodes.
///
/// Like expressions, label targets compare by identity: two targets with the same name are
/// different targets.
#[derive(Debug, Clone)]
pub struct LabelTarget(Arc<LabelInner>);

impl LabelTarget {
    pub fn new(name: Option<&str>, ty: Type) -> Self {
        Self(Arc::new(LabelInner {
            name: name.map(Into::into),
            ty,
        }))
    }

    pub fn named(name: &str) -> Self {
        Self::new(Some(name), Type::Void)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }
}

impl PartialEq for LabelTarget {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LabelTarget {}

impl hash::Hash for LabelTarget {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "UnnamedLabel"),
        }
    }
}
