use std::{fmt, sync::Arc};

/// The static result type of an expression.
///
/// Types are plain metadata: the traversal engine copies them verbatim and never inspects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Bool,
    Int,
    Float,
    String,
    Object,
    Named(Arc<str>),
    Array(Box<Type>),
    Tuple(Vec<Type>),
    Function(Vec<Type>, Box<Type>),
}

impl Type {
    pub fn named(name: &str) -> Self {
        Type::Named(name.into())
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn tuple(fields: impl IntoIterator<Item = Type>) -> Self {
        Type::Tuple(fields.into_iter().collect())
    }

    pub fn function(parameters: impl IntoIterator<Item = Type>, ret: Type) -> Self {
        Type::Function(parameters.into_iter().collect(), Box::new(ret))
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// The return type of a function type.
    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function(_, ret) => Some(ret),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Object => write!(f, "object"),
            Type::Named(name) => write!(f, "{name}"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Tuple(fields) => {
                write!(f, "(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{field}")?;
                }
                write!(f, ")")
            }
            Type::Function(parameters, ret) => {
                write!(f, "fn(")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
        }
    }
}
