use std::{fmt, sync::Arc};

use arbor_ast::{Constant, Expr, Type};

use crate::{
    env::Env,
    error::{EvalError, TypeError},
};

/// A lambda node together with the environment it was evaluated in.
#[derive(Clone)]
pub struct Closure {
    pub lambda: Expr,
    pub env: Env,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("lambda", &format_args!("{}", self.lambda))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(Arc<str>),
    Tuple(Arc<[Value]>),
    Array(Arc<[Value]>),
    Closure(Closure),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) | (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => {
                a.lambda.ptr_eq(&b.lambda) && a.env.ptr_eq(&b.env)
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<&Constant> for Value {
    fn from(c: &Constant) -> Self {
        match c {
            Constant::Null => Value::Null,
            Constant::Boolean(b) => Value::Boolean(*b),
            Constant::Integer(i) => Value::Integer(*i),
            Constant::Float(f) => Value::Float(*f),
            Constant::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Tuple(items) | Value::Array(items) => {
                let (open, close) = match self {
                    Value::Tuple(_) => ("(", ")"),
                    _ => ("[", "]"),
                };
                write!(f, "{open}")?;
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "{close}")
            }
            Value::Closure(closure) => write!(f, "<closure {}>", closure.lambda),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Tuple(_) => "tuple",
            Value::Array(_) => "array",
            Value::Closure(_) => "closure",
        }
    }

    /// The value a variable of type `ty` holds before it is assigned.
    pub fn default_for(ty: &Type) -> Self {
        match ty {
            Type::Bool => Value::Boolean(false),
            Type::Int => Value::Integer(0),
            Type::Float => Value::Float(0.0),
            _ => Value::Null,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_instance_of(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Value::Null, _) => false,
            (_, Type::Object) => true,
            (Value::Boolean(_), Type::Bool)
            | (Value::Integer(_), Type::Int)
            | (Value::Float(_), Type::Float)
            | (Value::String(_), Type::String) => true,
            (Value::Array(items), Type::Array(element)) => {
                items.iter().all(|item| item.is_null() || item.is_instance_of(element))
            }
            (Value::Tuple(items), Type::Tuple(fields)) => {
                items.len() == fields.len()
                    && items.iter().zip(fields).all(|(item, field)| {
                        item.is_null() || item.is_instance_of(field)
                    })
            }
            (Value::Closure(closure), Type::Function(..)) => closure.lambda.ty() == *ty,
            _ => false,
        }
    }

    pub fn to_bool(&self) -> Result<bool, TypeError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(TypeError::new("boolean", other)),
        }
    }

    #[inline]
    pub fn to_integer(&self) -> Option<i64> {
        match *self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    #[inline]
    pub fn to_float(&self) -> Option<f64> {
        match *self {
            Value::Integer(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn negate(&self, checked: bool) -> Result<Value, EvalError> {
        match *self {
            Value::Integer(i) if checked => i
                .checked_neg()
                .map(Value::Integer)
                .ok_or(EvalError::Overflow("-")),
            Value::Integer(i) => Ok(Value::Integer(i.wrapping_neg())),
            Value::Float(f) => Ok(Value::Float(-f)),
            ref other => Err(TypeError::new("number", other).into()),
        }
    }

    pub fn add(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                integer_op("+", *a, *b, checked, i64::checked_add, i64::wrapping_add)
            }
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}").into())),
            _ => float_op(self, other, |a, b| a + b),
        }
    }

    pub fn sub(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                integer_op("-", *a, *b, checked, i64::checked_sub, i64::wrapping_sub)
            }
            _ => float_op(self, other, |a, b| a - b),
        }
    }

    pub fn mult(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                integer_op("*", *a, *b, checked, i64::checked_mul, i64::wrapping_mul)
            }
            _ => float_op(self, other, |a, b| a * b),
        }
    }

    pub fn div(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Err(EvalError::DivideByZero),
            (Value::Integer(a), Value::Integer(b)) => {
                integer_op("/", *a, *b, checked, i64::checked_div, i64::wrapping_div)
            }
            _ => float_op(self, other, |a, b| a / b),
        }
    }

    pub fn rem(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Err(EvalError::DivideByZero),
            (Value::Integer(a), Value::Integer(b)) => {
                integer_op("%", *a, *b, checked, i64::checked_rem, i64::wrapping_rem)
            }
            _ => float_op(self, other, |a, b| a % b),
        }
    }

    pub fn pow(&self, other: &Value, checked: bool) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) if (0..=i64::from(u32::MAX)).contains(b) => {
                let exp = *b as u32;
                if checked {
                    a.checked_pow(exp)
                        .map(Value::Integer)
                        .ok_or(EvalError::Overflow("**"))
                } else {
                    Ok(Value::Integer(a.wrapping_pow(exp)))
                }
            }
            _ => float_op(self, other, f64::powf),
        }
    }

    pub fn bit_and(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a & b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a & b)),
            _ => Err(operand_error("integer or boolean", self, other, is_bits).into()),
        }
    }

    pub fn bit_or(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a | b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a | b)),
            _ => Err(operand_error("integer or boolean", self, other, is_bits).into()),
        }
    }

    pub fn bit_xor(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a ^ b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a ^ b)),
            _ => Err(operand_error("integer or boolean", self, other, is_bits).into()),
        }
    }

    pub fn shift_left(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_shl(*b as u32))),
            _ => Err(operand_error("integer", self, other, is_integer).into()),
        }
    }

    pub fn shift_right(&self, other: &Value) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_shr(*b as u32))),
            _ => Err(operand_error("integer", self, other, is_integer).into()),
        }
    }

    /// Equality as the `==` operator sees it: numbers compare across integer and float.
    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Integer(b)) => *a == *b as f64,
            (Value::Float(a), Value::Float(b)) => a == b,
            _ => self == other,
        }
    }

    pub fn less_than(&self, other: &Value) -> Result<bool, TypeError> {
        self.compare(other, |o| o.is_lt())
    }

    pub fn less_equal(&self, other: &Value) -> Result<bool, TypeError> {
        self.compare(other, |o| o.is_le())
    }

    fn compare(
        &self,
        other: &Value,
        test: impl FnOnce(std::cmp::Ordering) -> bool,
    ) -> Result<bool, TypeError> {
        let ordering = match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => match (self.to_float(), other.to_float()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => {
                    return Err(operand_error("number or string", self, other, |v| {
                        is_number(v) || matches!(v, Value::String(_))
                    }));
                }
            },
        };
        // NaN compares false both ways.
        Ok(ordering.is_some_and(test))
    }
}

fn integer_op(
    op: &'static str,
    a: i64,
    b: i64,
    checked: bool,
    checked_fn: fn(i64, i64) -> Option<i64>,
    wrapping_fn: fn(i64, i64) -> i64,
) -> Result<Value, EvalError> {
    if checked {
        checked_fn(a, b)
            .map(Value::Integer)
            .ok_or(EvalError::Overflow(op))
    } else {
        Ok(Value::Integer(wrapping_fn(a, b)))
    }
}

fn float_op(a: &Value, b: &Value, f: impl FnOnce(f64, f64) -> f64) -> Result<Value, EvalError> {
    match (a.to_float(), b.to_float()) {
        (Some(x), Some(y)) => Ok(Value::Float(f(x, y))),
        _ => Err(operand_error("number", a, b, is_number).into()),
    }
}

/// Blames whichever operand does not `fit`, preferring the left one.
fn operand_error(
    expected: &'static str,
    a: &Value,
    b: &Value,
    fits: impl Fn(&Value) -> bool,
) -> TypeError {
    let found = if fits(a) { b } else { a };
    TypeError::new(expected, found)
}

fn is_number(v: &Value) -> bool {
    v.to_float().is_some()
}

fn is_bits(v: &Value) -> bool {
    matches!(v, Value::Integer(_) | Value::Boolean(_))
}

fn is_integer(v: &Value) -> bool {
    matches!(v, Value::Integer(_))
}
