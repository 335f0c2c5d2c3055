use std::{collections::HashMap, fmt, rc::Rc, sync::Arc};

use anyhow::{anyhow, ensure};

use crate::{error::TypeError, value::Value};

pub type IntrinsicFn = dyn Fn(&[Value]) -> anyhow::Result<Value>;

/// Host functions that `Call` nodes resolve to, by method name.
///
/// A call with a receiver passes the receiver as the first argument.
#[derive(Clone, Default)]
pub struct Intrinsics {
    functions: HashMap<Arc<str>, Rc<IntrinsicFn>>,
}

impl fmt::Debug for Intrinsics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_set().entries(names).finish()
    }
}

impl Intrinsics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small set of math and string helpers.
    pub fn standard() -> Self {
        let mut lib = Self::new();

        lib.insert("Abs", |args| {
            let [arg] = args_of("Abs", args)?;
            match *arg {
                Value::Integer(i) => i
                    .checked_abs()
                    .map(Value::Integer)
                    .ok_or_else(|| anyhow!("integer overflow in `Abs`")),
                Value::Float(f) => Ok(Value::Float(f.abs())),
                ref other => Err(TypeError::new("number", other).into()),
            }
        });

        lib.insert("Max", |args| {
            let [a, b] = args_of("Max", args)?;
            Ok(if a.less_than(b)? { b.clone() } else { a.clone() })
        });

        lib.insert("Min", |args| {
            let [a, b] = args_of("Min", args)?;
            Ok(if b.less_than(a)? { b.clone() } else { a.clone() })
        });

        lib.insert("Sqrt", |args| {
            let [arg] = args_of("Sqrt", args)?;
            let f = arg
                .to_float()
                .ok_or_else(|| TypeError::new("number", arg))?;
            Ok(Value::Float(f.sqrt()))
        });

        lib.insert("Len", |args| {
            let [arg] = args_of("Len", args)?;
            let len = match arg {
                Value::String(s) => s.chars().count(),
                Value::Array(items) | Value::Tuple(items) => items.len(),
                other => return Err(TypeError::new("string or array", other).into()),
            };
            Ok(Value::Integer(len as i64))
        });

        lib.insert("Concat", |args| {
            let joined: String = args.iter().map(ToString::to_string).collect();
            Ok(Value::String(joined.into()))
        });

        lib.insert("ToString", |args| {
            let [arg] = args_of("ToString", args)?;
            Ok(Value::String(arg.to_string().into()))
        });

        lib
    }

    pub fn insert(
        &mut self,
        name: &str,
        function: impl Fn(&[Value]) -> anyhow::Result<Value> + 'static,
    ) {
        self.functions.insert(name.into(), Rc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<&IntrinsicFn> {
        self.functions.get(name).map(|f| &**f)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

fn args_of<'a, const N: usize>(name: &str, args: &'a [Value]) -> anyhow::Result<&'a [Value; N]> {
    ensure!(
        args.len() == N,
        "`{name}` takes {N} argument(s), got {}",
        args.len()
    );
    Ok(<&[Value; N]>::try_from(args)?)
}
