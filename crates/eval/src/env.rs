use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use arbor_ast::{Expr, Parameter};

use crate::value::Value;

/// Variable bindings, keyed by parameter identity.
///
/// Scopes are shared between closures that captured them, so an assignment through one is seen
/// by all of them.
#[derive(Clone, Default)]
pub struct Env(Option<Rc<Scope>>);

struct Scope {
    vars: HashMap<Expr, RefCell<Value>>,
    parent: Env,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut env = self;
        while let Some(scope) = &env.0 {
            depth += 1;
            env = &scope.parent;
        }
        f.debug_struct("Env").field("depth", &depth).finish()
    }
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope binding each parameter to its value.
    pub fn bind<'a>(&self, bindings: impl IntoIterator<Item = (&'a Parameter, Value)>) -> Env {
        let vars = bindings
            .into_iter()
            .map(|(param, value)| (param.expr(), RefCell::new(value)))
            .collect();
        Env(Some(Rc::new(Scope {
            vars,
            parent: self.clone(),
        })))
    }

    pub fn get(&self, param: &Expr) -> Option<Value> {
        self.lookup(param).map(|cell| cell.borrow().clone())
    }

    /// Overwrite the innermost binding of `param`, returning `false` if it is unbound.
    pub fn set(&self, param: &Expr, value: Value) -> bool {
        match self.lookup(param) {
            Some(cell) => {
                *cell.borrow_mut() = value;
                true
            }
            None => false,
        }
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn lookup(&self, param: &Expr) -> Option<&RefCell<Value>> {
        let mut env = self;
        while let Some(scope) = &env.0 {
            if let Some(cell) = scope.vars.get(param) {
                return Some(cell);
            }
            env = &scope.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use arbor_ast::Type;

    use super::*;

    #[test]
    fn shadowing_and_assignment() {
        let x = Parameter::new("x", Type::Int);
        let y = Parameter::new("y", Type::Int);

        let outer = Env::new().bind([(&x, Value::Integer(1)), (&y, Value::Integer(2))]);
        let inner = outer.bind([(&x, Value::Integer(10))]);

        assert_eq!(inner.get(x.as_expr()), Some(Value::Integer(10)));
        assert_eq!(inner.get(y.as_expr()), Some(Value::Integer(2)));

        assert!(inner.set(y.as_expr(), Value::Integer(20)));
        assert_eq!(outer.get(y.as_expr()), Some(Value::Integer(20)));

        let z = Parameter::new("z", Type::Int);
        assert_eq!(inner.get(z.as_expr()), None);
        assert!(!inner.set(z.as_expr(), Value::Null));
    }
}
