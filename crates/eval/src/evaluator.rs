use arbor_ast::{
    BinaryExpr, BinaryOp, Expr, ExprKind, NewArrayKind, SwitchExpr, Type, TypeBinaryKind,
    UnaryExpr, UnaryOp,
};

use crate::{
    env::Env,
    error::{EvalError, TypeError},
    intrinsics::Intrinsics,
    settings::EvalSettings,
    value::{Closure, Value},
};

/// Evaluates expression trees directly, without compiling them first.
#[derive(Debug)]
pub struct Evaluator {
    settings: EvalSettings,
    intrinsics: Intrinsics,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalSettings::default())
    }
}

impl Evaluator {
    /// An evaluator with the standard intrinsics registered.
    pub fn new(settings: EvalSettings) -> Self {
        Self::with_intrinsics(settings, Intrinsics::standard())
    }

    pub fn with_intrinsics(settings: EvalSettings, intrinsics: Intrinsics) -> Self {
        Self {
            settings,
            intrinsics,
            depth: 0,
        }
    }

    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    pub fn intrinsics_mut(&mut self) -> &mut Intrinsics {
        &mut self.intrinsics
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        self.eval_in(expr, &Env::new())
    }

    /// Evaluate `lambda` and call the resulting closure with `args`.
    pub fn apply(&mut self, lambda: &Expr, args: Vec<Value>) -> Result<Value, EvalError> {
        let function = self.eval(lambda)?;
        self.call(&function, args)
    }

    pub fn call(&mut self, function: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
        let Value::Closure(Closure { lambda: node, env }) = function else {
            return Err(TypeError::new("closure", function).into());
        };
        let Some(lambda) = node.as_lambda() else {
            return Err(EvalError::Unsupported(node.kind_name().to_owned()));
        };
        if lambda.parameters.len() != args.len() {
            return Err(EvalError::ArgumentCount {
                expected: lambda.parameters.len(),
                found: args.len(),
            });
        }
        if self.depth >= self.settings.max_call_depth {
            return Err(EvalError::CallDepth(self.settings.max_call_depth));
        }

        let scope = env.bind(lambda.parameters.iter().zip(args));
        self.depth += 1;
        let result = self.eval_in(&lambda.body, &scope);
        self.depth -= 1;
        result
    }

    pub fn eval_in(&mut self, expr: &Expr, env: &Env) -> Result<Value, EvalError> {
        match expr.kind() {
            ExprKind::Parameter(param) => env.get(expr).ok_or_else(|| {
                EvalError::UnboundParameter(param.name.as_deref().unwrap_or("<unnamed>").to_owned())
            }),
            ExprKind::Constant(c) => Ok(Value::from(&c.value)),
            ExprKind::Default(ty) => Ok(Value::default_for(ty)),
            ExprKind::Unary(unary) => self.unary(unary, env),
            ExprKind::Binary(binary) => self.binary(binary, env),
            ExprKind::Conditional(cond) => {
                if self.eval_in(&cond.test, env)?.to_bool()? {
                    self.eval_in(&cond.if_true, env)
                } else {
                    self.eval_in(&cond.if_false, env)
                }
            }
            ExprKind::Call(call) => {
                let mut args = Vec::with_capacity(call.arguments.len() + 1);
                if let Some(receiver) = &call.receiver {
                    args.push(self.eval_in(receiver, env)?);
                }
                for arg in &call.arguments {
                    args.push(self.eval_in(arg, env)?);
                }
                self.call_intrinsic(&call.method.name, &args)
            }
            ExprKind::Invocation(invocation) => {
                let callee = self.eval_in(&invocation.callee, env)?;
                let args = self.eval_all(&invocation.arguments, env)?;
                self.call(&callee, args)
            }
            ExprKind::Lambda(_) => Ok(Value::Closure(Closure {
                lambda: expr.clone(),
                env: env.clone(),
            })),
            ExprKind::Member(member) => {
                let Some(base) = &member.base else {
                    return Err(EvalError::Unsupported("static Member".to_owned()));
                };
                let base = self.eval_in(base, env)?;
                read_member(&base, &member.member.name)
            }
            ExprKind::New(new) => match &new.ty {
                Type::Tuple(_) => Ok(Value::Tuple(self.eval_all(&new.arguments, env)?.into())),
                ty => Err(EvalError::Unsupported(format!("New {ty}"))),
            },
            ExprKind::NewArray(new_array) => match new_array.kind {
                NewArrayKind::Init => Ok(Value::Array(
                    self.eval_all(&new_array.expressions, env)?.into(),
                )),
                NewArrayKind::Bounds => {
                    let [bound] = new_array.expressions.as_slice() else {
                        return Err(EvalError::Unsupported(
                            "multi-dimensional NewArray".to_owned(),
                        ));
                    };
                    let bound = self.eval_in(bound, env)?;
                    let len = bound
                        .to_integer()
                        .and_then(|len| usize::try_from(len).ok())
                        .ok_or_else(|| TypeError::new("non-negative integer", &bound))?;
                    let fill = Value::default_for(&new_array.element_type);
                    Ok(Value::Array(vec![fill; len].into()))
                }
            },
            ExprKind::TypeBinary(type_binary) => {
                let value = self.eval_in(&type_binary.expr, env)?;
                let ty = &type_binary.type_operand;
                Ok(Value::Boolean(match type_binary.kind {
                    TypeBinaryKind::TypeIs => value.is_instance_of(ty),
                    TypeBinaryKind::TypeEqual => {
                        !matches!(ty, Type::Object) && value.is_instance_of(ty)
                    }
                }))
            }
            ExprKind::Block(block) => {
                let scope = env.bind(
                    block
                        .variables
                        .iter()
                        .map(|var| (var, Value::default_for(var.ty()))),
                );
                let mut last = Value::Null;
                for expr in &block.expressions {
                    last = self.eval_in(expr, &scope)?;
                }
                Ok(last)
            }
            ExprKind::Switch(switch) => self.switch(switch, env),
            ExprKind::ListInit(_)
            | ExprKind::Dynamic(_)
            | ExprKind::Goto(_)
            | ExprKind::Index(_)
            | ExprKind::Label(_)
            | ExprKind::RuntimeVariables(_)
            | ExprKind::Loop(_)
            | ExprKind::Try(_)
            | ExprKind::Extension(_) => Err(EvalError::Unsupported(expr.kind_name().to_owned())),
        }
    }

    fn eval_all(&mut self, exprs: &[Expr], env: &Env) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|expr| self.eval_in(expr, env)).collect()
    }

    fn call_intrinsic(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let function = self
            .intrinsics
            .get(name)
            .ok_or_else(|| EvalError::UnknownMethod(name.to_owned()))?;
        log::trace!("calling intrinsic `{name}` with {} argument(s)", args.len());
        Ok(function(args)?)
    }

    fn unary(&mut self, unary: &UnaryExpr, env: &Env) -> Result<Value, EvalError> {
        match unary.op {
            UnaryOp::PreIncrementAssign => self.step_variable(&unary.operand, 1, true, env),
            UnaryOp::PreDecrementAssign => self.step_variable(&unary.operand, -1, true, env),
            UnaryOp::PostIncrementAssign => self.step_variable(&unary.operand, 1, false, env),
            UnaryOp::PostDecrementAssign => self.step_variable(&unary.operand, -1, false, env),
            op => {
                let value = self.eval_in(&unary.operand, env)?;
                apply_unary(op, value, &unary.ty, self.settings.checked_arithmetic)
            }
        }
    }

    /// Adds `delta` to a variable, returning the new value if `pre` and the old one otherwise.
    fn step_variable(
        &mut self,
        target: &Expr,
        delta: i64,
        pre: bool,
        env: &Env,
    ) -> Result<Value, EvalError> {
        let old = self.eval_in(target, env)?;
        let new = old.add(&Value::Integer(delta), self.settings.checked_arithmetic)?;
        assign(target, new.clone(), env)?;
        Ok(if pre { new } else { old })
    }

    fn binary(&mut self, binary: &BinaryExpr, env: &Env) -> Result<Value, EvalError> {
        match binary.op {
            BinaryOp::AndAlso => {
                if !self.eval_in(&binary.left, env)?.to_bool()? {
                    return Ok(Value::Boolean(false));
                }
                Ok(Value::Boolean(self.eval_in(&binary.right, env)?.to_bool()?))
            }
            BinaryOp::OrElse => {
                if self.eval_in(&binary.left, env)?.to_bool()? {
                    return Ok(Value::Boolean(true));
                }
                Ok(Value::Boolean(self.eval_in(&binary.right, env)?.to_bool()?))
            }
            BinaryOp::Coalesce => {
                let left = self.eval_in(&binary.left, env)?;
                if left.is_null() {
                    self.eval_in(&binary.right, env)
                } else {
                    Ok(left)
                }
            }
            BinaryOp::Assign => {
                let value = self.eval_in(&binary.right, env)?;
                assign(&binary.left, value.clone(), env)?;
                Ok(value)
            }
            op => {
                let left = self.eval_in(&binary.left, env)?;
                let right = self.eval_in(&binary.right, env)?;
                let checked = self.settings.checked_arithmetic;
                match op.compound_operator() {
                    Some(inner) => {
                        let value = apply_binary(inner, &left, &right, checked)?;
                        assign(&binary.left, value.clone(), env)?;
                        Ok(value)
                    }
                    None => apply_binary(op, &left, &right, checked),
                }
            }
        }
    }

    fn switch(&mut self, switch: &SwitchExpr, env: &Env) -> Result<Value, EvalError> {
        let value = self.eval_in(&switch.value, env)?;
        for case in &switch.cases {
            for test in &case.test_values {
                let candidate = self.eval_in(test, env)?;
                let matched = match &switch.comparison {
                    Some(method) => self
                        .call_intrinsic(&method.name, &[value.clone(), candidate])?
                        .to_bool()?,
                    None => value.equal(&candidate),
                };
                if matched {
                    return self.eval_in(&case.body, env);
                }
            }
        }
        match &switch.default_body {
            Some(body) => self.eval_in(body, env),
            None => Ok(Value::Null),
        }
    }
}

fn assign(target: &Expr, value: Value, env: &Env) -> Result<(), EvalError> {
    match target.kind() {
        ExprKind::Parameter(param) => {
            if env.set(target, value) {
                Ok(())
            } else {
                Err(EvalError::UnboundParameter(
                    param.name.as_deref().unwrap_or("<unnamed>").to_owned(),
                ))
            }
        }
        _ => Err(EvalError::Unsupported(format!(
            "assignment to {}",
            target.kind_name()
        ))),
    }
}

fn apply_unary(op: UnaryOp, value: Value, ty: &Type, checked: bool) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Negate => value.negate(checked),
        UnaryOp::NegateChecked => value.negate(true),
        UnaryOp::UnaryPlus => match value {
            Value::Integer(_) | Value::Float(_) => Ok(value),
            other => Err(TypeError::new("number", &other).into()),
        },
        UnaryOp::Not => match value {
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            Value::Integer(i) => Ok(Value::Integer(!i)),
            other => Err(TypeError::new("integer or boolean", &other).into()),
        },
        UnaryOp::OnesComplement => match value {
            Value::Integer(i) => Ok(Value::Integer(!i)),
            other => Err(TypeError::new("integer", &other).into()),
        },
        UnaryOp::IsTrue => Ok(Value::Boolean(value.to_bool()?)),
        UnaryOp::IsFalse => Ok(Value::Boolean(!value.to_bool()?)),
        UnaryOp::Convert => convert(value, ty, checked),
        UnaryOp::ConvertChecked => convert(value, ty, true),
        UnaryOp::TypeAs => Ok(if value.is_instance_of(ty) {
            value
        } else {
            Value::Null
        }),
        UnaryOp::Unbox | UnaryOp::Quote => Ok(value),
        UnaryOp::ArrayLength => match value {
            Value::Array(items) => Ok(Value::Integer(items.len() as i64)),
            other => Err(TypeError::new("array", &other).into()),
        },
        UnaryOp::Throw => Err(EvalError::Thrown(value)),
        UnaryOp::Increment => value.add(&Value::Integer(1), checked),
        UnaryOp::Decrement => value.sub(&Value::Integer(1), checked),
        op => Err(EvalError::Unsupported(format!("Unary {}", op.name()))),
    }
}

fn apply_binary(op: BinaryOp, left: &Value, right: &Value, checked: bool) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => left.add(right, checked),
        BinaryOp::AddChecked => left.add(right, true),
        BinaryOp::Subtract => left.sub(right, checked),
        BinaryOp::SubtractChecked => left.sub(right, true),
        BinaryOp::Multiply => left.mult(right, checked),
        BinaryOp::MultiplyChecked => left.mult(right, true),
        BinaryOp::Divide => left.div(right, checked),
        BinaryOp::Modulo => left.rem(right, checked),
        BinaryOp::Power => left.pow(right, checked),
        BinaryOp::And => left.bit_and(right),
        BinaryOp::Or => left.bit_or(right),
        BinaryOp::ExclusiveOr => left.bit_xor(right),
        BinaryOp::LeftShift => left.shift_left(right),
        BinaryOp::RightShift => left.shift_right(right),
        BinaryOp::Equal => Ok(Value::Boolean(left.equal(right))),
        BinaryOp::NotEqual => Ok(Value::Boolean(!left.equal(right))),
        BinaryOp::LessThan => Ok(Value::Boolean(left.less_than(right)?)),
        BinaryOp::LessThanOrEqual => Ok(Value::Boolean(left.less_equal(right)?)),
        BinaryOp::GreaterThan => Ok(Value::Boolean(right.less_than(left)?)),
        BinaryOp::GreaterThanOrEqual => Ok(Value::Boolean(right.less_equal(left)?)),
        BinaryOp::ArrayIndex => match (left, right) {
            (Value::Array(items), Value::Integer(index)) => usize::try_from(*index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or(EvalError::IndexOutOfRange {
                    index: *index,
                    len: items.len(),
                }),
            (Value::Array(_), other) => Err(TypeError::new("integer", other).into()),
            (other, _) => Err(TypeError::new("array", other).into()),
        },
        op => Err(EvalError::Unsupported(format!("Binary {}", op.symbol()))),
    }
}

fn convert(value: Value, ty: &Type, checked: bool) -> Result<Value, EvalError> {
    match (ty, &value) {
        (Type::Int, Value::Integer(_))
        | (Type::Float, Value::Float(_))
        | (Type::Bool, Value::Boolean(_))
        | (Type::Object | Type::Named(_), _) => Ok(value),
        (Type::Int, Value::Float(f)) => {
            let truncated = f.trunc();
            // `as` saturates, which is the unchecked behavior.
            if checked && !(truncated >= i64::MIN as f64 && truncated < i64::MAX as f64) {
                Err(EvalError::Overflow("Convert"))
            } else {
                Ok(Value::Integer(truncated as i64))
            }
        }
        (Type::Int, Value::Boolean(b)) => Ok(Value::Integer(i64::from(*b))),
        (Type::Float, Value::Integer(i)) => Ok(Value::Float(*i as f64)),
        (Type::String, _) => Ok(Value::String(value.to_string().into())),
        _ if value.is_instance_of(ty) => Ok(value),
        _ => Err(TypeError::new("convertible value", &value).into()),
    }
}

fn read_member(base: &Value, name: &str) -> Result<Value, EvalError> {
    match base {
        Value::Tuple(items) => {
            let item = name
                .strip_prefix("Item")
                .and_then(|k| k.parse::<usize>().ok())
                .and_then(|k| k.checked_sub(1))
                .and_then(|i| items.get(i));
            if let Some(item) = item {
                return Ok(item.clone());
            }
        }
        Value::Array(items) if name == "Length" => return Ok(Value::Integer(items.len() as i64)),
        Value::String(s) if name == "Length" => {
            return Ok(Value::Integer(s.chars().count() as i64));
        }
        _ => {}
    }
    Err(EvalError::UnknownMember {
        ty: base.type_name(),
        name: name.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use arbor_ast::{
        ConstructorRef, MemberRef, MethodRef, Parameter, SwitchCase, UnaryOp,
    };

    use super::*;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    #[test]
    fn arithmetic_lambda() {
        let x = Parameter::new("x", Type::Int);
        let y = Parameter::new("y", Type::Int);
        let f = Expr::lambda(
            Expr::multiply(
                Expr::add(x.expr(), y.expr()),
                Expr::subtract(x.expr(), y.expr()),
            ),
            vec![x, y],
        );

        let mut ev = Evaluator::default();
        assert_eq!(ev.apply(&f, vec![int(5), int(3)]).unwrap(), int(16));
        assert!(matches!(
            ev.apply(&f, vec![int(5)]),
            Err(EvalError::ArgumentCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn closures_capture() {
        let a = Parameter::new("a", Type::Int);
        let b = Parameter::new("b", Type::Int);
        let adder = Expr::lambda(Expr::add(a.expr(), b.expr()), vec![b]);
        let make_adder = Expr::lambda(adder, vec![a]);

        let mut ev = Evaluator::default();
        let add_two = ev.apply(&make_adder, vec![int(2)]).unwrap();
        assert!(matches!(add_two, Value::Closure(_)));
        assert_eq!(ev.call(&add_two, vec![int(3)]).unwrap(), int(5));
        assert_eq!(ev.call(&add_two, vec![int(40)]).unwrap(), int(42));
    }

    #[test]
    fn block_assignment() {
        let v = Parameter::new("v", Type::Int);
        let block = Expr::block(
            vec![v.clone()],
            vec![
                Expr::assign(v.expr(), Expr::constant(2)),
                Expr::binary(BinaryOp::AddAssign, v.expr(), Expr::constant(3)),
                Expr::unary(UnaryOp::PostIncrementAssign, v.expr()),
                v.expr(),
            ],
        );
        assert_eq!(Evaluator::default().eval(&block).unwrap(), int(6));

        let outside = Parameter::new("w", Type::Int);
        let bad = Expr::assign(outside.expr(), Expr::constant(1));
        assert!(matches!(
            Evaluator::default().eval(&bad),
            Err(EvalError::UnboundParameter(name)) if name == "w"
        ));
    }

    #[test]
    fn short_circuit() {
        let boom = Expr::equal(
            Expr::divide(Expr::constant(1), Expr::constant(0)),
            Expr::constant(0),
        );
        let and = Expr::binary(BinaryOp::AndAlso, Expr::constant(false), boom.clone());
        let or = Expr::binary(BinaryOp::OrElse, Expr::constant(true), boom.clone());

        let mut ev = Evaluator::default();
        assert_eq!(ev.eval(&and).unwrap(), Value::Boolean(false));
        assert_eq!(ev.eval(&or).unwrap(), Value::Boolean(true));
        assert!(matches!(ev.eval(&boom), Err(EvalError::DivideByZero)));

        let nand = Expr::not(Expr::binary(BinaryOp::AndAlso, Expr::constant(true), and));
        assert_eq!(ev.eval(&nand).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn checked_settings() {
        let overflow = Expr::add(Expr::constant(i64::MAX), Expr::constant(1));

        let mut wrapping = Evaluator::new(EvalSettings::wrapping());
        assert!(!wrapping.settings().checked_arithmetic);
        assert_eq!(wrapping.settings().max_call_depth, 256);
        assert_eq!(wrapping.eval(&overflow).unwrap(), int(i64::MIN));
        assert!(matches!(
            Evaluator::new(EvalSettings::checked()).eval(&overflow),
            Err(EvalError::Overflow("+"))
        ));

        let always = Expr::binary(BinaryOp::AddChecked, Expr::constant(i64::MAX), Expr::constant(1));
        assert!(matches!(
            Evaluator::default().eval(&always),
            Err(EvalError::Overflow(_))
        ));
    }

    #[test]
    fn intrinsic_calls() {
        let s = Parameter::new("s", Type::String);
        let len = MethodRef::method(Type::String, "Len", [], Type::Int);
        let abs = MethodRef::method(Type::named("Math"), "Abs", [Type::Int], Type::Int);
        let f = Expr::lambda(
            Expr::call(
                None,
                abs,
                vec![Expr::negate(Expr::call(Some(s.expr()), len, vec![]))],
            ),
            vec![s],
        );

        let mut ev = Evaluator::default();
        assert_eq!(ev.apply(&f, vec![Value::from("four")]).unwrap(), int(4));

        let missing = Expr::call(None, MethodRef::function("Nope", [], Type::Int), vec![]);
        assert!(matches!(ev.eval(&missing), Err(EvalError::UnknownMethod(name)) if name == "Nope"));

        ev.intrinsics_mut()
            .insert("Fail", |_| Err(anyhow::anyhow!("host says no")));
        let fail = Expr::call(None, MethodRef::function("Fail", [], Type::Int), vec![]);
        let err = ev.eval(&fail).unwrap_err();
        assert!(matches!(err, EvalError::Host(_)));
        assert_eq!(err.to_string(), "host says no");
    }

    #[test]
    fn tuples_and_arrays() {
        let pair = Type::tuple([Type::Int, Type::String]);
        let new_pair = Expr::new_object(
            ConstructorRef::new(pair.clone(), [Type::Int, Type::String]),
            vec![Expr::constant(7), Expr::constant("seven")],
        );
        let item2 = Expr::member(
            Some(new_pair.clone()),
            MemberRef::field(pair.clone(), "Item2", Type::String),
        );

        let mut ev = Evaluator::default();
        assert_eq!(ev.eval(&item2).unwrap(), Value::from("seven"));
        assert_eq!(
            ev.eval(&Expr::type_is(new_pair, pair)).unwrap(),
            Value::Boolean(true)
        );

        let array = Expr::new_array_init(Type::Int, vec![Expr::constant(1), Expr::constant(2)]);
        let length = Expr::member(
            Some(array.clone()),
            MemberRef::property(Type::array(Type::Int), "Length", Type::Int),
        );
        assert_eq!(ev.eval(&length).unwrap(), int(2));
        assert_eq!(
            ev.eval(&Expr::binary(BinaryOp::ArrayIndex, array.clone(), Expr::constant(1)))
                .unwrap(),
            int(2)
        );
        assert!(matches!(
            ev.eval(&Expr::binary(BinaryOp::ArrayIndex, array, Expr::constant(2))),
            Err(EvalError::IndexOutOfRange { index: 2, len: 2 })
        ));

        let zeros = Expr::new_array_bounds(Type::Int, vec![Expr::constant(3)]);
        assert_eq!(
            ev.eval(&zeros).unwrap().to_string(),
            "[0, 0, 0]"
        );
    }

    #[test]
    fn switch_cases() {
        let v = Parameter::new("v", Type::Int);
        let switch = Expr::lambda(
            Expr::switch(
                v.expr(),
                Some(Expr::constant("many")),
                vec![
                    SwitchCase {
                        test_values: vec![Expr::constant(0)],
                        body: Expr::constant("none"),
                    },
                    SwitchCase {
                        test_values: vec![Expr::constant(1), Expr::constant(2)],
                        body: Expr::constant("few"),
                    },
                ],
                None,
            ),
            vec![v],
        );

        let mut ev = Evaluator::default();
        for (input, expected) in [(0, "none"), (2, "few"), (9, "many")] {
            assert_eq!(
                ev.apply(&switch, vec![int(input)]).unwrap(),
                Value::from(expected)
            );
        }
    }

    #[test]
    fn conversions_and_throw() {
        let mut ev = Evaluator::default();
        let convert = Expr::convert(Expr::constant(2.9), Type::Int);
        assert_eq!(ev.eval(&convert).unwrap(), int(2));

        let huge = Expr::typed_unary(UnaryOp::ConvertChecked, Expr::constant(1e30), Type::Int);
        assert!(matches!(ev.eval(&huge), Err(EvalError::Overflow(_))));

        let throw = Expr::unary(UnaryOp::Throw, Expr::constant("bad"));
        let err = ev.eval(&throw).unwrap_err();
        assert!(matches!(&err, EvalError::Thrown(Value::String(s)) if &**s == "bad"));
    }

    #[test]
    fn call_depth() {
        let x = Parameter::new("x", Type::Int);
        let y = Parameter::new("y", Type::Int);
        let inner = Expr::lambda(y.expr(), vec![y]);
        let outer = Expr::lambda(Expr::invoke(inner, vec![x.expr()]), vec![x]);

        let shallow = EvalSettings {
            max_call_depth: 1,
            ..EvalSettings::default()
        };
        assert!(matches!(
            Evaluator::new(shallow).apply(&outer, vec![int(1)]),
            Err(EvalError::CallDepth(1))
        ));
        assert_eq!(
            Evaluator::default().apply(&outer, vec![int(1)]).unwrap(),
            int(1)
        );
    }

    #[test]
    fn unsupported_kinds() {
        let lp = Expr::loop_with(Expr::constant(1), None, None);
        assert!(matches!(
            Evaluator::default().eval(&lp),
            Err(EvalError::Unsupported(kind)) if kind == "Loop"
        ));

        let x = Parameter::new("x", Type::Int);
        assert!(matches!(
            Evaluator::default().eval(x.as_expr()),
            Err(EvalError::UnboundParameter(_))
        ));
    }
}
