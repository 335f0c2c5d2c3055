use std::fmt;

use crate::{
    expr::{Expr, ExprKind, Parameter},
    ops::{BinaryOp, GotoKind, NewArrayKind, TypeBinaryKind, UnaryOp},
};

struct Separated<'a, T>(&'a [T], &'static str);

impl<T: fmt::Display> fmt::Display for Separated<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(self.1)?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

fn comma<T>(items: &[T]) -> Separated<'_, T> {
    Separated(items, ", ")
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_expr(), f)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Parameter(param) => match &param.name {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "Param_{:p}", self.kind()),
            },
            ExprKind::Constant(c) => write!(f, "{}", c.value),
            ExprKind::Default(ty) => write!(f, "default({ty})"),
            ExprKind::Unary(unary) => {
                let operand = &unary.operand;
                match unary.op {
                    UnaryOp::Negate | UnaryOp::NegateChecked => write!(f, "-{operand}"),
                    UnaryOp::UnaryPlus => write!(f, "+{operand}"),
                    UnaryOp::OnesComplement => write!(f, "~{operand}"),
                    UnaryOp::PreIncrementAssign => write!(f, "++{operand}"),
                    UnaryOp::PreDecrementAssign => write!(f, "--{operand}"),
                    UnaryOp::PostIncrementAssign => write!(f, "{operand}++"),
                    UnaryOp::PostDecrementAssign => write!(f, "{operand}--"),
                    UnaryOp::Quote => write!(f, "{operand}"),
                    UnaryOp::TypeAs => write!(f, "({operand} as {})", unary.ty),
                    UnaryOp::Convert | UnaryOp::ConvertChecked | UnaryOp::Unbox => {
                        write!(f, "{}({operand}, {})", unary.op.name(), unary.ty)
                    }
                    op => write!(f, "{}({operand})", op.name()),
                }
            }
            ExprKind::Binary(binary) => match binary.op {
                BinaryOp::ArrayIndex => write!(f, "{}[{}]", binary.left, binary.right),
                op => write!(f, "({} {} {})", binary.left, op.symbol(), binary.right),
            },
            ExprKind::Conditional(cond) => {
                write!(f, "IIF({}, {}, {})", cond.test, cond.if_true, cond.if_false)
            }
            ExprKind::Call(call) => {
                match (&call.receiver, &call.method.declaring_type) {
                    (Some(receiver), _) => write!(f, "{receiver}.")?,
                    (None, Some(ty)) => write!(f, "{ty}.")?,
                    (None, None) => {}
                }
                write!(f, "{}({})", call.method.name, comma(&call.arguments))
            }
            ExprKind::Invocation(invocation) => {
                write!(f, "Invoke({}", invocation.callee)?;
                for arg in &invocation.arguments {
                    write!(f, ", {arg}")?;
                }
                write!(f, ")")
            }
            ExprKind::Lambda(lambda) => {
                if let [param] = lambda.parameters.as_slice() {
                    write!(f, "{param} => {}", lambda.body)
                } else {
                    write!(f, "({}) => {}", comma(&lambda.parameters), lambda.body)
                }
            }
            ExprKind::ListInit(list_init) => {
                write!(f, "{} {{", list_init.new)?;
                for (i, init) in list_init.initializers.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "{}({})",
                        init.add_method.name,
                        comma(&init.arguments)
                    )?;
                }
                write!(f, "}}")
            }
            ExprKind::Member(member) => match &member.base {
                Some(base) => write!(f, "{base}.{}", member.member.name),
                None => write!(
                    f,
                    "{}.{}",
                    member.member.declaring_type, member.member.name
                ),
            },
            ExprKind::New(new) => write!(f, "new {}({})", new.ty, comma(&new.arguments)),
            ExprKind::NewArray(new_array) => match new_array.kind {
                NewArrayKind::Init => write!(f, "new [] {{{}}}", comma(&new_array.expressions)),
                NewArrayKind::Bounds => write!(
                    f,
                    "new {}[{}]",
                    new_array.element_type,
                    comma(&new_array.expressions)
                ),
            },
            ExprKind::TypeBinary(type_binary) => {
                let op = match type_binary.kind {
                    TypeBinaryKind::TypeIs => "Is",
                    TypeBinaryKind::TypeEqual => "TypeEqual",
                };
                write!(f, "({} {op} {})", type_binary.expr, type_binary.type_operand)
            }
            ExprKind::Block(block) => {
                write!(f, "{{ ")?;
                for var in &block.variables {
                    write!(f, "var {var}; ")?;
                }
                write!(f, "{} }}", Separated(&block.expressions, "; "))
            }
            ExprKind::Dynamic(dynamic) => write!(
                f,
                "Dynamic {}({})",
                dynamic.binder.operation,
                comma(&dynamic.arguments)
            ),
            ExprKind::Goto(goto) => {
                let keyword = match goto.kind {
                    GotoKind::Goto => "goto",
                    GotoKind::Return => "return",
                    GotoKind::Break => "break",
                    GotoKind::Continue => "continue",
                };
                write!(f, "{keyword} {}", goto.target)?;
                if let Some(value) = &goto.value {
                    write!(f, " {value}")?;
                }
                Ok(())
            }
            ExprKind::Index(index) => write!(f, "{}[{}]", index.object, comma(&index.arguments)),
            ExprKind::Label(label) => {
                write!(f, "{}:", label.target)?;
                if let Some(value) = &label.default_value {
                    write!(f, " {value}")?;
                }
                Ok(())
            }
            ExprKind::RuntimeVariables(runtime) => {
                write!(f, "RuntimeVariables({})", comma(&runtime.variables))
            }
            ExprKind::Loop(lp) => write!(f, "loop {{ {} }}", lp.body),
            ExprKind::Switch(switch) => {
                write!(f, "switch ({}) {{ ", switch.value)?;
                for case in &switch.cases {
                    write!(f, "case {}: {}; ", comma(&case.test_values), case.body)?;
                }
                if let Some(default) = &switch.default_body {
                    write!(f, "default: {default}; ")?;
                }
                write!(f, "}}")
            }
            ExprKind::Try(try_expr) => {
                write!(f, "try {{ {} }}", try_expr.body)?;
                for handler in &try_expr.handlers {
                    match &handler.variable {
                        Some(var) => write!(f, " catch ({} {var})", handler.test)?,
                        None => write!(f, " catch ({})", handler.test)?,
                    }
                    if let Some(filter) = &handler.filter {
                        write!(f, " when ({filter})")?;
                    }
                    write!(f, " {{ {} }}", handler.body)?;
                }
                if let Some(finally) = &try_expr.finally {
                    write!(f, " finally {{ {finally} }}")?;
                }
                Ok(())
            }
            ExprKind::Extension(ext) => ext.render(f),
        }
    }
}
