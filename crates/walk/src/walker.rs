use std::ops::ControlFlow;

use arbor_ast::{
    BinaryExpr, BlockExpr, CallExpr, CatchBlock, ConditionalExpr, DynamicExpr, ElementInit, Expr,
    ExprKind, GotoExpr, IndexExpr, InvocationExpr, LabelExpr, LambdaExpr, LoopExpr, MemberExpr,
    NewArrayExpr, NewExpr, Parameter, RuntimeVariablesExpr, SwitchCase, SwitchExpr, TryExpr,
    TypeBinaryExpr, UnaryExpr,
};

use crate::{
    decision::{Decision, Outcome},
    error::TraverseError,
};

/// The result of walking one subtree.
///
/// `Break` means an abort was requested somewhere inside it. Both variants carry the rebuilt
/// subtree.
pub(crate) type Walked = ControlFlow<Expr, Expr>;

/// Traverse `root`, offering every node to `callback` in pre-order and rebuilding the tree from
/// the bottom up.
///
/// The callback decides for each node whether to replace it, whether to descend into the
/// (possibly replaced) node's children, and whether to abort. After an abort, nodes not yet
/// visited are kept exactly as they are and the callback is never called again.
///
/// An absent root yields an absent, fully visited outcome without calling the callback. A
/// present root with no callback is an error.
pub fn traverse(
    root: Option<&Expr>,
    callback: Option<&mut dyn FnMut(&Expr) -> Option<Decision>>,
) -> Result<Outcome, TraverseError> {
    let Some(root) = root else {
        return Ok(Outcome::vacuous());
    };
    let callback = callback.ok_or(TraverseError::InvalidArgument("callback"))?;
    traverse_with(root, callback)
}

pub(crate) fn traverse_with<F>(root: &Expr, callback: F) -> Result<Outcome, TraverseError>
where
    F: FnMut(&Expr) -> Option<Decision>,
{
    Ok(match walk_tree(root, callback)? {
        ControlFlow::Continue(node) => Outcome::visited(node),
        ControlFlow::Break(node) => Outcome::partial(node),
    })
}

pub(crate) fn walk_tree<F>(root: &Expr, callback: F) -> Result<Walked, TraverseError>
where
    F: FnMut(&Expr) -> Option<Decision>,
{
    Walker { callback }.walk(root)
}

struct Walker<F> {
    callback: F,
}

impl<F> Walker<F>
where
    F: FnMut(&Expr) -> Option<Decision>,
{
    fn walk(&mut self, expr: &Expr) -> Result<Walked, TraverseError> {
        let decision = (self.callback)(expr).unwrap_or_default();
        let node = decision.replacement.unwrap_or_else(|| expr.clone());

        if decision.abort {
            log::trace!("traversal aborted at `{}` node", node.kind_name());
            return Ok(ControlFlow::Break(node));
        }

        if !decision.descend || node.is_leaf() {
            return Ok(ControlFlow::Continue(node));
        }

        self.descend(node)
    }

    fn descend(&mut self, node: Expr) -> Result<Walked, TraverseError> {
        let mut c = Children::default();

        let rebuilt: Option<Expr> = match node.kind() {
            ExprKind::Parameter(_) | ExprKind::Constant(_) | ExprKind::Default(_) => None,

            ExprKind::Unary(unary) => {
                let operand = c.expr(self, &unary.operand)?;
                c.changed.then(|| {
                    UnaryExpr {
                        op: unary.op,
                        operand,
                        ty: unary.ty.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Binary(binary) => {
                let left = c.expr(self, &binary.left)?;
                let right = c.expr(self, &binary.right)?;
                c.changed.then(|| {
                    BinaryExpr {
                        op: binary.op,
                        left,
                        right,
                    }
                    .into()
                })
            }

            ExprKind::Conditional(cond) => {
                let test = c.expr(self, &cond.test)?;
                let if_true = c.expr(self, &cond.if_true)?;
                let if_false = c.expr(self, &cond.if_false)?;
                c.changed.then(|| {
                    ConditionalExpr {
                        test,
                        if_true,
                        if_false,
                    }
                    .into()
                })
            }

            ExprKind::Call(call) => {
                let receiver = c.opt(self, call.receiver.as_ref())?;
                let arguments = c.list(self, &call.arguments)?;
                c.changed.then(|| {
                    CallExpr {
                        receiver,
                        method: call.method.clone(),
                        arguments,
                    }
                    .into()
                })
            }

            ExprKind::Invocation(invocation) => {
                let callee = c.expr(self, &invocation.callee)?;
                let arguments = c.list(self, &invocation.arguments)?;
                c.changed
                    .then(|| InvocationExpr { callee, arguments }.into())
            }

            ExprKind::Lambda(lambda) => {
                let body = c.expr(self, &lambda.body)?;
                let parameters = c.params(self, &lambda.parameters, "Lambda", "parameters")?;
                c.changed.then(|| {
                    LambdaExpr {
                        body,
                        parameters,
                        name: lambda.name.clone(),
                        tail_call: lambda.tail_call,
                        return_type: lambda.return_type.clone(),
                    }
                    .into()
                })
            }

            ExprKind::ListInit(list_init) => {
                let new = c.expr(self, &list_init.new)?;
                // Initializer arguments are visited as one flat sequence but keep their grouping.
                let mut initializers = Vec::with_capacity(list_init.initializers.len());
                for init in &list_init.initializers {
                    initializers.push(ElementInit {
                        add_method: init.add_method.clone(),
                        arguments: c.list(self, &init.arguments)?,
                    });
                }
                if c.changed {
                    Some(Expr::list_init(new, initializers)?)
                } else {
                    None
                }
            }

            ExprKind::Member(member) => {
                let base = c.opt(self, member.base.as_ref())?;
                c.changed.then(|| {
                    MemberExpr {
                        base,
                        member: member.member.clone(),
                    }
                    .into()
                })
            }

            ExprKind::New(new) => {
                let arguments = c.list(self, &new.arguments)?;
                c.changed.then(|| {
                    NewExpr {
                        constructor: new.constructor.clone(),
                        arguments,
                        members: new.members.clone(),
                        ty: new.ty.clone(),
                    }
                    .into()
                })
            }

            ExprKind::NewArray(new_array) => {
                let expressions = c.list(self, &new_array.expressions)?;
                c.changed.then(|| {
                    NewArrayExpr {
                        kind: new_array.kind,
                        element_type: new_array.element_type.clone(),
                        expressions,
                    }
                    .into()
                })
            }

            ExprKind::TypeBinary(type_binary) => {
                let expr = c.expr(self, &type_binary.expr)?;
                c.changed.then(|| {
                    TypeBinaryExpr {
                        kind: type_binary.kind,
                        expr,
                        type_operand: type_binary.type_operand.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Block(block) => {
                let variables = c.params(self, &block.variables, "Block", "variables")?;
                let expressions = c.list(self, &block.expressions)?;
                c.changed.then(|| {
                    BlockExpr {
                        variables,
                        expressions,
                        ty: block.ty.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Dynamic(dynamic) => {
                let arguments = c.list(self, &dynamic.arguments)?;
                c.changed.then(|| {
                    DynamicExpr {
                        binder: dynamic.binder.clone(),
                        ty: dynamic.ty.clone(),
                        arguments,
                    }
                    .into()
                })
            }

            ExprKind::Goto(goto) => {
                let value = c.opt(self, goto.value.as_ref())?;
                c.changed.then(|| {
                    GotoExpr {
                        kind: goto.kind,
                        target: goto.target.clone(),
                        value,
                        ty: goto.ty.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Index(index) => {
                let object = c.expr(self, &index.object)?;
                let arguments = c.list(self, &index.arguments)?;
                c.changed.then(|| {
                    IndexExpr {
                        object,
                        indexer: index.indexer.clone(),
                        arguments,
                    }
                    .into()
                })
            }

            ExprKind::Label(label) => {
                let default_value = c.opt(self, label.default_value.as_ref())?;
                c.changed.then(|| {
                    LabelExpr {
                        target: label.target.clone(),
                        default_value,
                    }
                    .into()
                })
            }

            ExprKind::RuntimeVariables(runtime) => {
                let variables = c.params(self, &runtime.variables, "RuntimeVariables", "variables")?;
                c.changed
                    .then(|| RuntimeVariablesExpr { variables }.into())
            }

            ExprKind::Loop(lp) => {
                let body = c.expr(self, &lp.body)?;
                c.changed.then(|| {
                    LoopExpr {
                        body,
                        break_label: lp.break_label.clone(),
                        continue_label: lp.continue_label.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Switch(switch) => {
                let value = c.expr(self, &switch.value)?;
                let default_body = c.opt(self, switch.default_body.as_ref())?;
                let mut cases = Vec::with_capacity(switch.cases.len());
                for case in &switch.cases {
                    let test_values = c.list(self, &case.test_values)?;
                    let body = c.expr(self, &case.body)?;
                    cases.push(SwitchCase { test_values, body });
                }
                c.changed.then(|| {
                    SwitchExpr {
                        value,
                        default_body,
                        cases,
                        comparison: switch.comparison.clone(),
                        ty: switch.ty.clone(),
                    }
                    .into()
                })
            }

            ExprKind::Try(try_expr) => {
                let body = c.expr(self, &try_expr.body)?;
                let finally = c.opt(self, try_expr.finally.as_ref())?;
                let mut handlers = Vec::with_capacity(try_expr.handlers.len());
                for handler in &try_expr.handlers {
                    let variable = match &handler.variable {
                        Some(var) => Some(c.param(self, var, "Try", "variable")?),
                        None => None,
                    };
                    let filter = c.opt(self, handler.filter.as_ref())?;
                    let body = c.expr(self, &handler.body)?;
                    handlers.push(CatchBlock {
                        test: handler.test.clone(),
                        variable,
                        filter,
                        body,
                    });
                }
                c.changed.then(|| {
                    TryExpr {
                        body,
                        finally,
                        handlers,
                    }
                    .into()
                })
            }

            ExprKind::Extension(ext) => {
                log::trace!("refusing to descend into extension node `{}`", ext.kind_name());
                return Err(TraverseError::UnsupportedNode(ext.kind_name().to_owned()));
            }
        };

        let node = rebuilt.unwrap_or(node);
        Ok(if c.stopped {
            ControlFlow::Break(node)
        } else {
            ControlFlow::Continue(node)
        })
    }
}

/// Tracks the children of one node as they are walked in order.
#[derive(Default)]
struct Children {
    /// Some child (or an earlier sibling's subtree) aborted, remaining children are kept as-is.
    stopped: bool,
    /// Some child came back as a different node.
    changed: bool,
}

impl Children {
    fn expr<F>(&mut self, walker: &mut Walker<F>, expr: &Expr) -> Result<Expr, TraverseError>
    where
        F: FnMut(&Expr) -> Option<Decision>,
    {
        if self.stopped {
            return Ok(expr.clone());
        }

        let node = match walker.walk(expr)? {
            ControlFlow::Continue(node) => node,
            ControlFlow::Break(node) => {
                self.stopped = true;
                node
            }
        };
        if !node.ptr_eq(expr) {
            self.changed = true;
        }
        Ok(node)
    }

    fn opt<F>(
        &mut self,
        walker: &mut Walker<F>,
        expr: Option<&Expr>,
    ) -> Result<Option<Expr>, TraverseError>
    where
        F: FnMut(&Expr) -> Option<Decision>,
    {
        expr.map(|expr| self.expr(walker, expr)).transpose()
    }

    fn list<F>(&mut self, walker: &mut Walker<F>, exprs: &[Expr]) -> Result<Vec<Expr>, TraverseError>
    where
        F: FnMut(&Expr) -> Option<Decision>,
    {
        exprs.iter().map(|expr| self.expr(walker, expr)).collect()
    }

    fn param<F>(
        &mut self,
        walker: &mut Walker<F>,
        param: &Parameter,
        parent: &'static str,
        slot: &'static str,
    ) -> Result<Parameter, TraverseError>
    where
        F: FnMut(&Expr) -> Option<Decision>,
    {
        let node = self.expr(walker, param.as_expr())?;
        if node.ptr_eq(param.as_expr()) {
            Ok(param.clone())
        } else {
            Ok(Parameter::from_slot(node, parent, slot)?)
        }
    }

    fn params<F>(
        &mut self,
        walker: &mut Walker<F>,
        params: &[Parameter],
        parent: &'static str,
        slot: &'static str,
    ) -> Result<Vec<Parameter>, TraverseError>
    where
        F: FnMut(&Expr) -> Option<Decision>,
    {
        params
            .iter()
            .map(|param| self.param(walker, param, parent, slot))
            .collect()
    }
}
