use std::{fmt, hash, ops, sync::Arc};

use crate::{
    constant::Constant,
    error::ModelError,
    ops::{BinaryOp, GotoKind, NewArrayKind, TypeBinaryKind, UnaryOp},
    refs::{Binder, ConstructorRef, IndexerRef, LabelTarget, MemberRef, MethodRef},
    types::Type,
};

/// A shared handle to an immutable expression node.
///
/// Cloning an `Expr` shares the node rather than copying it. Equality and hashing are by
/// identity: two handles are equal only if they point at the same constructed node, so two
/// parameters that happen to share a name are still different parameters.
#[derive(Clone)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self(Arc::new(kind))
    }

    #[inline]
    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn kind_name(&self) -> &str {
        self.0.name()
    }

    pub fn ty(&self) -> Type {
        self.0.ty()
    }

    pub fn as_parameter(&self) -> Option<&ParameterExpr> {
        match self.kind() {
            ExprKind::Parameter(param) => Some(param),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaExpr> {
        match self.kind() {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self.kind() {
            ExprKind::Constant(c) => Some(&c.value),
            _ => None,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Expr {}

impl hash::Hash for Expr {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl ops::Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[derive(Debug)]
pub enum ExprKind {
    Parameter(ParameterExpr),
    Constant(ConstantExpr),
    Default(Type),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Call(CallExpr),
    Invocation(InvocationExpr),
    Lambda(LambdaExpr),
    ListInit(ListInitExpr),
    Member(MemberExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    TypeBinary(TypeBinaryExpr),
    Block(BlockExpr),
    Dynamic(DynamicExpr),
    Goto(GotoExpr),
    Index(IndexExpr),
    Label(LabelExpr),
    RuntimeVariables(RuntimeVariablesExpr),
    Loop(LoopExpr),
    Switch(SwitchExpr),
    Try(TryExpr),
    Extension(Arc<dyn ExtensionNode>),
}

/// A caller-defined node kind.
///
/// Extension nodes may appear anywhere in a tree and are offered to traversal callbacks like any
/// other node, but their children (if any) are opaque: descending into one is an error.
pub trait ExtensionNode: fmt::Debug + Send + Sync {
    fn kind_name(&self) -> &str;

    fn ty(&self) -> Type;

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.kind_name())
    }
}

#[derive(Debug)]
pub struct ParameterExpr {
    pub name: Option<Arc<str>>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct ConstantExpr {
    pub value: Constant,
    pub ty: Type,
}

#[derive(Debug)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub ty: Type,
}

#[derive(Debug)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Expr,
    pub right: Expr,
}

#[derive(Debug)]
pub struct ConditionalExpr {
    pub test: Expr,
    pub if_true: Expr,
    pub if_false: Expr,
}

#[derive(Debug)]
pub struct CallExpr {
    pub receiver: Option<Expr>,
    pub method: MethodRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct InvocationExpr {
    pub callee: Expr,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct LambdaExpr {
    pub body: Expr,
    pub parameters: Vec<Parameter>,
    pub name: Option<Arc<str>>,
    pub tail_call: bool,
    pub return_type: Type,
}

#[derive(Debug)]
pub struct ListInitExpr {
    /// Always a `New` node.
    pub new: Expr,
    pub initializers: Vec<ElementInit>,
}

#[derive(Debug, Clone)]
pub struct ElementInit {
    pub add_method: MethodRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct MemberExpr {
    /// `None` for static members.
    pub base: Option<Expr>,
    pub member: MemberRef,
}

#[derive(Debug)]
pub struct NewExpr {
    pub constructor: Option<ConstructorRef>,
    pub arguments: Vec<Expr>,
    pub members: Vec<MemberRef>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct NewArrayExpr {
    pub kind: NewArrayKind,
    pub element_type: Type,
    pub expressions: Vec<Expr>,
}

#[derive(Debug)]
pub struct TypeBinaryExpr {
    pub kind: TypeBinaryKind,
    pub expr: Expr,
    pub type_operand: Type,
}

#[derive(Debug)]
pub struct BlockExpr {
    pub variables: Vec<Parameter>,
    pub expressions: Vec<Expr>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct DynamicExpr {
    pub binder: Binder,
    pub ty: Type,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct GotoExpr {
    pub kind: GotoKind,
    pub target: LabelTarget,
    pub value: Option<Expr>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct IndexExpr {
    pub object: Expr,
    pub indexer: IndexerRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug)]
pub struct LabelExpr {
    pub target: LabelTarget,
    pub default_value: Option<Expr>,
}

#[derive(Debug)]
pub struct RuntimeVariablesExpr {
    pub variables: Vec<Parameter>,
}

#[derive(Debug)]
pub struct LoopExpr {
    pub body: Expr,
    pub break_label: Option<LabelTarget>,
    pub continue_label: Option<LabelTarget>,
}

#[derive(Debug)]
pub struct SwitchExpr {
    pub value: Expr,
    pub default_body: Option<Expr>,
    pub cases: Vec<SwitchCase>,
    pub comparison: Option<MethodRef>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub test_values: Vec<Expr>,
    pub body: Expr,
}

#[derive(Debug)]
pub struct TryExpr {
    pub body: Expr,
    pub finally: Option<Expr>,
    pub handlers: Vec<CatchBlock>,
}

#[derive(Debug, Clone)]
pub struct CatchBlock {
    /// The type of error this handler catches.
    pub test: Type,
    pub variable: Option<Parameter>,
    pub filter: Option<Expr>,
    pub body: Expr,
}

/// An `Expr` known to be a parameter leaf.
///
/// Slots that declare variables (lambda parameters, block variables and so on) hold this rather
/// than a bare `Expr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter(Expr);

impl Parameter {
    pub fn new(name: &str, ty: Type) -> Self {
        Self(Expr::new(ExprKind::Parameter(ParameterExpr {
            name: Some(name.into()),
            ty,
        })))
    }

    pub fn unnamed(ty: Type) -> Self {
        Self(Expr::new(ExprKind::Parameter(ParameterExpr { name: None, ty })))
    }

    /// Checks that `expr` is a parameter, naming the slot it was destined for on failure.
    pub fn from_slot(
        expr: Expr,
        parent: &'static str,
        slot: &'static str,
    ) -> Result<Self, ModelError> {
        Self::try_from(expr).map_err(|found| ModelError::InvalidChild {
            parent,
            slot,
            expected: "Parameter",
            found: found.kind_name().to_owned(),
        })
    }

    /// A shared handle to the underlying parameter node.
    #[inline]
    pub fn expr(&self) -> Expr {
        self.0.clone()
    }

    #[inline]
    pub fn as_expr(&self) -> &Expr {
        &self.0
    }

    pub fn name(&self) -> Option<&str> {
        self.info().name.as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.info().ty
    }

    fn info(&self) -> &ParameterExpr {
        match self.0.kind() {
            ExprKind::Parameter(param) => param,
            _ => unreachable!("`Parameter` always wraps a parameter node"),
        }
    }
}

impl TryFrom<Expr> for Parameter {
    type Error = Expr;

    fn try_from(expr: Expr) -> Result<Self, Self::Error> {
        if expr.as_parameter().is_some() {
            Ok(Self(expr))
        } else {
            Err(expr)
        }
    }
}

impl From<Parameter> for Expr {
    fn from(param: Parameter) -> Self {
        param.0
    }
}

impl From<&Parameter> for Expr {
    fn from(param: &Parameter) -> Self {
        param.expr()
    }
}

macro_rules! impl_from_node {
    ($($node:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$node> for Expr {
                fn from(node: $node) -> Self {
                    Expr::new(ExprKind::$variant(node))
                }
            }
        )*
    };
}

impl_from_node!(
    ConstantExpr => Constant,
    UnaryExpr => Unary,
    BinaryExpr => Binary,
    ConditionalExpr => Conditional,
    CallExpr => Call,
    InvocationExpr => Invocation,
    LambdaExpr => Lambda,
    MemberExpr => Member,
    NewExpr => New,
    NewArrayExpr => NewArray,
    TypeBinaryExpr => TypeBinary,
    BlockExpr => Block,
    DynamicExpr => Dynamic,
    GotoExpr => Goto,
    IndexExpr => Index,
    LabelExpr => Label,
    RuntimeVariablesExpr => RuntimeVariables,
    LoopExpr => Loop,
    SwitchExpr => Switch,
    TryExpr => Try,
);

impl Expr {
    pub fn constant(value: impl Into<Constant>) -> Self {
        let value = value.into();
        let ty = value.natural_type();
        ConstantExpr { value, ty }.into()
    }

    pub fn default_value(ty: Type) -> Self {
        Expr::new(ExprKind::Default(ty))
    }

    pub fn extension(node: impl ExtensionNode + 'static) -> Self {
        Expr::new(ExprKind::Extension(Arc::new(node)))
    }

    /// A unary node whose result type is the operand's type.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        let ty = match op {
            UnaryOp::IsTrue | UnaryOp::IsFalse => Type::Bool,
            UnaryOp::ArrayLength => Type::Int,
            UnaryOp::Throw => Type::Void,
            _ => operand.ty(),
        };
        UnaryExpr { op, operand, ty }.into()
    }

    pub fn typed_unary(op: UnaryOp, operand: Expr, ty: Type) -> Self {
        UnaryExpr { op, operand, ty }.into()
    }

    pub fn negate(operand: Expr) -> Self {
        Self::unary(UnaryOp::Negate, operand)
    }

    pub fn not(operand: Expr) -> Self {
        Self::unary(UnaryOp::Not, operand)
    }

    pub fn convert(operand: Expr, ty: Type) -> Self {
        Self::typed_unary(UnaryOp::Convert, operand, ty)
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        BinaryExpr { op, left, right }.into()
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Add, left, right)
    }

    pub fn subtract(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Subtract, left, right)
    }

    pub fn multiply(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Multiply, left, right)
    }

    pub fn divide(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Divide, left, right)
    }

    pub fn equal(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Equal, left, right)
    }

    pub fn less_than(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::LessThan, left, right)
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::binary(BinaryOp::Assign, target, value)
    }

    pub fn conditional(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        ConditionalExpr {
            test,
            if_true,
            if_false,
        }
        .into()
    }

    pub fn call(receiver: Option<Expr>, method: MethodRef, arguments: Vec<Expr>) -> Self {
        CallExpr {
            receiver,
            method,
            arguments,
        }
        .into()
    }

    pub fn invoke(callee: Expr, arguments: Vec<Expr>) -> Self {
        InvocationExpr { callee, arguments }.into()
    }

    /// An anonymous lambda returning the type of its body.
    pub fn lambda(body: Expr, parameters: Vec<Parameter>) -> Self {
        let return_type = body.ty();
        LambdaExpr {
            body,
            parameters,
            name: None,
            tail_call: false,
            return_type,
        }
        .into()
    }

    pub fn list_init(new: Expr, initializers: Vec<ElementInit>) -> Result<Self, ModelError> {
        if !matches!(new.kind(), ExprKind::New(_)) {
            return Err(ModelError::InvalidChild {
                parent: "ListInit",
                slot: "constructor",
                expected: "New",
                found: new.kind_name().to_owned(),
            });
        }
        Ok(Expr::new(ExprKind::ListInit(ListInitExpr {
            new,
            initializers,
        })))
    }

    pub fn member(base: Option<Expr>, member: MemberRef) -> Self {
        MemberExpr { base, member }.into()
    }

    pub fn new_object(constructor: ConstructorRef, arguments: Vec<Expr>) -> Self {
        let ty = constructor.declaring_type.clone();
        NewExpr {
            constructor: Some(constructor),
            arguments,
            members: Vec::new(),
            ty,
        }
        .into()
    }

    pub fn new_array_init(element_type: Type, expressions: Vec<Expr>) -> Self {
        NewArrayExpr {
            kind: NewArrayKind::Init,
            element_type,
            expressions,
        }
        .into()
    }

    pub fn new_array_bounds(element_type: Type, bounds: Vec<Expr>) -> Self {
        NewArrayExpr {
            kind: NewArrayKind::Bounds,
            element_type,
            expressions: bounds,
        }
        .into()
    }

    pub fn type_is(expr: Expr, type_operand: Type) -> Self {
        TypeBinaryExpr {
            kind: TypeBinaryKind::TypeIs,
            expr,
            type_operand,
        }
        .into()
    }

    /// A block whose type is that of its last expression.
    pub fn block(variables: Vec<Parameter>, expressions: Vec<Expr>) -> Self {
        let ty = expressions.last().map(Expr::ty).unwrap_or(Type::Void);
        BlockExpr {
            variables,
            expressions,
            ty,
        }
        .into()
    }

    pub fn dynamic(binder: Binder, ty: Type, arguments: Vec<Expr>) -> Self {
        DynamicExpr {
            binder,
            ty,
            arguments,
        }
        .into()
    }

    pub fn goto(kind: GotoKind, target: LabelTarget, value: Option<Expr>) -> Self {
        let ty = target.ty().clone();
        GotoExpr {
            kind,
            target,
            value,
            ty,
        }
        .into()
    }

    pub fn index(object: Expr, indexer: IndexerRef, arguments: Vec<Expr>) -> Self {
        IndexExpr {
            object,
            indexer,
            arguments,
        }
        .into()
    }

    pub fn label(target: LabelTarget, default_value: Option<Expr>) -> Self {
        LabelExpr {
            target,
            default_value,
        }
        .into()
    }

    pub fn runtime_variables(variables: Vec<Parameter>) -> Self {
        RuntimeVariablesExpr { variables }.into()
    }

    pub fn loop_with(
        body: Expr,
        break_label: Option<LabelTarget>,
        continue_label: Option<LabelTarget>,
    ) -> Self {
        LoopExpr {
            body,
            break_label,
            continue_label,
        }
        .into()
    }

    pub fn switch(
        value: Expr,
        default_body: Option<Expr>,
        cases: Vec<SwitchCase>,
        comparison: Option<MethodRef>,
    ) -> Self {
        let ty = cases
            .first()
            .map(|case| case.body.ty())
            .or_else(|| default_body.as_ref().map(Expr::ty))
            .unwrap_or(Type::Void);
        SwitchExpr {
            value,
            default_body,
            cases,
            comparison,
            ty,
        }
        .into()
    }

    pub fn try_catch(body: Expr, finally: Option<Expr>, handlers: Vec<CatchBlock>) -> Self {
        TryExpr {
            body,
            finally,
            handlers,
        }
        .into()
    }
}

impl ExprKind {
    pub fn name(&self) -> &str {
        match self {
            ExprKind::Parameter(_) => "Parameter",
            ExprKind::Constant(_) => "Constant",
            ExprKind::Default(_) => "Default",
            ExprKind::Unary(_) => "Unary",
            ExprKind::Binary(_) => "Binary",
            ExprKind::Conditional(_) => "Conditional",
            ExprKind::Call(_) => "Call",
            ExprKind::Invocation(_) => "Invocation",
            ExprKind::Lambda(_) => "Lambda",
            ExprKind::ListInit(_) => "ListInit",
            ExprKind::Member(_) => "Member",
            ExprKind::New(_) => "New",
            ExprKind::NewArray(_) => "NewArray",
            ExprKind::TypeBinary(_) => "TypeBinary",
            ExprKind::Block(_) => "Block",
            ExprKind::Dynamic(_) => "Dynamic",
            ExprKind::Goto(_) => "Goto",
            ExprKind::Index(_) => "Index",
            ExprKind::Label(_) => "Label",
            ExprKind::RuntimeVariables(_) => "RuntimeVariables",
            ExprKind::Loop(_) => "Loop",
            ExprKind::Switch(_) => "Switch",
            ExprKind::Try(_) => "Try",
            ExprKind::Extension(ext) => ext.kind_name(),
        }
    }

    /// Nodes with no children at all.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ExprKind::Parameter(_) | ExprKind::Constant(_) | ExprKind::Default(_)
        )
    }

    pub fn ty(&self) -> Type {
        match self {
            ExprKind::Parameter(param) => param.ty.clone(),
            ExprKind::Constant(c) => c.ty.clone(),
            ExprKind::Default(ty) => ty.clone(),
            ExprKind::Unary(unary) => unary.ty.clone(),
            ExprKind::Binary(binary) => {
                if binary.op.is_comparison() || binary.op.is_short_circuit() {
                    Type::Bool
                } else if binary.op == BinaryOp::ArrayIndex {
                    binary.left.ty().element().cloned().unwrap_or(Type::Object)
                } else if binary.op == BinaryOp::Coalesce {
                    binary.right.ty()
                } else {
                    binary.left.ty()
                }
            }
            ExprKind::Conditional(cond) => cond.if_true.ty(),
            ExprKind::Call(call) => call.method.return_type.clone(),
            ExprKind::Invocation(invocation) => invocation
                .callee
                .ty()
                .return_type()
                .cloned()
                .unwrap_or(Type::Object),
            ExprKind::Lambda(lambda) => Type::function(
                lambda.parameters.iter().map(|p| p.ty().clone()),
                lambda.return_type.clone(),
            ),
            ExprKind::ListInit(list_init) => list_init.new.ty(),
            ExprKind::Member(member) => member.member.ty.clone(),
            ExprKind::New(new) => new.ty.clone(),
            ExprKind::NewArray(new_array) => Type::array(new_array.element_type.clone()),
            ExprKind::TypeBinary(_) => Type::Bool,
            ExprKind::Block(block) => block.ty.clone(),
            ExprKind::Dynamic(dynamic) => dynamic.ty.clone(),
            ExprKind::Goto(goto) => goto.ty.clone(),
            ExprKind::Index(index) => index.indexer.ty.clone(),
            ExprKind::Label(label) => label.target.ty().clone(),
            ExprKind::RuntimeVariables(_) => Type::named("RuntimeVariables"),
            ExprKind::Loop(lp) => lp
                .break_label
                .as_ref()
                .map(|label| label.ty().clone())
                .unwrap_or(Type::Void),
            ExprKind::Switch(switch) => switch.ty.clone(),
            ExprKind::Try(try_expr) => try_expr.body.ty(),
            ExprKind::Extension(ext) => ext.ty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_equality() {
        let x1 = Parameter::new("x", Type::Int);
        let x2 = Parameter::new("x", Type::Int);
        assert_ne!(x1, x2);
        assert_eq!(x1.expr(), x1.expr());

        let mut set = HashSet::new();
        set.insert(x1.expr());
        assert!(set.contains(x1.as_expr()));
        assert!(!set.contains(x2.as_expr()));
    }

    #[test]
    fn parameter_slot_check() {
        let five = Expr::constant(5);
        let err = Parameter::from_slot(five, "Lambda", "parameters").unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidChild {
                parent: "Lambda",
                found,
                ..
            } if found == "Constant"
        ));
    }

    #[test]
    fn list_init_requires_new() {
        let add = MethodRef::method(Type::named("List"), "Add", [Type::Int], Type::Void);
        let init = ElementInit {
            add_method: add,
            arguments: vec![Expr::constant(1)],
        };
        assert!(Expr::list_init(Expr::constant(1), vec![init.clone()]).is_err());

        let new = Expr::new_object(ConstructorRef::new(Type::named("List"), []), vec![]);
        let list = Expr::list_init(new, vec![init]).unwrap();
        assert_eq!(list.ty(), Type::named("List"));
    }

    #[test]
    fn result_types() {
        let x = Parameter::new("x", Type::Int);
        let f = Expr::lambda(Expr::less_than(x.expr(), Expr::constant(3)), vec![x.clone()]);
        assert_eq!(f.ty(), Type::function([Type::Int], Type::Bool));
        assert_eq!(Expr::invoke(f, vec![Expr::constant(1)]).ty(), Type::Bool);

        let arr = Expr::new_array_init(Type::Float, vec![Expr::constant(1.0)]);
        assert_eq!(
            Expr::binary(BinaryOp::ArrayIndex, arr, Expr::constant(0)).ty(),
            Type::Float
        );
    }
}
