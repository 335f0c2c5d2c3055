pub mod constant;
pub mod display;
pub mod error;
pub mod expr;
pub mod ops;
pub mod refs;
pub mod types;

pub use self::{
    constant::Constant,
    error::ModelError,
    expr::{
        BinaryExpr, BlockExpr, CallExpr, CatchBlock, ConditionalExpr, ConstantExpr, DynamicExpr,
        ElementInit, Expr, ExprKind, ExtensionNode, GotoExpr, IndexExpr, InvocationExpr,
        LabelExpr, LambdaExpr, ListInitExpr, LoopExpr, MemberExpr, NewArrayExpr, NewExpr,
        Parameter, ParameterExpr, RuntimeVariablesExpr, SwitchCase, SwitchExpr, TryExpr,
        TypeBinaryExpr, UnaryExpr,
    },
    ops::{BinaryOp, GotoKind, NewArrayKind, TypeBinaryKind, UnaryOp},
    refs::{Binder, ConstructorRef, IndexerRef, LabelTarget, MemberKind, MemberRef, MethodRef},
    types::Type,
};
