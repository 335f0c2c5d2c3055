#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOp {
    Negate,
    NegateChecked,
    UnaryPlus,
    Not,
    OnesComplement,
    Convert,
    ConvertChecked,
    TypeAs,
    ArrayLength,
    Quote,
    Throw,
    Unbox,
    Increment,
    Decrement,
    PreIncrementAssign,
    PreDecrementAssign,
    PostIncrementAssign,
    PostDecrementAssign,
    IsTrue,
    IsFalse,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "Negate",
            UnaryOp::NegateChecked => "NegateChecked",
            UnaryOp::UnaryPlus => "UnaryPlus",
            UnaryOp::Not => "Not",
            UnaryOp::OnesComplement => "OnesComplement",
            UnaryOp::Convert => "Convert",
            UnaryOp::ConvertChecked => "ConvertChecked",
            UnaryOp::TypeAs => "TypeAs",
            UnaryOp::ArrayLength => "ArrayLength",
            UnaryOp::Quote => "Quote",
            UnaryOp::Throw => "Throw",
            UnaryOp::Unbox => "Unbox",
            UnaryOp::Increment => "Increment",
            UnaryOp::Decrement => "Decrement",
            UnaryOp::PreIncrementAssign => "PreIncrementAssign",
            UnaryOp::PreDecrementAssign => "PreDecrementAssign",
            UnaryOp::PostIncrementAssign => "PostIncrementAssign",
            UnaryOp::PostDecrementAssign => "PostDecrementAssign",
            UnaryOp::IsTrue => "IsTrue",
            UnaryOp::IsFalse => "IsFalse",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    AddChecked,
    Subtract,
    SubtractChecked,
    Multiply,
    MultiplyChecked,
    Divide,
    Modulo,
    Power,
    And,
    Or,
    ExclusiveOr,
    AndAlso,
    OrElse,
    LeftShift,
    RightShift,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Coalesce,
    ArrayIndex,
    Assign,
    AddAssign,
    AddAssignChecked,
    SubtractAssign,
    SubtractAssignChecked,
    MultiplyAssign,
    MultiplyAssignChecked,
    DivideAssign,
    ModuloAssign,
    PowerAssign,
    AndAssign,
    OrAssign,
    ExclusiveOrAssign,
    LeftShiftAssign,
    RightShiftAssign,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::AddChecked => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::SubtractChecked => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::MultiplyChecked => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::ExclusiveOr => "^",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::Coalesce => "??",
            BinaryOp::ArrayIndex => "[]",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::AddAssignChecked => "+=",
            BinaryOp::SubtractAssign => "-=",
            BinaryOp::SubtractAssignChecked => "-=",
            BinaryOp::MultiplyAssign => "*=",
            BinaryOp::MultiplyAssignChecked => "*=",
            BinaryOp::DivideAssign => "/=",
            BinaryOp::ModuloAssign => "%=",
            BinaryOp::PowerAssign => "**=",
            BinaryOp::AndAssign => "&=",
            BinaryOp::OrAssign => "|=",
            BinaryOp::ExclusiveOrAssign => "^=",
            BinaryOp::LeftShiftAssign => "<<=",
            BinaryOp::RightShiftAssign => ">>=",
        }
    }

    /// Operators producing a boolean regardless of their operand types.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterThanOrEqual
        )
    }

    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }

    /// For a compound assignment, the operator applied before storing.
    pub fn compound_operator(self) -> Option<BinaryOp> {
        Some(match self {
            BinaryOp::AddAssign => BinaryOp::Add,
            BinaryOp::AddAssignChecked => BinaryOp::AddChecked,
            BinaryOp::SubtractAssign => BinaryOp::Subtract,
            BinaryOp::SubtractAssignChecked => BinaryOp::SubtractChecked,
            BinaryOp::MultiplyAssign => BinaryOp::Multiply,
            BinaryOp::MultiplyAssignChecked => BinaryOp::MultiplyChecked,
            BinaryOp::DivideAssign => BinaryOp::Divide,
            BinaryOp::ModuloAssign => BinaryOp::Modulo,
            BinaryOp::PowerAssign => BinaryOp::Power,
            BinaryOp::AndAssign => BinaryOp::And,
            BinaryOp::OrAssign => BinaryOp::Or,
            BinaryOp::ExclusiveOrAssign => BinaryOp::ExclusiveOr,
            BinaryOp::LeftShiftAssign => BinaryOp::LeftShift,
            BinaryOp::RightShiftAssign => BinaryOp::RightShift,
            _ => return None,
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NewArrayKind {
    /// One element per child expression.
    Init,
    /// One dimension length per child expression.
    Bounds,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TypeBinaryKind {
    TypeIs,
    TypeEqual,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}
