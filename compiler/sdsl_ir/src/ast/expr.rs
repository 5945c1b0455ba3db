//! Expression nodes.

use crate::{DeclId, Name, Node};

/// Literal value.
///
/// Floats are stored as their bit pattern so literals stay `Eq + Hash`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Float(u64),
    Bool(bool),
}

impl Literal {
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Literal::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Integer literal that fits a dimension or count.
    pub fn as_u32(self) -> Option<u32> {
        self.as_i64().and_then(|v| u32::try_from(v).ok())
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Literal::Float(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }
}

/// Use of a variable, parameter or constant-buffer member by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableRef {
    pub name: Name,
    pub declaration: Option<DeclId>,
}

impl VariableRef {
    pub fn new(name: Name, declaration: Option<DeclId>) -> Self {
        VariableRef { name, declaration }
    }
}

/// Call of a user method or intrinsic, optionally on an object (`tex.Sample(..)`).
///
/// `declaration` is `None` for intrinsics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodInvocation {
    pub name: Name,
    pub object: Option<Box<Node>>,
    pub arguments: Vec<Node>,
    pub declaration: Option<DeclId>,
}

impl MethodInvocation {
    pub fn new(name: Name, arguments: Vec<Node>, declaration: Option<DeclId>) -> Self {
        MethodInvocation {
            name,
            object: None,
            arguments,
            declaration,
        }
    }

    #[must_use]
    pub fn on(mut self, object: Node) -> Self {
        self.object = Some(Box::new(object));
        self
    }
}

/// `target.member` (fields and swizzles).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberAccess {
    pub target: Box<Node>,
    pub member: Name,
}

/// `target[index]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Indexer {
    pub target: Box<Node>,
    pub index: Box<Node>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Node>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    NotEq,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl BinaryExpr {
    pub fn new(op: BinaryOp, left: Node, right: Node) -> Self {
        BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// `condition ? then_value : else_value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalExpr {
    pub condition: Box<Node>,
    pub then_value: Box<Node>,
    pub else_value: Box<Node>,
}

/// `target = value`, or a compound assignment when `op` is set (`+=`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssignExpr {
    pub op: Option<BinaryOp>,
    pub target: Box<Node>,
    pub value: Box<Node>,
}

impl AssignExpr {
    pub fn new(target: Node, value: Node) -> Self {
        AssignExpr {
            op: None,
            target: Box::new(target),
            value: Box::new(value),
        }
    }
}
