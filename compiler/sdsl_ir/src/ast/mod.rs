//! Shader syntax tree.
//!
//! Every construct of the language (types, expressions, statements,
//! declarations) is a [`Node`]: a [`NodeKind`] payload plus a [`Span`].
//! Children are owned (`Box<Node>` / `Vec<Node>`); cross-references to
//! declarations are `Option<DeclId>` back-pointers filled in by the semantic
//! pass that produced the tree.
//!
//! # Equality
//!
//! Node equality and hashing are structural over the payload and ignore the
//! span, so two independently built `float4x4` types compare equal.

mod decl;
mod expr;
mod shader;
mod stmt;
mod types;

pub use decl::{
    ConstantBuffer, ConstantBufferKind, MethodDeclaration, MethodDefinition, Parameter,
    Qualifiers, StructType, Typedef, Variable,
};
pub use expr::{
    AssignExpr, BinaryExpr, BinaryOp, ConditionalExpr, Indexer, Literal, MemberAccess,
    MethodInvocation, UnaryExpr, UnaryOp, VariableRef,
};
pub use shader::Shader;
pub use stmt::{ForStatement, IfStatement, WhileStatement};
pub use types::{GenericType, MatrixIndex, MatrixType, TypeName, TypeRef, VectorType};

use std::hash::{Hash, Hasher};

use crate::{DeclId, Name, Span};

/// Universal syntax tree element.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Node payload, one variant per construct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Types
    TypeName(TypeName),
    GenericType(GenericType),
    StructType(StructType),
    Typedef(Typedef),

    // Expressions
    Literal(Literal),
    VariableRef(VariableRef),
    MethodInvocation(MethodInvocation),
    MemberAccess(MemberAccess),
    Indexer(Indexer),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    Assign(AssignExpr),

    // Statements
    Block(Vec<Node>),
    ExpressionStatement(Box<Node>),
    Return(Option<Box<Node>>),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    Discard,
    Break,
    Continue,

    // Declarations
    Variable(Variable),
    Parameter(Parameter),
    MethodDeclaration(MethodDeclaration),
    MethodDefinition(MethodDefinition),
    ConstantBuffer(ConstantBuffer),
}

impl Node {
    /// Create a node with a dummy span.
    #[inline]
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            span: Span::DUMMY,
        }
    }

    /// Replace the span.
    #[inline]
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Unresolved or builtin type reference.
    pub fn type_name(name: Name) -> Self {
        Node::from(TypeName::new(name))
    }

    /// Integer literal.
    pub fn int(value: i64) -> Self {
        Node::from(Literal::Int(value))
    }

    /// Statement list.
    pub fn block(statements: Vec<Node>) -> Self {
        Node::new(NodeKind::Block(statements))
    }

    /// Expression evaluated for its side effects.
    pub fn statement(expr: Node) -> Self {
        Node::new(NodeKind::ExpressionStatement(Box::new(expr)))
    }

    /// `return` with an optional value.
    pub fn ret(value: Option<Node>) -> Self {
        Node::new(NodeKind::Return(value.map(Box::new)))
    }

    /// Identifier of the declaration this node introduces, if it is one.
    pub fn declaration_id(&self) -> Option<DeclId> {
        match &self.kind {
            NodeKind::Variable(v) => Some(v.id),
            NodeKind::Parameter(p) => Some(p.id),
            NodeKind::MethodDeclaration(m) => Some(m.id),
            NodeKind::MethodDefinition(m) => Some(m.id),
            NodeKind::ConstantBuffer(cb) => Some(cb.id),
            NodeKind::StructType(s) => Some(s.id),
            NodeKind::Typedef(t) => Some(t.id),
            _ => None,
        }
    }

    /// Whether this node introduces a referenceable name.
    #[inline]
    pub fn is_declaration(&self) -> bool {
        self.declaration_id().is_some()
    }

    /// Name introduced by this node, if it is a declaration.
    pub fn declared_name(&self) -> Option<Name> {
        match &self.kind {
            NodeKind::Variable(v) => Some(v.name),
            NodeKind::Parameter(p) => Some(p.name),
            NodeKind::MethodDeclaration(m) => Some(m.name),
            NodeKind::MethodDefinition(m) => Some(m.name),
            NodeKind::ConstantBuffer(cb) => Some(cb.name),
            NodeKind::StructType(s) => Some(s.name),
            NodeKind::Typedef(t) => Some(t.name),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            NodeKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_method_definition(&self) -> Option<&MethodDefinition> {
        match &self.kind {
            NodeKind::MethodDefinition(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_constant_buffer(&self) -> Option<&ConstantBuffer> {
        match &self.kind {
            NodeKind::ConstantBuffer(cb) => Some(cb),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}

macro_rules! node_from_payload {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for Node {
                fn from(payload: $payload) -> Self {
                    Node::new(NodeKind::$variant(payload))
                }
            }
        )*
    };
}

node_from_payload! {
    TypeName => TypeName,
    GenericType => GenericType,
    StructType => StructType,
    Typedef => Typedef,
    Literal => Literal,
    VariableRef => VariableRef,
    MethodInvocation => MethodInvocation,
    MemberAccess => MemberAccess,
    Indexer => Indexer,
    UnaryExpr => Unary,
    BinaryExpr => Binary,
    ConditionalExpr => Conditional,
    AssignExpr => Assign,
    IfStatement => If,
    ForStatement => For,
    WhileStatement => While,
    Variable => Variable,
    Parameter => Parameter,
    MethodDeclaration => MethodDeclaration,
    MethodDefinition => MethodDefinition,
    ConstantBuffer => ConstantBuffer,
}

impl From<MatrixType> for Node {
    fn from(matrix: MatrixType) -> Self {
        Node::from(matrix.into_generic())
    }
}

impl From<VectorType> for Node {
    fn from(vector: VectorType) -> Self {
        Node::from(vector.into_generic())
    }
}
