//! SDSL IR - shader syntax tree types
//!
//! This crate contains the data structures shared by the shader passes:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `DeclId`s identifying declarations within one tree
//! - The syntax tree ([`Node`], [`NodeKind`], [`Shader`]) and the generic
//!   type construct with its matrix and vector views
//! - A visitor framework with ancestry tracking
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifier strings become `Name(u32)`
//! - **Own the tree, index the references**: children are owned, while
//!   resolved references are `Option<DeclId>` back-pointers
//! - **Structural equality**: nodes compare and hash by payload, never by span
//!
//! Literals that contain floats store them as u64 bits for Hash compatibility.

pub mod ast;
mod decl_id;
mod interner;
mod name;
mod span;
pub mod visitor;

pub use ast::{
    AssignExpr, BinaryExpr, BinaryOp, ConditionalExpr, ConstantBuffer, ConstantBufferKind,
    ForStatement, GenericType, IfStatement, Indexer, Literal, MatrixIndex, MatrixType,
    MemberAccess, MethodDeclaration, MethodDefinition, MethodInvocation, Node, NodeKind,
    Parameter, Qualifiers, Shader, StructType, TypeName, TypeRef, Typedef, UnaryExpr, UnaryOp,
    Variable, VariableRef, VectorType, WhileStatement,
};
pub use decl_id::{DeclId, DeclIdAllocator};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::Span;
pub use visitor::{dispatch_node, walk_node, walk_shader, Ancestry, Visitor};
