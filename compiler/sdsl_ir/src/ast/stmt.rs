//! Statement nodes.
//!
//! Blocks, expression statements, `return`, `discard`, `break` and
//! `continue` are plain [`NodeKind`](super::NodeKind) variants; the
//! structured statements below carry named children.

use crate::Node;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub then_branch: Box<Node>,
    pub else_branch: Option<Box<Node>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ForStatement {
    pub init: Option<Box<Node>>,
    pub condition: Option<Box<Node>>,
    pub step: Option<Box<Node>>,
    pub body: Box<Node>,
}

/// `while (c) body`, or `do body while (c)` when `do_while` is set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WhileStatement {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub do_while: bool,
}
