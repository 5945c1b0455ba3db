//! Shader tree visitor with ancestry tracking.
//!
//! # Design
//!
//! [`dispatch_node`] is the single entry point for visiting a node: it pushes
//! the node onto the [`Ancestry`], fires [`Visitor::pre_visit`], matches on
//! the node variant to pick a handler, and pops the node again, also when a
//! handler unwinds. Handlers default to [`walk_node`], which dispatches every
//! child in declaration order (pre-order overall).
//!
//! The ancestry is an explicit context threaded through every call. Context
//! such as "the constant buffer we are in" is read off the node stack
//! instead of being stored in visitor fields, so it disappears on its own
//! when the subtree visit returns.
//!
//! # Example
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl<'ast> Visitor<'ast> for CountCalls {
//!     fn visit_method_invocation(
//!         &mut self,
//!         node: &'ast Node,
//!         _call: &'ast MethodInvocation,
//!         ancestry: &mut Ancestry<'ast>,
//!     ) {
//!         self.0 += 1;
//!         walk_node(self, node, ancestry);
//!     }
//! }
//! ```

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::ast::{
    ConstantBuffer, MethodDefinition, MethodInvocation, Parameter, Shader, TypeRef, Variable,
    VariableRef,
};
use crate::{DeclId, Node, NodeKind};

/// Chain of nodes from the root down to the node being visited.
#[derive(Debug, Default)]
pub struct Ancestry<'ast> {
    stack: Vec<&'ast Node>,
}

impl<'ast> Ancestry<'ast> {
    pub fn new() -> Self {
        Ancestry { stack: Vec::new() }
    }

    /// Number of nodes on the stack, current node included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Full ancestor chain, root first, current node last.
    #[inline]
    pub fn nodes(&self) -> &[&'ast Node] {
        &self.stack
    }

    #[inline]
    pub fn current(&self) -> Option<&'ast Node> {
        self.stack.last().copied()
    }

    pub fn parent(&self) -> Option<&'ast Node> {
        self.strict_ancestors().last().copied()
    }

    /// Ancestors excluding the current node.
    fn strict_ancestors(&self) -> &[&'ast Node] {
        match self.stack.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }

    /// Declarations on the stack, root first, current node included.
    pub fn declaration_containers(&self) -> SmallVec<[DeclId; 8]> {
        self.stack
            .iter()
            .filter_map(|node| node.declaration_id())
            .collect()
    }

    /// Innermost declaration on the stack, current node included.
    pub fn nearest_declaration(&self) -> Option<DeclId> {
        self.stack.iter().rev().find_map(|node| node.declaration_id())
    }

    /// Innermost method definition on the stack, current node included.
    pub fn nearest_method_definition(&self) -> Option<&'ast MethodDefinition> {
        self.stack
            .iter()
            .rev()
            .find_map(|node| node.as_method_definition())
    }

    /// Innermost constant buffer strictly above the current node.
    pub fn enclosing_constant_buffer(&self) -> Option<&'ast ConstantBuffer> {
        self.strict_ancestors()
            .iter()
            .rev()
            .find_map(|node| node.as_constant_buffer())
    }

    /// Push `node`; it is popped when the guard drops, even on unwind.
    fn scoped(&mut self, node: &'ast Node) -> ScopedAncestry<'_, 'ast> {
        self.stack.push(node);
        ScopedAncestry { ancestry: self }
    }
}

/// Guard holding one pushed node on an [`Ancestry`].
struct ScopedAncestry<'guard, 'ast> {
    ancestry: &'guard mut Ancestry<'ast>,
}

impl Drop for ScopedAncestry<'_, '_> {
    fn drop(&mut self) {
        self.ancestry.stack.pop();
    }
}

impl<'ast> Deref for ScopedAncestry<'_, 'ast> {
    type Target = Ancestry<'ast>;

    fn deref(&self) -> &Self::Target {
        self.ancestry
    }
}

impl DerefMut for ScopedAncestry<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ancestry
    }
}

/// Shader tree visitor.
///
/// Override a `visit_*` handler to act on one node family; call
/// [`walk_node`] from the override to keep descending. Handlers receive the
/// node itself (for spans and generic walking) and its typed payload.
pub trait Visitor<'ast> {
    /// Called for every node after it is pushed and before its handler runs.
    fn pre_visit(&mut self, node: &'ast Node, ancestry: &Ancestry<'ast>) {
        let _ = (node, ancestry);
    }

    /// Visit the tree root.
    fn visit_shader(&mut self, shader: &'ast Shader, ancestry: &mut Ancestry<'ast>) {
        walk_shader(self, shader, ancestry);
    }

    fn visit_method_invocation(
        &mut self,
        node: &'ast Node,
        call: &'ast MethodInvocation,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = call;
        walk_node(self, node, ancestry);
    }

    fn visit_variable_ref(
        &mut self,
        node: &'ast Node,
        var_ref: &'ast VariableRef,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = var_ref;
        walk_node(self, node, ancestry);
    }

    fn visit_constant_buffer(
        &mut self,
        node: &'ast Node,
        cbuffer: &'ast ConstantBuffer,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = cbuffer;
        walk_node(self, node, ancestry);
    }

    fn visit_parameter(
        &mut self,
        node: &'ast Node,
        param: &'ast Parameter,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = param;
        walk_node(self, node, ancestry);
    }

    /// Type names and generic types.
    fn visit_type(&mut self, node: &'ast Node, ty: TypeRef<'ast>, ancestry: &mut Ancestry<'ast>) {
        let _ = ty;
        walk_node(self, node, ancestry);
    }

    fn visit_method_definition(
        &mut self,
        node: &'ast Node,
        method: &'ast MethodDefinition,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = method;
        walk_node(self, node, ancestry);
    }

    fn visit_variable(
        &mut self,
        node: &'ast Node,
        variable: &'ast Variable,
        ancestry: &mut Ancestry<'ast>,
    ) {
        let _ = variable;
        walk_node(self, node, ancestry);
    }

    /// Fallback for every other node kind.
    fn visit_node(&mut self, node: &'ast Node, ancestry: &mut Ancestry<'ast>) {
        walk_node(self, node, ancestry);
    }
}

/// Visit one node: push, pre-visit, dispatch on the variant, pop.
pub fn dispatch_node<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    node: &'ast Node,
    ancestry: &mut Ancestry<'ast>,
) {
    ensure_sufficient_stack(|| {
        let mut scoped = ancestry.scoped(node);
        let ancestry = &mut *scoped;
        visitor.pre_visit(node, ancestry);
        match &node.kind {
            NodeKind::MethodInvocation(call) => {
                visitor.visit_method_invocation(node, call, ancestry);
            }
            NodeKind::VariableRef(var_ref) => visitor.visit_variable_ref(node, var_ref, ancestry),
            NodeKind::ConstantBuffer(cb) => visitor.visit_constant_buffer(node, cb, ancestry),
            NodeKind::Parameter(param) => visitor.visit_parameter(node, param, ancestry),
            NodeKind::TypeName(ty) => visitor.visit_type(node, TypeRef::Name(ty), ancestry),
            NodeKind::GenericType(ty) => visitor.visit_type(node, TypeRef::Generic(ty), ancestry),
            NodeKind::MethodDefinition(method) => {
                visitor.visit_method_definition(node, method, ancestry);
            }
            NodeKind::Variable(variable) => visitor.visit_variable(node, variable, ancestry),
            _ => visitor.visit_node(node, ancestry),
        }
    });
}

/// Walk the top-level declarations in order.
pub fn walk_shader<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    shader: &'ast Shader,
    ancestry: &mut Ancestry<'ast>,
) {
    walk_list(visitor, &shader.declarations, ancestry);
}

fn walk_list<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    nodes: &'ast [Node],
    ancestry: &mut Ancestry<'ast>,
) {
    for node in nodes {
        dispatch_node(visitor, node, ancestry);
    }
}

fn walk_opt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    node: Option<&'ast Node>,
    ancestry: &mut Ancestry<'ast>,
) {
    if let Some(node) = node {
        dispatch_node(visitor, node, ancestry);
    }
}

/// Dispatch every child of `node` in declaration order.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    node: &'ast Node,
    ancestry: &mut Ancestry<'ast>,
) {
    match &node.kind {
        NodeKind::TypeName(_)
        | NodeKind::Literal(_)
        | NodeKind::VariableRef(_)
        | NodeKind::Discard
        | NodeKind::Break
        | NodeKind::Continue => {}

        NodeKind::GenericType(generic) => walk_list(visitor, &generic.parameters, ancestry),
        NodeKind::StructType(st) => walk_list(visitor, &st.fields, ancestry),
        NodeKind::Typedef(td) => dispatch_node(visitor, &td.ty, ancestry),

        NodeKind::MethodInvocation(call) => {
            walk_opt(visitor, call.object.as_deref(), ancestry);
            walk_list(visitor, &call.arguments, ancestry);
        }
        NodeKind::MemberAccess(access) => dispatch_node(visitor, &access.target, ancestry),
        NodeKind::Indexer(indexer) => {
            dispatch_node(visitor, &indexer.target, ancestry);
            dispatch_node(visitor, &indexer.index, ancestry);
        }
        NodeKind::Unary(unary) => dispatch_node(visitor, &unary.operand, ancestry),
        NodeKind::Binary(binary) => {
            dispatch_node(visitor, &binary.left, ancestry);
            dispatch_node(visitor, &binary.right, ancestry);
        }
        NodeKind::Conditional(cond) => {
            dispatch_node(visitor, &cond.condition, ancestry);
            dispatch_node(visitor, &cond.then_value, ancestry);
            dispatch_node(visitor, &cond.else_value, ancestry);
        }
        NodeKind::Assign(assign) => {
            dispatch_node(visitor, &assign.target, ancestry);
            dispatch_node(visitor, &assign.value, ancestry);
        }

        NodeKind::Block(statements) => walk_list(visitor, statements, ancestry),
        NodeKind::ExpressionStatement(expr) => dispatch_node(visitor, expr, ancestry),
        NodeKind::Return(value) => walk_opt(visitor, value.as_deref(), ancestry),
        NodeKind::If(stmt) => {
            dispatch_node(visitor, &stmt.condition, ancestry);
            dispatch_node(visitor, &stmt.then_branch, ancestry);
            walk_opt(visitor, stmt.else_branch.as_deref(), ancestry);
        }
        NodeKind::For(stmt) => {
            walk_opt(visitor, stmt.init.as_deref(), ancestry);
            walk_opt(visitor, stmt.condition.as_deref(), ancestry);
            walk_opt(visitor, stmt.step.as_deref(), ancestry);
            dispatch_node(visitor, &stmt.body, ancestry);
        }
        NodeKind::While(stmt) => {
            if stmt.do_while {
                dispatch_node(visitor, &stmt.body, ancestry);
                dispatch_node(visitor, &stmt.condition, ancestry);
            } else {
                dispatch_node(visitor, &stmt.condition, ancestry);
                dispatch_node(visitor, &stmt.body, ancestry);
            }
        }

        NodeKind::Variable(var) => {
            dispatch_node(visitor, &var.ty, ancestry);
            walk_opt(visitor, var.initial_value.as_deref(), ancestry);
            walk_list(visitor, &var.sub_variables, ancestry);
        }
        NodeKind::Parameter(param) => {
            dispatch_node(visitor, &param.ty, ancestry);
            walk_opt(visitor, param.default_value.as_deref(), ancestry);
        }
        NodeKind::MethodDeclaration(method) => {
            dispatch_node(visitor, &method.return_type, ancestry);
            walk_list(visitor, &method.parameters, ancestry);
        }
        NodeKind::MethodDefinition(method) => {
            dispatch_node(visitor, &method.return_type, ancestry);
            walk_list(visitor, &method.parameters, ancestry);
            walk_list(visitor, &method.body, ancestry);
        }
        NodeKind::ConstantBuffer(cb) => walk_list(visitor, &cb.members, ancestry),
    }
}

/// Minimum stack space to keep available before recursing (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Grow the stack before descending if the red zone is reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
