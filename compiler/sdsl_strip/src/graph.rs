//! Reference graph construction.
//!
//! One traversal of the shader records a directed edge `A -> B` whenever the
//! presence of declaration `A` in the output requires declaration `B`:
//!
//! - a call, variable use or resolved type name inside `A` requires the
//!   referenced declaration, where `A` is the nearest enclosing method
//!   definition, or the nearest enclosing declaration outside methods;
//! - a reference in a variable group's shared type is required by the group
//!   and by each of its sub-variables;
//! - a declaration requires the parameters and nested variables it owns;
//! - a method definition and its distinct forward declaration require each
//!   other;
//! - with constant buffers kept whole, a buffer and every declaration nested
//!   in it require each other.
//!
//! Absent back-references are skipped. Edges are deduplicated, so the graph
//! does not depend on how many times a reference occurs.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use sdsl_ir::ast::{MethodDefinition, MethodInvocation, Parameter, TypeRef, Variable, VariableRef};
use sdsl_ir::visitor::{walk_node, Ancestry, Visitor};
use sdsl_ir::{DeclId, Node, Shader};

/// Outgoing edges of one declaration, in insertion order.
type Successors = SmallVec<[DeclId; 4]>;

/// Directed "requires" graph between declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceGraph {
    edges: FxHashMap<DeclId, Successors>,
    edge_count: usize,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for `shader` in one traversal.
    #[tracing::instrument(level = "debug", skip_all, fields(keep_constant_buffers = keep_constant_buffers))]
    pub fn build(shader: &Shader, keep_constant_buffers: bool) -> Self {
        let mut builder = GraphBuilder {
            graph: ReferenceGraph::new(),
            keep_constant_buffers,
        };
        builder.visit_shader(shader, &mut Ancestry::new());

        let graph = builder.graph;
        tracing::debug!(
            edges = graph.edge_count(),
            sources = graph.source_count(),
            "reference graph built"
        );
        graph
    }

    /// Record `from -> to`. Returns `false` if the edge already existed.
    pub(crate) fn add_edge(&mut self, from: DeclId, to: DeclId) -> bool {
        let successors = self.edges.entry(from).or_default();
        if successors.contains(&to) {
            return false;
        }
        successors.push(to);
        self.edge_count += 1;
        true
    }

    /// Declarations `id` requires, in the order they were first recorded.
    pub fn successors(&self, id: DeclId) -> &[DeclId] {
        self.edges.get(&id).map(SmallVec::as_slice).unwrap_or(&[])
    }

    pub fn contains_edge(&self, from: DeclId, to: DeclId) -> bool {
        self.successors(from).contains(&to)
    }

    /// Total number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of declarations with at least one outgoing edge.
    #[inline]
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

/// Visitor that fills a [`ReferenceGraph`].
struct GraphBuilder {
    graph: ReferenceGraph,
    keep_constant_buffers: bool,
}

impl GraphBuilder {
    /// Edge from the declaration that owns the current reference.
    ///
    /// A reference in a group's shared type is also recorded for every
    /// sub-variable, since a sub-variable keeps the group alive on its own.
    fn add_reference(&mut self, ancestry: &Ancestry<'_>, target: Option<DeclId>) {
        let Some(target) = target else {
            return;
        };
        if let Some(method) = ancestry.nearest_method_definition() {
            self.graph.add_edge(method.id, target);
            return;
        }
        let Some((container, source)) = ancestry
            .nodes()
            .iter()
            .rev()
            .find_map(|node| node.declaration_id().map(|id| (*node, id)))
        else {
            return;
        };
        self.graph.add_edge(source, target);
        if let Some(group) = container.as_variable().filter(|var| var.is_group()) {
            for sub in group.sub_variables() {
                self.graph.add_edge(sub.id, target);
            }
        }
    }

    /// Edge from the declaration enclosing the current declaration node.
    fn add_ownership(&mut self, ancestry: &Ancestry<'_>, owned: DeclId) {
        let containers = ancestry.declaration_containers();
        if let [.., owner, _current] = containers.as_slice() {
            self.graph.add_edge(*owner, owned);
        }
    }
}

impl<'ast> Visitor<'ast> for GraphBuilder {
    fn pre_visit(&mut self, node: &'ast Node, ancestry: &Ancestry<'ast>) {
        if !self.keep_constant_buffers {
            return;
        }
        let (Some(id), Some(cbuffer)) = (node.declaration_id(), ancestry.enclosing_constant_buffer())
        else {
            return;
        };
        self.graph.add_edge(cbuffer.id, id);
        self.graph.add_edge(id, cbuffer.id);
    }

    fn visit_method_invocation(
        &mut self,
        node: &'ast Node,
        call: &'ast MethodInvocation,
        ancestry: &mut Ancestry<'ast>,
    ) {
        self.add_reference(ancestry, call.declaration);
        walk_node(self, node, ancestry);
    }

    fn visit_variable_ref(
        &mut self,
        node: &'ast Node,
        var_ref: &'ast VariableRef,
        ancestry: &mut Ancestry<'ast>,
    ) {
        self.add_reference(ancestry, var_ref.declaration);
        walk_node(self, node, ancestry);
    }

    fn visit_type(&mut self, node: &'ast Node, ty: TypeRef<'ast>, ancestry: &mut Ancestry<'ast>) {
        self.add_reference(ancestry, ty.declaration());
        walk_node(self, node, ancestry);
    }

    fn visit_parameter(
        &mut self,
        node: &'ast Node,
        param: &'ast Parameter,
        ancestry: &mut Ancestry<'ast>,
    ) {
        self.add_ownership(ancestry, param.id);
        walk_node(self, node, ancestry);
    }

    fn visit_variable(
        &mut self,
        node: &'ast Node,
        variable: &'ast Variable,
        ancestry: &mut Ancestry<'ast>,
    ) {
        self.add_ownership(ancestry, variable.id);
        walk_node(self, node, ancestry);
    }

    fn visit_method_definition(
        &mut self,
        node: &'ast Node,
        method: &'ast MethodDefinition,
        ancestry: &mut Ancestry<'ast>,
    ) {
        if let Some(declaration) = method.distinct_declaration() {
            self.graph.add_edge(method.id, declaration);
            self.graph.add_edge(declaration, method.id);
        }
        walk_node(self, node, ancestry);
    }
}
