//! Tree root.

use crate::{DeclId, Name, Node, NodeKind};

use super::{ConstantBuffer, MethodDefinition};

/// A whole shader: the ordered list of top-level declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shader {
    pub declarations: Vec<Node>,
}

impl Shader {
    pub fn new(declarations: Vec<Node>) -> Self {
        Shader { declarations }
    }

    /// First top-level method definition named `name`.
    pub fn find_method_definition(&self, name: Name) -> Option<&MethodDefinition> {
        self.declarations
            .iter()
            .filter_map(Node::as_method_definition)
            .find(|method| method.name == name)
    }

    /// Top-level constant buffers, in declaration order.
    pub fn constant_buffers(&self) -> impl Iterator<Item = &ConstantBuffer> {
        self.declarations.iter().filter_map(Node::as_constant_buffer)
    }

    /// Identifiers of every declaration that stripping may remove: top-level
    /// declarations, constant-buffer members and group sub-variables.
    ///
    /// Method bodies and struct fields are not descended into.
    pub fn strippable_ids(&self) -> Vec<DeclId> {
        let mut ids = Vec::new();
        collect_strippable(&self.declarations, &mut ids);
        ids
    }

    /// Whether a declaration is still present among the strippable ones.
    pub fn contains_declaration(&self, id: DeclId) -> bool {
        self.strippable_ids().contains(&id)
    }
}

fn collect_strippable(nodes: &[Node], ids: &mut Vec<DeclId>) {
    for node in nodes {
        if let Some(id) = node.declaration_id() {
            ids.push(id);
        }
        match &node.kind {
            NodeKind::ConstantBuffer(cb) => collect_strippable(&cb.members, ids),
            NodeKind::Variable(var) => collect_strippable(&var.sub_variables, ids),
            _ => {}
        }
    }
}
