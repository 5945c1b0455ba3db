//! Declaration nodes.
//!
//! Each declaration carries its [`DeclId`]. Containment (struct fields,
//! constant-buffer members, variable groups, method parameters) is owned
//! children; references between declarations go through `DeclId`s.

use bitflags::bitflags;

use crate::{DeclId, Name, Node};

bitflags! {
    /// Storage qualifiers on variables and parameters.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Qualifiers: u16 {
        const UNIFORM = 1 << 0;
        const STATIC = 1 << 1;
        const CONST = 1 << 2;
        const EXTERN = 1 << 3;
        const SHARED = 1 << 4;
        const GROUPSHARED = 1 << 5;
        const VOLATILE = 1 << 6;
        const IN = 1 << 7;
        const OUT = 1 << 8;
        const INOUT = Self::IN.bits() | Self::OUT.bits();
    }
}

/// Variable declaration, or a group of variables declared in one statement.
///
/// A group (`float a, b;`) has an empty name and one sub-variable per
/// declarator. Sub-variables carry their own type node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub id: DeclId,
    pub name: Name,
    pub ty: Box<Node>,
    pub qualifiers: Qualifiers,
    pub initial_value: Option<Box<Node>>,
    pub sub_variables: Vec<Node>,
}

impl Variable {
    pub fn new(id: DeclId, name: Name, ty: Node) -> Self {
        Variable {
            id,
            name,
            ty: Box::new(ty),
            qualifiers: Qualifiers::empty(),
            initial_value: None,
            sub_variables: Vec::new(),
        }
    }

    /// Group of variables sharing one declaration statement.
    pub fn group(id: DeclId, ty: Node, sub_variables: Vec<Node>) -> Self {
        Variable {
            sub_variables,
            ..Variable::new(id, Name::EMPTY, ty)
        }
    }

    #[must_use]
    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    #[must_use]
    pub fn with_initial_value(mut self, value: Node) -> Self {
        self.initial_value = Some(Box::new(value));
        self
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        !self.sub_variables.is_empty()
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.qualifiers.contains(Qualifiers::UNIFORM)
    }

    /// Sub-variables of a group, in declaration order.
    pub fn sub_variables(&self) -> impl Iterator<Item = &Variable> {
        self.sub_variables.iter().filter_map(Node::as_variable)
    }
}

/// Method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub id: DeclId,
    pub name: Name,
    pub ty: Box<Node>,
    pub qualifiers: Qualifiers,
    pub default_value: Option<Box<Node>>,
}

impl Parameter {
    pub fn new(id: DeclId, name: Name, ty: Node) -> Self {
        Parameter {
            id,
            name,
            ty: Box::new(ty),
            qualifiers: Qualifiers::empty(),
            default_value: None,
        }
    }
}

/// Method signature without a body (forward declaration).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDeclaration {
    pub id: DeclId,
    pub name: Name,
    pub return_type: Box<Node>,
    pub parameters: Vec<Node>,
}

impl MethodDeclaration {
    pub fn new(id: DeclId, name: Name, return_type: Node, parameters: Vec<Node>) -> Self {
        MethodDeclaration {
            id,
            name,
            return_type: Box::new(return_type),
            parameters,
        }
    }
}

/// Method with a body.
///
/// `declaration` points at the forward declaration of the same method when
/// one exists.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDefinition {
    pub id: DeclId,
    pub name: Name,
    pub return_type: Box<Node>,
    pub parameters: Vec<Node>,
    pub body: Vec<Node>,
    pub declaration: Option<DeclId>,
}

impl MethodDefinition {
    pub fn new(id: DeclId, name: Name, return_type: Node, parameters: Vec<Node>) -> Self {
        MethodDefinition {
            id,
            name,
            return_type: Box::new(return_type),
            parameters,
            body: Vec::new(),
            declaration: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<Node>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_declaration(mut self, declaration: DeclId) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Forward declaration, when it is a different node from this definition.
    pub fn distinct_declaration(&self) -> Option<DeclId> {
        self.declaration.filter(|&decl| decl != self.id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ConstantBufferKind {
    #[default]
    CBuffer,
    TBuffer,
    RGroup,
}

/// Named group of uniform members (`cbuffer Globals { ... }`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConstantBuffer {
    pub id: DeclId,
    pub name: Name,
    pub kind: ConstantBufferKind,
    pub members: Vec<Node>,
}

impl ConstantBuffer {
    pub fn new(id: DeclId, name: Name, members: Vec<Node>) -> Self {
        ConstantBuffer {
            id,
            name,
            kind: ConstantBufferKind::CBuffer,
            members,
        }
    }
}

/// `struct Name { fields }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructType {
    pub id: DeclId,
    pub name: Name,
    pub fields: Vec<Node>,
}

/// `typedef ty Name;`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Typedef {
    pub id: DeclId,
    pub name: Name,
    pub ty: Box<Node>,
}
