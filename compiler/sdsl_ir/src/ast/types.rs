//! Type nodes and the generic type construct.
//!
//! Parameterized types (matrices, vectors, templated resources) share one
//! representation, [`GenericType`]: a name plus an ordered list of
//! parameter nodes. [`MatrixType`] and [`VectorType`] are typed views that
//! read and write specific parameter slots. Nothing is cached outside the
//! parameter list, so equality and hashing always follow the parameters.

use std::hash::{Hash, Hasher};

use crate::{DeclId, Name, Node, NodeKind, Span, StringInterner};

/// A type referenced by name: scalars, structs, typedefs, flattened generics.
///
/// Equality compares the name only. The back-reference and the flattening
/// origin are resolution data, not identity.
#[derive(Clone, Debug)]
pub struct TypeName {
    pub name: Name,
    /// Declaration this name resolves to; `None` for builtins and
    /// unresolved names.
    pub declaration: Option<DeclId>,
    /// Generic type this name was flattened from, if any.
    pub target: Option<Box<GenericType>>,
}

impl TypeName {
    /// Builtin or unresolved type name.
    pub fn new(name: Name) -> Self {
        TypeName {
            name,
            declaration: None,
            target: None,
        }
    }

    /// Type name resolved to a user declaration (struct, typedef).
    pub fn resolved(name: Name, declaration: DeclId) -> Self {
        TypeName {
            name,
            declaration: Some(declaration),
            target: None,
        }
    }
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeName {}

impl Hash for TypeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A type parameterized by an ordered list of nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericType {
    pub name: Name,
    pub parameters: Vec<Node>,
}

impl GenericType {
    pub fn new(name: Name, parameters: Vec<Node>) -> Self {
        GenericType { name, parameters }
    }

    /// Generic type with `arity` unset slots.
    ///
    /// Unset slots hold an anonymous type name until a typed setter fills
    /// them.
    pub fn with_arity(name: Name, arity: usize) -> Self {
        GenericType {
            name,
            parameters: vec![Node::type_name(Name::EMPTY); arity],
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn parameter(&self, slot: usize) -> Option<&Node> {
        self.parameters.get(slot)
    }

    /// Overwrite a parameter slot, returning the previous value.
    ///
    /// Returns `None` and drops `value` if the slot does not exist.
    pub fn replace_parameter(&mut self, slot: usize, value: Node) -> Option<Node> {
        self.parameters
            .get_mut(slot)
            .map(|existing| std::mem::replace(existing, value))
    }

    /// Type name in slot `slot`, if that slot holds one.
    fn type_slot(&self, slot: usize) -> Option<&TypeName> {
        match &self.parameter(slot)?.kind {
            NodeKind::TypeName(ty) => Some(ty),
            _ => None,
        }
    }

    /// Non-negative integer literal in slot `slot`, if that slot holds one.
    fn count_slot(&self, slot: usize) -> Option<u32> {
        match &self.parameter(slot)?.kind {
            NodeKind::Literal(lit) => lit.as_u32(),
            _ => None,
        }
    }

    /// Flatten to a non-generic type name when the construct has one.
    ///
    /// Only matrices and vectors have flattened spellings.
    pub fn to_non_generic(&self, interner: &StringInterner, span: Span) -> Option<Node> {
        let text = match (self.name, self.arity()) {
            (Name::MATRIX, MatrixType::ARITY) => matrix_spelling(self, interner)?,
            (Name::VECTOR, VectorType::ARITY) => vector_spelling(self, interner)?,
            _ => return None,
        };
        Some(flattened(interner, &text, self, span))
    }
}

/// `{element}{columns}x{rows}`, e.g. `float4x3`.
fn matrix_spelling(generic: &GenericType, interner: &StringInterner) -> Option<String> {
    let element = interner.lookup(generic.type_slot(MatrixType::ELEMENT)?.name);
    let columns = generic.count_slot(MatrixType::COLUMNS)?;
    let rows = generic.count_slot(MatrixType::ROWS)?;
    Some(format!("{element}{columns}x{rows}"))
}

/// `{element}{count}`, e.g. `float4`.
fn vector_spelling(generic: &GenericType, interner: &StringInterner) -> Option<String> {
    let element = interner.lookup(generic.type_slot(VectorType::ELEMENT)?.name);
    let count = generic.count_slot(VectorType::COUNT)?;
    Some(format!("{element}{count}"))
}

/// Build the flattened type name node shared by matrices and vectors.
fn flattened(interner: &StringInterner, text: &str, origin: &GenericType, span: Span) -> Node {
    let ty = TypeName {
        name: interner.intern(text),
        declaration: None,
        target: Some(Box::new(origin.clone())),
    };
    Node::from(ty).with_span(span)
}

/// Zero-based element position within a matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatrixIndex {
    pub row: u32,
    pub column: u32,
}

impl MatrixIndex {
    pub const fn new(row: u32, column: u32) -> Self {
        MatrixIndex { row, column }
    }
}

/// `matrix<T, Rows, Columns>`.
///
/// Slots: 0 = element type, 1 = row count, 2 = column count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatrixType(GenericType);

impl MatrixType {
    pub const ARITY: usize = 3;
    const ELEMENT: usize = 0;
    const ROWS: usize = 1;
    const COLUMNS: usize = 2;

    pub fn new(element: TypeName, rows: u32, columns: u32) -> Self {
        MatrixType(GenericType::new(
            Name::MATRIX,
            vec![
                Node::from(element),
                Node::int(i64::from(rows)),
                Node::int(i64::from(columns)),
            ],
        ))
    }

    /// Reinterpret an untyped generic type as a matrix.
    ///
    /// Hands the value back unchanged if name or arity do not match.
    pub fn from_generic(generic: GenericType) -> Result<Self, GenericType> {
        if generic.name == Name::MATRIX && generic.arity() == Self::ARITY {
            Ok(MatrixType(generic))
        } else {
            Err(generic)
        }
    }

    pub fn as_generic(&self) -> &GenericType {
        &self.0
    }

    pub fn into_generic(self) -> GenericType {
        self.0
    }

    pub fn element_type(&self) -> Option<&TypeName> {
        self.0.type_slot(Self::ELEMENT)
    }

    pub fn set_element_type(&mut self, element: TypeName) {
        self.0.replace_parameter(Self::ELEMENT, Node::from(element));
    }

    pub fn row_count(&self) -> Option<u32> {
        self.0.count_slot(Self::ROWS)
    }

    pub fn set_row_count(&mut self, rows: u32) {
        self.0.replace_parameter(Self::ROWS, Node::int(i64::from(rows)));
    }

    pub fn column_count(&self) -> Option<u32> {
        self.0.count_slot(Self::COLUMNS)
    }

    pub fn set_column_count(&mut self, columns: u32) {
        self.0
            .replace_parameter(Self::COLUMNS, Node::int(i64::from(columns)));
    }

    /// Whether `index` addresses an element of this matrix.
    pub fn contains(&self, index: MatrixIndex) -> bool {
        match (self.row_count(), self.column_count()) {
            (Some(rows), Some(columns)) => index.row < rows && index.column < columns,
            _ => false,
        }
    }

    /// Flatten to `{element}{columns}x{rows}`, e.g. `float4x3`.
    pub fn to_non_generic(&self, interner: &StringInterner, span: Span) -> Option<Node> {
        self.0.to_non_generic(interner, span)
    }
}

/// `vector<T, Count>`.
///
/// Slots: 0 = element type, 1 = component count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VectorType(GenericType);

impl VectorType {
    pub const ARITY: usize = 2;
    const ELEMENT: usize = 0;
    const COUNT: usize = 1;

    pub fn new(element: TypeName, count: u32) -> Self {
        VectorType(GenericType::new(
            Name::VECTOR,
            vec![Node::from(element), Node::int(i64::from(count))],
        ))
    }

    /// Reinterpret an untyped generic type as a vector.
    pub fn from_generic(generic: GenericType) -> Result<Self, GenericType> {
        if generic.name == Name::VECTOR && generic.arity() == Self::ARITY {
            Ok(VectorType(generic))
        } else {
            Err(generic)
        }
    }

    pub fn as_generic(&self) -> &GenericType {
        &self.0
    }

    pub fn into_generic(self) -> GenericType {
        self.0
    }

    pub fn element_type(&self) -> Option<&TypeName> {
        self.0.type_slot(Self::ELEMENT)
    }

    pub fn set_element_type(&mut self, element: TypeName) {
        self.0.replace_parameter(Self::ELEMENT, Node::from(element));
    }

    pub fn count(&self) -> Option<u32> {
        self.0.count_slot(Self::COUNT)
    }

    pub fn set_count(&mut self, count: u32) {
        self.0
            .replace_parameter(Self::COUNT, Node::int(i64::from(count)));
    }

    /// Flatten to `{element}{count}`, e.g. `float4`.
    pub fn to_non_generic(&self, interner: &StringInterner, span: Span) -> Option<Node> {
        self.0.to_non_generic(interner, span)
    }
}

/// Borrowed type reference handed to [`Visitor::visit_type`](crate::visitor::Visitor::visit_type).
#[derive(Copy, Clone, Debug)]
pub enum TypeRef<'ast> {
    Name(&'ast TypeName),
    Generic(&'ast GenericType),
}

impl<'ast> TypeRef<'ast> {
    /// Declaration the type resolves to. Generic types are builtins; their
    /// parameters carry their own references.
    pub fn declaration(self) -> Option<DeclId> {
        match self {
            TypeRef::Name(ty) => ty.declaration,
            TypeRef::Generic(_) => None,
        }
    }

    pub fn name(self) -> Name {
        match self {
            TypeRef::Name(ty) => ty.name,
            TypeRef::Generic(generic) => generic.name,
        }
    }
}
