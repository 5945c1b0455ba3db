//! Shared test utilities for the strip pass.
//!
//! Builds small resolved shader trees without a parser: every reference is
//! created already pointing at its declaration. Only compiled in test builds.

use sdsl_ir::{
    ConstantBuffer, DeclId, DeclIdAllocator, MethodDeclaration, MethodDefinition,
    MethodInvocation, Name, Node, Parameter, Qualifiers, Shader, StringInterner, StructType,
    TypeName, Variable, VariableRef,
};

pub(crate) struct ShaderBuilder {
    pub(crate) interner: StringInterner,
    ids: DeclIdAllocator,
}

impl ShaderBuilder {
    pub(crate) fn new() -> Self {
        ShaderBuilder {
            interner: StringInterner::new(),
            ids: DeclIdAllocator::new(),
        }
    }

    pub(crate) fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// `float {name}(params) { body }`.
    pub(crate) fn definition(
        &mut self,
        name: &str,
        params: Vec<Node>,
        body: Vec<Node>,
    ) -> MethodDefinition {
        MethodDefinition::new(
            self.ids.fresh(),
            self.name(name),
            Node::type_name(Name::FLOAT),
            params,
        )
        .with_body(body)
    }

    /// `float {name}() { body }`, returned with its id.
    pub(crate) fn method(&mut self, name: &str, body: Vec<Node>) -> (DeclId, Node) {
        let method = self.definition(name, Vec::new(), body);
        (method.id, method.into())
    }

    /// `float {name}();`
    pub(crate) fn forward_declaration(&mut self, name: &str) -> (DeclId, Node) {
        let decl = MethodDeclaration::new(
            self.ids.fresh(),
            self.name(name),
            Node::type_name(Name::FLOAT),
            Vec::new(),
        );
        (decl.id, decl.into())
    }

    /// `float {name}` parameter.
    pub(crate) fn param(&mut self, name: &str) -> (DeclId, Node) {
        let param = Parameter::new(self.ids.fresh(), self.name(name), Node::type_name(Name::FLOAT));
        (param.id, param.into())
    }

    /// `float {name};`
    pub(crate) fn variable(&mut self, name: &str) -> Variable {
        self.typed_variable(name, Node::type_name(Name::FLOAT))
    }

    pub(crate) fn typed_variable(&mut self, name: &str, ty: Node) -> Variable {
        Variable::new(self.ids.fresh(), self.name(name), ty)
    }

    /// `uniform float {name};`
    pub(crate) fn uniform(&mut self, name: &str) -> (DeclId, Node) {
        let var = self.variable(name).with_qualifiers(Qualifiers::UNIFORM);
        (var.id, var.into())
    }

    /// `float {names[0]}, {names[1]}, ...;` with one id per sub-variable.
    pub(crate) fn group(&mut self, names: &[&str]) -> (DeclId, Vec<DeclId>, Node) {
        let subs: Vec<Variable> = names.iter().map(|name| self.variable(name)).collect();
        let sub_ids = subs.iter().map(|sub| sub.id).collect();
        let group = Variable::group(
            self.ids.fresh(),
            Node::type_name(Name::FLOAT),
            subs.into_iter().map(Node::from).collect(),
        );
        (group.id, sub_ids, group.into())
    }

    /// `cbuffer {name} { members }`.
    pub(crate) fn cbuffer(&mut self, name: &str, members: Vec<Node>) -> (DeclId, Node) {
        let cb = ConstantBuffer::new(self.ids.fresh(), self.name(name), members);
        (cb.id, cb.into())
    }

    /// `struct {name} { float {field}; }`.
    pub(crate) fn struct_type(&mut self, name: &str, field: &str) -> (DeclId, Node) {
        let field = self.variable(field);
        let st = StructType {
            id: self.ids.fresh(),
            name: self.name(name),
            fields: vec![field.into()],
        };
        (st.id, st.into())
    }

    /// Type name resolved to a user type declaration.
    pub(crate) fn type_ref(&self, name: &str, target: DeclId) -> Node {
        TypeName::resolved(self.name(name), target).into()
    }

    /// `{name}();` as a statement. `None` target is an intrinsic.
    pub(crate) fn call(&self, name: &str, target: Option<DeclId>) -> Node {
        Node::statement(MethodInvocation::new(self.name(name), Vec::new(), target).into())
    }

    /// Use of a variable or parameter as an expression.
    pub(crate) fn read(&self, name: &str, target: DeclId) -> Node {
        VariableRef::new(self.name(name), Some(target)).into()
    }

    /// `return {value};`
    pub(crate) fn ret(&self, value: Node) -> Node {
        Node::ret(Some(value))
    }
}

/// Top-level declared names of `shader`, in order.
pub(crate) fn top_level_names(shader: &Shader, interner: &StringInterner) -> Vec<&'static str> {
    shader
        .declarations
        .iter()
        .filter_map(|decl| decl.declared_name())
        .map(|name| interner.lookup(name))
        .collect()
}

/// Declared names inside the first constant buffer named `cbuffer`.
pub(crate) fn member_names(
    shader: &Shader,
    interner: &StringInterner,
    cbuffer: &str,
) -> Vec<&'static str> {
    shader
        .constant_buffers()
        .find(|cb| interner.lookup(cb.name) == cbuffer)
        .map(|cb| {
            cb.members
                .iter()
                .filter_map(|member| member.declared_name())
                .map(|name| interner.lookup(name))
                .collect()
        })
        .unwrap_or_default()
}
