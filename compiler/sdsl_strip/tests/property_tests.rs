//! Property-based tests for the strip pass.
//!
//! These tests use proptest to generate random call/variable graphs and
//! verify:
//! 1. Soundness: every declaration reachable from an entry point survives
//! 2. Minimality: every unreachable, unexempted declaration is removed
//! 3. No dangling references: every kept back-reference still resolves
//! 4. Idempotence: a second run removes nothing
//! 5. Failure atomicity: an unknown entry point leaves the tree untouched

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use sdsl_ir::{
    Ancestry, ConstantBuffer, DeclId, DeclIdAllocator, MethodDefinition, MethodInvocation, Name,
    Node, NodeKind, Qualifiers, Shader, StringInterner, StructType, TypeName, Variable,
    VariableRef, Visitor,
};
use sdsl_strip::{
    collect_references, strip_shader, ReferenceGraph, StripError, StripOptions, FLIP_RENDERTARGET,
};

// -- Program Generation --

/// Abstract shader: functions calling functions and reading globals, globals
/// optionally typed by a struct.
#[derive(Debug, Clone)]
struct Program {
    /// Callee indices per function.
    calls: Vec<Vec<usize>>,
    /// Global indices read per function.
    reads: Vec<Vec<usize>>,
    structs: usize,
    /// Struct index per global, `None` for `float`.
    global_types: Vec<Option<usize>>,
    /// `uniform` qualifier per global.
    uniforms: Vec<bool>,
    /// Global carrying the reserved flip-rendertarget name.
    reserved: Option<usize>,
    /// The first `buffered` globals live in one constant buffer.
    buffered: usize,
    /// Entry-point function indices.
    entries: Vec<usize>,
}

impl Program {
    fn globals(&self) -> usize {
        self.global_types.len()
    }

    fn global_name(&self, global: usize) -> String {
        if self.reserved == Some(global) {
            FLIP_RENDERTARGET.to_owned()
        } else {
            format!("g{global}")
        }
    }
}

fn program_strategy() -> impl Strategy<Value = Program> {
    (1usize..8, 0usize..6, 0usize..3).prop_flat_map(|(functions, globals, structs)| {
        let calls = prop::collection::vec(prop::collection::vec(0..functions, 0..4), functions);
        // `0..0` is not a valid strategy; out-of-range indices are dropped below.
        let reads = prop::collection::vec(
            prop::collection::vec(0..globals.max(1), 0..3),
            functions,
        );
        let global_types =
            prop::collection::vec(prop::option::of(0..structs.max(1)), globals);
        let uniforms = prop::collection::vec(any::<bool>(), globals);
        let reserved = prop::option::weighted(0.3, 0..globals.max(1));
        let entries = prop::collection::vec(0..functions, 1..3);
        (calls, reads, global_types, uniforms, reserved, 0..=globals, entries).prop_map(
            move |(calls, reads, global_types, uniforms, reserved, buffered, entries)| {
                let reads = reads
                    .into_iter()
                    .map(|r| r.into_iter().filter(|&g| g < globals).collect())
                    .collect();
                let global_types = global_types
                    .into_iter()
                    .map(|ty| ty.filter(|&s| s < structs))
                    .collect();
                Program {
                    calls,
                    reads,
                    structs,
                    global_types,
                    uniforms,
                    reserved: reserved.filter(|&g| g < globals),
                    buffered,
                    entries,
                }
            },
        )
    })
}

struct Built {
    shader: Shader,
    interner: StringInterner,
    functions: Vec<DeclId>,
    globals: Vec<DeclId>,
    structs: Vec<DeclId>,
}

fn build(program: &Program) -> Built {
    let interner = StringInterner::new();
    let mut ids = DeclIdAllocator::new();
    let functions: Vec<DeclId> = program.calls.iter().map(|_| ids.fresh()).collect();
    let globals: Vec<DeclId> = (0..program.globals()).map(|_| ids.fresh()).collect();
    let structs: Vec<DeclId> = (0..program.structs).map(|_| ids.fresh()).collect();

    let mut declarations: Vec<Node> = structs
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let field_name = interner.intern("value");
            let field = Variable::new(ids.fresh(), field_name, Node::type_name(Name::FLOAT));
            StructType {
                id,
                name: interner.intern(&format!("S{i}")),
                fields: vec![field.into()],
            }
            .into()
        })
        .collect();

    let mut buffered: Vec<Node> = globals
        .iter()
        .enumerate()
        .map(|(g, &id)| {
            let ty = match program.global_types[g] {
                Some(s) => TypeName::resolved(interner.intern(&format!("S{s}")), structs[s]).into(),
                None => Node::type_name(Name::FLOAT),
            };
            let qualifiers = if program.uniforms[g] {
                Qualifiers::UNIFORM
            } else {
                Qualifiers::empty()
            };
            Variable::new(id, interner.intern(&program.global_name(g)), ty)
                .with_qualifiers(qualifiers)
                .into()
        })
        .collect();
    let loose = buffered.split_off(program.buffered);

    if !buffered.is_empty() {
        let cb = ConstantBuffer::new(ids.fresh(), interner.intern("Globals"), buffered);
        declarations.push(cb.into());
    }
    declarations.extend(loose);

    for (i, &id) in functions.iter().enumerate() {
        let mut body = Vec::new();
        for &callee in &program.calls[i] {
            let name = interner.intern(&format!("f{callee}"));
            let call = MethodInvocation::new(name, Vec::new(), Some(functions[callee]));
            body.push(Node::statement(call.into()));
        }
        for &global in &program.reads[i] {
            let name = interner.intern(&program.global_name(global));
            let read = VariableRef::new(name, Some(globals[global]));
            body.push(Node::statement(read.into()));
        }
        let name = interner.intern(&format!("f{i}"));
        let method = MethodDefinition::new(id, name, Node::type_name(Name::FLOAT), Vec::new())
            .with_body(body);
        declarations.push(method.into());
    }

    Built {
        shader: Shader::new(declarations),
        interner,
        functions,
        globals,
        structs,
    }
}

fn entry_names(program: &Program) -> Vec<String> {
    program.entries.iter().map(|i| format!("f{i}")).collect()
}

/// Functions, globals and structs expected to survive, computed directly on
/// the program. Globals kept unconditionally seed the walk along with the
/// entry points.
struct Expected {
    functions: BTreeSet<usize>,
    globals: BTreeSet<usize>,
    structs: BTreeSet<usize>,
}

fn expected(program: &Program, options: &StripOptions) -> Expected {
    let mut functions = BTreeSet::new();
    let mut stack = program.entries.clone();
    while let Some(f) = stack.pop() {
        if functions.insert(f) {
            stack.extend(program.calls[f].iter().copied());
        }
    }

    let whole_buffer = options.keep_constant_buffers || !options.strip_uniforms;
    let globals: BTreeSet<usize> = (0..program.globals())
        .filter(|&g| {
            program.reserved == Some(g)
                || (program.uniforms[g] && !options.strip_uniforms)
                || (g < program.buffered && whole_buffer)
        })
        .chain(functions.iter().flat_map(|&f| program.reads[f].iter().copied()))
        .collect();
    let structs = globals
        .iter()
        .filter_map(|&g| program.global_types[g])
        .collect();

    Expected {
        functions,
        globals,
        structs,
    }
}

fn present(shader: &Shader) -> BTreeSet<DeclId> {
    shader.strippable_ids().into_iter().collect()
}

/// Every declaration in the tree, and every back-reference pointing at one.
#[derive(Default)]
struct References {
    declared: BTreeSet<DeclId>,
    referenced: Vec<DeclId>,
}

impl<'ast> Visitor<'ast> for References {
    fn pre_visit(&mut self, node: &'ast Node, _ancestry: &Ancestry<'ast>) {
        self.declared.extend(node.declaration_id());
        let target = match &node.kind {
            NodeKind::VariableRef(var_ref) => var_ref.declaration,
            NodeKind::MethodInvocation(call) => call.declaration,
            NodeKind::TypeName(ty) => ty.declaration,
            _ => None,
        };
        self.referenced.extend(target);
    }
}

fn options_strategy() -> impl Strategy<Value = StripOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(keep, strip_uniforms)| {
        StripOptions::default()
            .with_keep_constant_buffers(keep)
            .with_strip_uniforms(strip_uniforms)
    })
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Reachable and exempt declarations survive; everything else is removed.
    #[test]
    fn prop_sound_and_minimal(program in program_strategy(), options in options_strategy()) {
        let mut built = build(&program);
        let expected = expected(&program, &options);

        strip_shader(&mut built.shader, &built.interner, &entry_names(&program), options).unwrap();

        let present = present(&built.shader);
        for (i, id) in built.functions.iter().enumerate() {
            prop_assert_eq!(
                present.contains(id),
                expected.functions.contains(&i),
                "function f{}",
                i
            );
        }
        for (g, id) in built.globals.iter().enumerate() {
            prop_assert_eq!(present.contains(id), expected.globals.contains(&g), "global g{}", g);
        }
        for (s, id) in built.structs.iter().enumerate() {
            prop_assert_eq!(present.contains(id), expected.structs.contains(&s), "struct S{}", s);
        }
    }

    /// Every back-reference left in the tree points at a present declaration.
    #[test]
    fn prop_no_dangling_references(program in program_strategy(), options in options_strategy()) {
        let mut built = build(&program);

        strip_shader(&mut built.shader, &built.interner, &entry_names(&program), options).unwrap();

        let mut references = References::default();
        references.visit_shader(&built.shader, &mut Ancestry::new());
        for target in &references.referenced {
            prop_assert!(references.declared.contains(target), "{:?} dangles", target);
        }
    }

    /// Everything the closure collects over the unstripped graph survives.
    #[test]
    fn prop_closure_survives(program in program_strategy(), keep in any::<bool>()) {
        let mut built = build(&program);
        let graph = ReferenceGraph::build(&built.shader, keep);
        let roots: Vec<DeclId> = program.entries.iter().map(|&i| built.functions[i]).collect();
        let collected = collect_references(&graph, &roots);
        let strippable = present(&built.shader);

        let options = StripOptions::default().with_keep_constant_buffers(keep);
        strip_shader(&mut built.shader, &built.interner, &entry_names(&program), options).unwrap();

        let after = present(&built.shader);
        for id in collected.iter().filter(|id| strippable.contains(id)) {
            prop_assert!(after.contains(&id), "{:?} was collected but removed", id);
        }
    }

    /// A second run with the same entry points changes nothing.
    #[test]
    fn prop_idempotence(
        program in program_strategy(),
        keep in any::<bool>(),
        strip_uniforms in any::<bool>(),
    ) {
        let mut built = build(&program);
        let options = StripOptions::default()
            .with_keep_constant_buffers(keep)
            .with_strip_uniforms(strip_uniforms);
        let entries = entry_names(&program);

        let first = strip_shader(&mut built.shader, &built.interner, &entries, options.clone()).unwrap();
        let after_first = built.shader.clone();
        let second = strip_shader(&mut built.shader, &built.interner, &entries, options).unwrap();

        prop_assert!(second.is_noop(), "second run removed {:?}", second);
        prop_assert_eq!(&built.shader, &after_first);
        prop_assert_eq!(second.collected, first.collected);
    }

    /// An unknown entry point fails without touching the tree.
    #[test]
    fn prop_failure_is_atomic(program in program_strategy()) {
        let mut built = build(&program);
        let before = built.shader.clone();
        let mut entries = entry_names(&program);
        entries.push("Missing".to_owned());

        let result = strip_shader(&mut built.shader, &built.interner, &entries, StripOptions::default());

        prop_assert_eq!(
            result,
            Err(StripError::EntryPointNotFound { name: "Missing".to_owned() })
        );
        prop_assert_eq!(&built.shader, &before);
    }
}
