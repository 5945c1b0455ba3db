//! The strip pass: graph build, closure, pruning.
//!
//! # Phases
//!
//! ```text
//! NotStarted -> ClosureComputing -> ClosureDone -> Pruning -> Done
//!                      |
//!                      +-> Failed
//! ```
//!
//! Everything that can fail happens in `ClosureComputing`, before the tree
//! is touched. `Failed` therefore always leaves the shader unmodified.
//!
//! [`StripPass::run`] drives both halves; [`StripPass::compute`] and
//! [`StripPass::prune`] expose them separately so the closure can be
//! inspected in `ClosureDone`.

use smallvec::SmallVec;

use sdsl_ir::{DeclId, Shader, StringInterner};

use crate::error::StripError;
use crate::graph::ReferenceGraph;
use crate::options::StripOptions;
use crate::prune::{Exemptions, Pruner};
use crate::reachability::{collect_references, CollectedSet};

/// Progress of a [`StripPass`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StripPhase {
    #[default]
    NotStarted,
    ClosureComputing,
    ClosureDone,
    Pruning,
    Done,
    Failed,
}

impl StripPhase {
    /// `Done` or `Failed`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, StripPhase::Done | StripPhase::Failed)
    }
}

/// Summary of one successful run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StripOutcome {
    /// Distinct edges in the reference graph.
    pub edges: usize,
    /// Declarations in the closure.
    pub collected: usize,
    /// Top-level declarations removed.
    pub removed_declarations: usize,
    /// Constant-buffer members and group sub-variables removed.
    pub removed_members: usize,
}

impl StripOutcome {
    /// Total nodes removed.
    #[inline]
    pub fn removed(&self) -> usize {
        self.removed_declarations + self.removed_members
    }

    /// Whether the run left the tree unchanged.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.removed() == 0
    }
}

/// Dead declaration stripping for one shader at a time.
///
/// The pass can be run repeatedly; each run starts from `NotStarted`.
pub struct StripPass<'a> {
    interner: &'a StringInterner,
    options: StripOptions,
    phase: StripPhase,
}

impl<'a> StripPass<'a> {
    pub fn new(interner: &'a StringInterner, options: StripOptions) -> Self {
        StripPass {
            interner,
            options,
            phase: StripPhase::NotStarted,
        }
    }

    #[inline]
    pub fn phase(&self) -> StripPhase {
        self.phase
    }

    #[inline]
    pub fn options(&self) -> &StripOptions {
        &self.options
    }

    /// Strip every declaration of `shader` not required by `entry_points`.
    pub fn run<S: AsRef<str>>(
        &mut self,
        shader: &mut Shader,
        entry_points: &[S],
    ) -> Result<StripOutcome, StripError> {
        let closure = self.compute(shader, entry_points)?;
        Ok(self.prune(shader, &closure))
    }

    /// Resolve the entry points and compute the closure without touching
    /// the tree. Leaves the pass in `ClosureDone`, or `Failed` on error.
    #[tracing::instrument(level = "debug", skip_all, fields(entry_points = entry_points.len()))]
    pub fn compute<S: AsRef<str>>(
        &mut self,
        shader: &Shader,
        entry_points: &[S],
    ) -> Result<StripClosure, StripError> {
        self.phase = StripPhase::ClosureComputing;

        let exemptions = Exemptions::new(
            self.options.strip_uniforms,
            self.options.reserved(self.interner),
        );
        let roots = match self.resolve_roots(shader, entry_points, &exemptions) {
            Ok(roots) => roots,
            Err(error) => {
                self.phase = StripPhase::Failed;
                tracing::warn!(code = error.code(), "{error}");
                return Err(error);
            }
        };
        let graph = ReferenceGraph::build(shader, self.options.keep_constant_buffers);
        let collected = collect_references(&graph, &roots);
        self.phase = StripPhase::ClosureDone;

        Ok(StripClosure {
            graph,
            collected,
            exemptions,
        })
    }

    /// Remove from `shader` every declaration outside `closure`.
    ///
    /// `closure` must come from [`compute`](Self::compute) on the same,
    /// unmodified shader.
    pub fn prune(&mut self, shader: &mut Shader, closure: &StripClosure) -> StripOutcome {
        self.phase = StripPhase::Pruning;
        let stats = Pruner::new(&closure.collected, &closure.exemptions)
            .prune(&mut shader.declarations);
        self.phase = StripPhase::Done;

        let outcome = StripOutcome {
            edges: closure.graph.edge_count(),
            collected: closure.collected.len(),
            removed_declarations: stats.removed_declarations,
            removed_members: stats.removed_members,
        };
        tracing::debug!(
            edges = outcome.edges,
            collected = outcome.collected,
            removed_declarations = outcome.removed_declarations,
            removed_members = outcome.removed_members,
            "strip pass done"
        );
        outcome
    }

    /// Entry-point definitions, every top-level constant buffer when
    /// buffers are kept whole, and every exempt declaration.
    fn resolve_roots<S: AsRef<str>>(
        &self,
        shader: &Shader,
        entry_points: &[S],
        exemptions: &Exemptions,
    ) -> Result<SmallVec<[DeclId; 8]>, StripError> {
        if entry_points.is_empty() {
            return Err(StripError::NoEntryPoints);
        }

        let mut roots = SmallVec::new();
        for entry_point in entry_points {
            let text = entry_point.as_ref();
            let method = self
                .interner
                .get(text)
                .and_then(|name| shader.find_method_definition(name))
                .ok_or_else(|| StripError::EntryPointNotFound {
                    name: text.to_owned(),
                })?;
            roots.push(method.id);
        }

        if self.options.keep_constant_buffers {
            roots.extend(shader.constant_buffers().map(|cb| cb.id));
        }
        exemptions.extend_roots(&shader.declarations, &mut roots);
        Ok(roots)
    }
}

/// Reference graph and closure of one shader, between
/// [`StripPass::compute`] and [`StripPass::prune`].
#[derive(Clone, Debug)]
pub struct StripClosure {
    graph: ReferenceGraph,
    collected: CollectedSet,
    exemptions: Exemptions,
}

impl StripClosure {
    #[inline]
    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    #[inline]
    pub fn collected(&self) -> &CollectedSet {
        &self.collected
    }
}

/// Run a [`StripPass`] once.
pub fn strip_shader<S: AsRef<str>>(
    shader: &mut Shader,
    interner: &StringInterner,
    entry_points: &[S],
    options: StripOptions,
) -> Result<StripOutcome, StripError> {
    StripPass::new(interner, options).run(shader, entry_points)
}
