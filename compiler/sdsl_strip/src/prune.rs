//! In-place removal of declarations outside the closure.
//!
//! Only the top-level declaration list, constant-buffer member lists and
//! variable groups are pruned. Method bodies are never entered.
//!
//! Exemptions are checked before reachability:
//!
//! 1. a `uniform` variable is kept when uniforms are not stripped;
//! 2. a variable with a reserved name is kept;
//! 3. a group first drops its uncollected sub-variables and survives if any
//!    remain;
//! 4. a top-level constant buffer always survives; its members are pruned
//!    only when uniforms are stripped.
//!
//! Everything an exemption keeps is also a closure root
//! ([`Exemptions::extend_roots`]), so a kept declaration never loses what it
//! references.

use smallvec::SmallVec;

use sdsl_ir::{DeclId, Name, Node, NodeKind, Variable};

use crate::reachability::CollectedSet;

/// Which list is being pruned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Level {
    TopLevel,
    Member,
}

/// Counts of removed nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PruneStats {
    pub(crate) removed_declarations: usize,
    pub(crate) removed_members: usize,
}

/// Declarations kept regardless of reachability.
#[derive(Clone, Debug)]
pub(crate) struct Exemptions {
    strip_uniforms: bool,
    reserved: SmallVec<[Name; 2]>,
}

impl Exemptions {
    pub(crate) fn new(strip_uniforms: bool, reserved: impl IntoIterator<Item = Name>) -> Self {
        Exemptions {
            strip_uniforms,
            reserved: reserved.into_iter().collect(),
        }
    }

    /// Whether `variable` survives without being collected.
    pub(crate) fn covers(&self, variable: &Variable) -> bool {
        (!self.strip_uniforms && variable.is_uniform()) || self.reserved.contains(&variable.name)
    }

    /// Extend `roots` with every declaration pruning keeps unconditionally,
    /// so the closure also keeps what they require.
    ///
    /// Constant buffers are listed when their members are left untouched.
    pub(crate) fn extend_roots(&self, declarations: &[Node], roots: &mut SmallVec<[DeclId; 8]>) {
        for node in declarations {
            match &node.kind {
                NodeKind::ConstantBuffer(cb) if !self.strip_uniforms => roots.push(cb.id),
                NodeKind::ConstantBuffer(cb) => self.extend_roots(&cb.members, roots),
                NodeKind::Variable(variable) => self.extend_variable_roots(variable, roots),
                _ => {}
            }
        }
    }

    fn extend_variable_roots(&self, variable: &Variable, roots: &mut SmallVec<[DeclId; 8]>) {
        if self.covers(variable) {
            roots.push(variable.id);
            return;
        }
        for sub in variable.sub_variables() {
            self.extend_variable_roots(sub, roots);
        }
    }
}

pub(crate) struct Pruner<'a> {
    collected: &'a CollectedSet,
    exemptions: &'a Exemptions,
    stats: PruneStats,
}

impl<'a> Pruner<'a> {
    pub(crate) fn new(collected: &'a CollectedSet, exemptions: &'a Exemptions) -> Self {
        Pruner {
            collected,
            exemptions,
            stats: PruneStats::default(),
        }
    }

    /// Prune a top-level declaration list in place.
    pub(crate) fn prune(mut self, declarations: &mut Vec<Node>) -> PruneStats {
        self.prune_list(declarations, Level::TopLevel);
        self.stats
    }

    fn prune_list(&mut self, nodes: &mut Vec<Node>, level: Level) {
        let mut i = 0;
        while i < nodes.len() {
            if self.keep(&mut nodes[i], level) {
                i += 1;
                continue;
            }
            let removed = nodes.remove(i);
            tracing::trace!(
                decl = removed.declaration_id().map(|id| id.raw()),
                name = removed.declared_name().map(Name::raw),
                ?level,
                "removed declaration"
            );
            match level {
                Level::TopLevel => self.stats.removed_declarations += 1,
                Level::Member => self.stats.removed_members += 1,
            }
        }
    }

    fn keep(&mut self, node: &mut Node, level: Level) -> bool {
        let id = node.declaration_id();
        match &mut node.kind {
            NodeKind::ConstantBuffer(cb) if level == Level::TopLevel => {
                if self.exemptions.strip_uniforms {
                    self.prune_list(&mut cb.members, Level::Member);
                }
                true
            }
            NodeKind::Variable(variable) => self.keep_variable(variable),
            _ => match id {
                Some(id) => self.collected.contains(id),
                None => true,
            },
        }
    }

    fn keep_variable(&mut self, variable: &mut Variable) -> bool {
        if self.exemptions.covers(variable) {
            return true;
        }
        if variable.is_group() {
            self.prune_list(&mut variable.sub_variables, Level::Member);
            return !variable.sub_variables.is_empty();
        }
        self.collected.contains(variable.id)
    }
}
