//! Reachability closure over the reference graph.

use rustc_hash::FxHashSet;

use sdsl_ir::DeclId;

use crate::graph::ReferenceGraph;

/// Declarations reached by the closure, in discovery order.
///
/// Insertion-ordered, duplicate-free, and never shrinks.
#[derive(Clone, Debug, Default)]
pub struct CollectedSet {
    order: Vec<DeclId>,
    members: FxHashSet<DeclId>,
}

impl CollectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`. Returns `false` if it was already collected.
    pub fn insert(&mut self, id: DeclId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    #[inline]
    pub fn contains(&self, id: DeclId) -> bool {
        self.members.contains(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Collected declarations in discovery order.
    #[inline]
    pub fn as_slice(&self) -> &[DeclId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.order.iter().copied()
    }
}

impl FromIterator<DeclId> for CollectedSet {
    fn from_iter<I: IntoIterator<Item = DeclId>>(iter: I) -> Self {
        let mut set = CollectedSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Depth-first closure of `roots` over `graph`.
///
/// Each declaration is expanded once, so cycles terminate. Discovery order
/// matches a recursive pre-order walk: roots in order, successors in edge
/// insertion order.
#[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn collect_references(graph: &ReferenceGraph, roots: &[DeclId]) -> CollectedSet {
    let mut collected = CollectedSet::new();
    let mut stack: Vec<DeclId> = roots.iter().rev().copied().collect();

    while let Some(id) = stack.pop() {
        if !collected.insert(id) {
            continue;
        }
        stack.extend(
            graph
                .successors(id)
                .iter()
                .rev()
                .filter(|&&next| !collected.contains(next)),
        );
    }

    tracing::debug!(collected = collected.len(), "closure computed");
    collected
}

#[cfg(test)]
mod tests;
