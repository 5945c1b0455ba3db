//! Declaration identifiers.
//!
//! Every declaration node carries a `DeclId`. Reference nodes point back at
//! the declaration they resolve to with an `Option<DeclId>`, so the tree
//! never owns its back-references and cycles between declarations stay
//! plain data.

use std::fmt;

/// Identifier of a declaration within one shader tree.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    /// Create a new declaration ID from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        DeclId(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// Sequential allocator for [`DeclId`]s.
///
/// The producer of a tree (the semantic pass) owns one allocator per shader
/// so identifiers are unique within that shader.
#[derive(Debug, Default, Clone)]
pub struct DeclIdAllocator {
    next: u32,
}

impl DeclIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier.
    pub fn fresh(&mut self) -> DeclId {
        let id = DeclId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers handed out so far.
    pub fn allocated(&self) -> usize {
        self.next as usize
    }
}
