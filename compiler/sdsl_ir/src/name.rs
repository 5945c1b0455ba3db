//! Interned string identifier.
//!
//! A `Name` is a plain index into a [`StringInterner`](crate::StringInterner).
//! The first entries of every interner are the well-known names below, so
//! their indices are stable and exposed as constants.

use std::fmt;

/// Names pre-interned by every `StringInterner`, in index order.
///
/// The constants on [`Name`] index into this table. Appending is fine;
/// reordering breaks the constants.
pub const WELL_KNOWN: &[&str] = &[
    "", "matrix", "vector", "bool", "int", "uint", "half", "float", "double",
];

/// Interned string identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);
    /// `matrix`, the generic matrix type.
    pub const MATRIX: Name = Name(1);
    /// `vector`, the generic vector type.
    pub const VECTOR: Name = Name(2);
    pub const BOOL: Name = Name(3);
    pub const INT: Name = Name(4);
    pub const UINT: Name = Name(5);
    pub const HALF: Name = Name(6);
    pub const FLOAT: Name = Name(7);
    pub const DOUBLE: Name = Name(8);

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the index as `usize` (for indexing into the interner table).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check whether this is the empty name (anonymous declarations, groups).
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
