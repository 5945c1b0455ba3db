//! String interner for identifiers.
//!
//! Interning is behind a single `RwLock` so a shared `&StringInterner` can be
//! handed to every phase. Strings are leaked on insertion and live for the
//! rest of the process.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::name::WELL_KNOWN;
use crate::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// More than `u32::MAX` strings were interned.
    #[error("interner exceeded capacity: {count} strings, max is {}", u32::MAX)]
    Overflow { count: usize },
}

#[derive(Default)]
struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl InternTable {
    fn insert(&mut self, s: &str) -> Result<Name, InternError> {
        if let Some(&index) = self.map.get(s) {
            return Ok(Name::from_raw(index));
        }
        let index = u32::try_from(self.strings.len()).map_err(|_| InternError::Overflow {
            count: self.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.strings.push(leaked);
        self.map.insert(leaked, index);
        Ok(Name::from_raw(index))
    }
}

/// Interner mapping identifier text to [`Name`]s.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the well-known names pre-interned.
    pub fn new() -> Self {
        let mut table = InternTable::default();
        for &s in WELL_KNOWN {
            // The table is empty, so the well-known list cannot overflow it.
            let _ = table.insert(s);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(s) {
            return Ok(name);
        }
        self.table.write().insert(s)
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity. Use `try_intern` for
    /// fallible interning.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up an already interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&index| Name::from_raw(index))
    }

    /// Look up the string for a Name.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, well-known names included.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if only the well-known names are interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= WELL_KNOWN.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_lookup() {
        let interner = StringInterner::new();

        let light = interner.intern("LightColor");
        let fog = interner.intern("FogColor");
        let light2 = interner.intern("LightColor");

        assert_eq!(light, light2);
        assert_ne!(light, fog);
        assert_eq!(interner.lookup(light), "LightColor");
        assert_eq!(interner.lookup(fog), "FogColor");
    }

    #[test]
    fn get_does_not_insert() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());
        assert_eq!(interner.get("Missing"), None);
        assert!(interner.is_empty());

        let ps = interner.intern("PS");
        assert_eq!(interner.get("PS"), Some(ps));
        assert_eq!(interner.len(), WELL_KNOWN.len() + 1);
    }

    #[test]
    fn foreign_name_is_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::from_raw(10_000)), "");
    }
}
