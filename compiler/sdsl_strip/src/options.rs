//! Strip pass configuration.

use sdsl_ir::{Name, StringInterner};

/// Variable the engine's render pipeline reads by name at runtime, so it is
/// never stripped even when unreferenced.
pub const FLIP_RENDERTARGET: &str = "ParadoxFlipRendertarget";

/// Configuration for the strip pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOptions {
    /// Remove unreferenced `uniform` variables and unreferenced
    /// constant-buffer members.
    /// Defaults to `true`.
    pub strip_uniforms: bool,

    /// Treat every constant buffer as one reachability unit: a referenced
    /// member keeps all of its siblings, and every top-level buffer seeds
    /// the closure.
    /// Defaults to `true`.
    pub keep_constant_buffers: bool,

    /// Variable names retained regardless of reachability.
    /// Defaults to [`FLIP_RENDERTARGET`].
    pub reserved_names: Vec<String>,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            strip_uniforms: true,
            keep_constant_buffers: true,
            reserved_names: vec![FLIP_RENDERTARGET.to_owned()],
        }
    }
}

impl StripOptions {
    #[must_use]
    pub fn with_strip_uniforms(mut self, strip_uniforms: bool) -> Self {
        self.strip_uniforms = strip_uniforms;
        self
    }

    #[must_use]
    pub fn with_keep_constant_buffers(mut self, keep_constant_buffers: bool) -> Self {
        self.keep_constant_buffers = keep_constant_buffers;
        self
    }

    /// Replace the reserved-name list.
    #[must_use]
    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append one name to the reserved-name list.
    #[must_use]
    pub fn with_reserved_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.push(name.into());
        self
    }

    /// Reserved names that occur in the shader. Names the interner has
    /// never seen cannot match any declaration and are skipped.
    pub fn reserved<'a>(
        &'a self,
        interner: &'a StringInterner,
    ) -> impl Iterator<Item = Name> + 'a {
        self.reserved_names
            .iter()
            .filter(|name| !name.is_empty())
            .filter_map(|name| interner.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let options = StripOptions::default();
        assert!(options.strip_uniforms);
        assert!(options.keep_constant_buffers);
        assert_eq!(options.reserved_names, vec![FLIP_RENDERTARGET.to_owned()]);
    }

    #[test]
    fn builder_setters() {
        let options = StripOptions::default()
            .with_strip_uniforms(false)
            .with_keep_constant_buffers(false)
            .with_reserved_names(["Exposure"])
            .with_reserved_name("Gamma");

        assert!(!options.strip_uniforms);
        assert!(!options.keep_constant_buffers);
        assert_eq!(options.reserved_names, vec!["Exposure".to_owned(), "Gamma".to_owned()]);
    }

    #[test]
    fn reserved_resolves_only_interned_names() {
        let interner = StringInterner::new();
        let flip = interner.intern(FLIP_RENDERTARGET);
        let gamma = interner.intern("Gamma");
        let options = StripOptions::default()
            .with_reserved_name("Gamma")
            .with_reserved_name("NeverSeen")
            .with_reserved_name("");

        let reserved: Vec<Name> = options.reserved(&interner).collect();

        assert_eq!(reserved, vec![flip, gamma]);
    }
}
