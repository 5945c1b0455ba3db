//! Strip pass errors.
//!
//! Every error here is a configuration error raised before the tree is
//! touched: when `run` returns `Err`, the shader is exactly as it was passed
//! in.

/// Failure of the strip pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StripError {
    /// No top-level method definition matches an entry-point name.
    #[error("could not find entry point named `{name}`")]
    EntryPointNotFound { name: String },

    /// The pass was invoked without any entry point.
    #[error("no entry points given")]
    NoEntryPoints,
}

impl StripError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            StripError::EntryPointNotFound { .. } => "S0001",
            StripError::NoEntryPoints => "S0002",
        }
    }
}
