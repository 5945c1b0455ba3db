//! Dead declaration stripping for SDSL shaders.
//!
//! Given a resolved [`Shader`](sdsl_ir::Shader) and a list of entry-point
//! names, the pass keeps every declaration the entry points transitively
//! require and deletes the rest in place.
//!
//! - **Reference graph** ([`ReferenceGraph`]): one visitor traversal
//!   records "requires" edges between declarations.
//! - **Closure** ([`collect_references`], [`CollectedSet`]): iterative
//!   depth-first reachability from the entry points.
//! - **Pruning**: index-adjusted removal from the top-level list, constant
//!   buffer members and variable groups, with uniform, reserved-name and
//!   buffer-atomicity exemptions.
//! - **Pass** ([`StripPass`], [`strip_shader`]): the phase machine tying
//!   the three together.
//!
//! # Crate Dependencies
//!
//! `sdsl_strip` depends on `sdsl_ir` for the tree, the interner and the
//! visitor framework.

mod error;
pub mod graph;
mod options;
mod pass;
mod prune;
pub mod reachability;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use error::StripError;
pub use graph::ReferenceGraph;
pub use options::{StripOptions, FLIP_RENDERTARGET};
pub use pass::{strip_shader, StripClosure, StripOutcome, StripPass, StripPhase};
pub use reachability::{collect_references, CollectedSet};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debugging the strip pass.
///
/// Installs a hierarchical subscriber filtered by `RUST_LOG`. Does nothing
/// when `RUST_LOG` is unset, and only runs once per process.
///
/// ```bash
/// RUST_LOG=sdsl_strip=trace cargo test -p sdsl_strip
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(tree)
                .with(filter)
                .try_init();
        }
    });
}
