//! DirSchema - declarative structural and metadata constraints over
//! tree-shaped hierarchical containers.
//!
//! This is the facade crate: it re-exports the component crates in the
//! workspace so a consumer can depend on a single `dirschema` crate instead
//! of wiring up `dirschema-core`, `dirschema-schema`, `dirschema-adapters`
//! and `dirschema-loader` individually.

// Re-export the evaluator core: path normalization, the rule model, match
// state, the evaluator and driver.
pub use dirschema_core as core;

// Re-export the other major components.
pub use dirschema_adapters as adapters;
pub use dirschema_loader as loader;
pub use dirschema_schema as schema;

// Convenience re-exports of the types most consumers need.
pub use dirschema_core::driver::{Driver, RunReport};
pub use dirschema_core::error::EvalError;
pub use dirschema_core::rule::Rule;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
