// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path normalization, the rule model, and the recursive rule evaluator at
//! the heart of DirSchema. This crate knows nothing about filesystems, ZIP
//! archives, or YAML documents: it consumes a [`rule::Rule`] tree and a
//! [`adapter::TreeAdapter`] implementation and produces an [`error::ErrorReport`]
//! per failing path. Concrete adapters and document loading live in sibling
//! crates.

pub mod adapter;
pub mod driver;
pub mod error;
pub mod eval;
pub mod meta;
pub mod path;
pub mod resolver;
pub mod rule;
pub mod state;
pub mod validator;

pub use driver::{Driver, RunReport};
pub use error::{ErrorReport, EvalError, ValidationError};
pub use eval::Evaluator;
pub use meta::MetaConvention;
pub use resolver::{ResolveContext, ResolvedSchema};
pub use rule::{Rule, RuleNode, SchemaRef, TypePredicate};
pub use validator::{JsonValidator, NullValidator};
