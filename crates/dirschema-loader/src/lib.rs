// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a YAML or JSON rule document on disk into a [`dirschema_core::rule::Rule`]
//! that `dirschema-core` can evaluate, resolving every `$ref` along the way.

pub mod document;
pub mod error;

pub use document::{discover_default_schema, load_rule_document, load_rule_str, DocumentFormat, LoadedDocument};
pub use error::LoadError;
