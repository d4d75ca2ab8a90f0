// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `JsonValidator` boundary (spec §6): validates a JSON value against a
//! resolved schema and runs validator plugins. This crate owns schema
//! fetching (`file://`/`local://`/`cwd://` reads, `http(s)://` fetches) and
//! the compiled-schema cache; `dirschema-core` only sees the
//! [`dirschema_core::validator::JsonValidator`] trait.

pub mod error;
pub mod plugin;

#[cfg(feature = "jsonschema-backend")]
pub mod backend;

pub use error::SchemaError;
pub use plugin::{PluginRegistry, ValidatorPlugin};

#[cfg(feature = "jsonschema-backend")]
pub use backend::JsonSchemaValidator;
