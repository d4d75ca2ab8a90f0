// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `JsonValidator` boundary (spec §6): validates a JSON value against a
//! resolved schema, or dispatches to a registered plugin. Implemented by
//! the `dirschema-schema` crate; the evaluator only sees this trait.

use crate::adapter::TreeAdapter;
use crate::error::ValidationError;
use crate::resolver::ResolvedSchema;
use serde_json::Value;

/// Validates JSON values against resolved schemas and runs validator
/// plugins. A single instance is shared across every path in a run so
/// implementations can memoize compiled schemas (spec §5).
pub trait JsonValidator: Send + Sync {
    /// Validates `value` against `schema`. `schema` is never
    /// `ResolvedSchema::Plugin` here; plugin invocations go through
    /// [`JsonValidator::run_plugin`] instead, since they take a target path
    /// and adapter rather than an already-loaded JSON value.
    fn validate(&self, schema: &ResolvedSchema, value: &Value) -> Result<(), ValidationError>;

    /// Invokes the plugin registered under `name` with `argument` against
    /// `target_path`, giving it adapter access to load whatever content it
    /// needs.
    fn run_plugin(
        &self,
        name: &str,
        argument: &str,
        target_path: &str,
        adapter: &dyn TreeAdapter,
    ) -> Result<(), ValidationError>;
}

/// A `JsonValidator` that rejects every schema: useful as a default when a
/// consumer only cares about structural (`type`) rules and never reaches
/// for a real JSON Schema backend.
pub struct NullValidator;

impl JsonValidator for NullValidator {
    fn validate(&self, _schema: &ResolvedSchema, _value: &Value) -> Result<(), ValidationError> {
        Err(ValidationError::new(
            "no JsonValidator backend configured for `valid`/`validMeta`",
        ))
    }

    fn run_plugin(
        &self,
        name: &str,
        _argument: &str,
        _target_path: &str,
        _adapter: &dyn TreeAdapter,
    ) -> Result<(), ValidationError> {
        Err(ValidationError::new(format!("no plugin registered under `{name}`")))
    }
}
