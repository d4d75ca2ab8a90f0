// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised while fetching, compiling, or running a schema — the
//! "schema resolution failure" kind in the evaluator's error taxonomy
//! (spec §7), surfaced to the core as a [`dirschema_core::error::ValidationError`].

use dirschema_core::error::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("failed to read local schema `{path}`: {source}")]
    ReadLocal {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch remote schema `{uri}`: {message}")]
    Fetch { uri: String, message: String },

    #[error("schema document `{location}` is not valid JSON: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to compile JSON Schema `{location}`: {message}")]
    Compile { location: String, message: String },

    #[error("no validator plugin registered under `{0}`")]
    UnknownPlugin(String),

    #[error("no JSON Schema backend is compiled into this build (enable the `jsonschema-backend` feature)")]
    BackendDisabled,
}

impl From<SchemaError> for ValidationError {
    fn from(err: SchemaError) -> Self {
        ValidationError::new(err.to_string())
    }
}
