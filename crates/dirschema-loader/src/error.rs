// SPDX-License-Identifier: MIT OR Apache-2.0

//! "Rule-document invalid" errors (spec §7): anything that aborts the whole
//! run before a single path is evaluated.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` is not valid {format}: {message}")]
    Parse {
        path: String,
        format: &'static str,
        message: String,
    },

    #[error("cyclic $ref detected at `{0}`")]
    RefCycle(String),

    #[error("$ref target not found: `{0}`")]
    RefNotFound(String),

    #[error("$ref to a remote http(s) document is not supported: `{0}`")]
    RemoteRefUnsupported(String),

    #[error("metaConvention is invalid: {0}")]
    InvalidMetaConvention(String),

    #[error(transparent)]
    Rule(#[from] dirschema_core::error::EvalError),
}
