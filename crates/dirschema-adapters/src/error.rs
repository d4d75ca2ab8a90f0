// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-backend I/O failures. Each variant converts into
//! `dirschema_core::adapter::AdapterError` (a boxed `std::error::Error`) via
//! the blanket `Box<dyn Error + Send + Sync>: From<E>` impl, so adapters
//! just `?` these out of `TreeAdapter` methods.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[cfg(feature = "fs")]
    #[error("failed to walk `{root}`: {source}")]
    Walk {
        root: String,
        #[source]
        source: ignore::Error,
    },

    #[error("`{path}` does not exist in this tree")]
    NotFound { path: String },

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` is not valid JSON: {source}")]
    NotJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "zip")]
    #[error("failed to open ZIP archive `{path}`: {source}")]
    ZipOpen {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[cfg(feature = "zip")]
    #[error("malformed ZIP central directory entry `{path}`: {source}")]
    ZipEntry {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[cfg(feature = "hdf5")]
    #[error("failed to open HDF5 file `{path}`: {source}")]
    Hdf5Open {
        path: String,
        #[source]
        source: hdf5::Error,
    },

    #[cfg(feature = "hdf5")]
    #[error("failed to read HDF5 dataset `{path}`: {source}")]
    Hdf5Read {
        path: String,
        #[source]
        source: hdf5::Error,
    },
}
