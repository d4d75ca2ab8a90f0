// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete [`dirschema_core::adapter::TreeAdapter`] implementations. Each
//! backend is feature-gated and the evaluator never inspects which one it
//! was handed (spec §9: "adapter polymorphism").

pub mod error;

#[cfg(feature = "fs")]
pub mod fs;

#[cfg(feature = "zip")]
pub mod zip_adapter;

#[cfg(feature = "hdf5")]
pub mod hdf5_adapter;

#[cfg(feature = "fs")]
pub use fs::FilesystemAdapter;

#[cfg(feature = "zip")]
pub use zip_adapter::ZipAdapter;

#[cfg(feature = "hdf5")]
pub use hdf5_adapter::Hdf5Adapter;
