// SPDX-License-Identifier: MIT OR Apache-2.0

//! The HDF5 `TreeAdapter`, feature-gated behind `hdf5` (off by default: it
//! needs a system `libhdf5` to link against). HDF5 groups map to
//! directories and datasets to files; a dataset's contents are read as JSON
//! (as a scalar string holding a JSON document, falling back to raw bytes)
//! exactly like a regular file's bytes would be.
//!
//! The whole file is walked and materialized at construction time, the same
//! strategy `ZipAdapter` uses, so the adapter never has to keep an HDF5
//! handle alive across the `Send + Sync` boundary `TreeAdapter` requires.

use crate::error::AdapterError;
use dirschema_core::adapter::{self, TreeAdapter};
use dirschema_core::path;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A dataset's raw contents, captured at open time and only interpreted as
/// JSON lazily in `load_json` — a dataset holding image bytes or numeric
/// arrays is a perfectly normal (non-JSON) file, and must not make the whole
/// archive fail to open, exactly as a non-JSON file on disk doesn't stop
/// `FilesystemAdapter::new` from succeeding.
enum DatasetContent {
    Text(String),
    Bytes(Vec<u8>),
}

pub struct Hdf5Adapter {
    paths: Vec<String>,
    dirs: BTreeSet<String>,
    files: HashMap<String, DatasetContent>,
}

impl Hdf5Adapter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, adapter::AdapterError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = hdf5::File::open(path).map_err(|source| AdapterError::Hdf5Open {
            path: display.clone(),
            source,
        })?;

        let mut dirs = BTreeSet::new();
        let mut files = HashMap::new();
        walk(&file, "", &mut dirs, &mut files)?;

        let mut paths: Vec<String> = dirs.iter().cloned().chain(files.keys().cloned()).collect();
        paths.sort();
        paths.dedup();

        Ok(Self { paths, dirs, files })
    }
}

fn walk(
    group: &hdf5::Group,
    prefix: &str,
    dirs: &mut BTreeSet<String>,
    files: &mut HashMap<String, DatasetContent>,
) -> Result<(), adapter::AdapterError> {
    dirs.insert(prefix.to_string());
    let members = group.member_names().map_err(|source| AdapterError::Hdf5Read {
        path: prefix.to_string(),
        source,
    })?;
    for name in members {
        let child_path = path::join_parent_child(prefix, &name);
        if let Ok(subgroup) = group.group(&name) {
            walk(&subgroup, &child_path, dirs, files)?;
        } else if let Ok(dataset) = group.dataset(&name) {
            files.insert(child_path.clone(), read_dataset(&dataset, &child_path)?);
        }
    }
    Ok(())
}

/// Reads a dataset's raw content without judging whether it parses as JSON:
/// a scalar string dataset is kept as text, anything else as a byte blob.
fn read_dataset(dataset: &hdf5::Dataset, path: &str) -> Result<DatasetContent, adapter::AdapterError> {
    if let Ok(text) = dataset.read_scalar::<hdf5::types::VarLenUnicode>() {
        return Ok(DatasetContent::Text(text.as_str().to_string()));
    }
    let bytes = dataset.read_raw::<u8>().map_err(|source| AdapterError::Hdf5Read {
        path: path.to_string(),
        source,
    })?;
    Ok(DatasetContent::Bytes(bytes))
}

impl TreeAdapter for Hdf5Adapter {
    fn enumerate(&self) -> Result<Vec<String>, adapter::AdapterError> {
        Ok(self.paths.clone())
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.dirs.contains(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn load_json(&self, path: &str) -> Result<Value, adapter::AdapterError> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| AdapterError::NotFound { path: path.to_string() })?;
        match content {
            DatasetContent::Text(text) => serde_json::from_str(text).map_err(|source| {
                AdapterError::NotJson { path: path.to_string(), source }.into()
            }),
            DatasetContent::Bytes(bytes) => serde_json::from_slice(bytes).map_err(|source| {
                AdapterError::NotJson { path: path.to_string(), source }.into()
            }),
        }
    }
}
