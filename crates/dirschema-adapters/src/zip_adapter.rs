// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ZIP archive `TreeAdapter`. Archives are read fully into memory at
//! construction time (most dirschema targets are small, and `zip`'s
//! `ZipFile` handles don't implement `Send`/`Sync`, which the evaluator
//! requires of every `TreeAdapter`): enumeration and `is_dir` afterward are
//! plain map lookups, and implied parent directories (many ZIP writers never
//! emit an explicit entry for them) are synthesized at load time.

use crate::error::AdapterError;
use dirschema_core::adapter::{self, TreeAdapter};
use dirschema_core::path;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct ZipAdapter {
    paths: Vec<String>,
    dirs: BTreeSet<String>,
    files: HashMap<String, Vec<u8>>,
}

impl ZipAdapter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, adapter::AdapterError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| AdapterError::Read {
            path: display.clone(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|source| AdapterError::ZipOpen {
            path: display.clone(),
            source,
        })?;

        let mut dirs = BTreeSet::new();
        let mut files = HashMap::new();
        dirs.insert(String::new());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|source| AdapterError::ZipEntry {
                path: display.clone(),
                source,
            })?;
            let raw_name = entry.name().trim_end_matches('/').to_string();
            let normalized = path::normalize(&raw_name).unwrap_or(raw_name);
            register_ancestors(&mut dirs, &normalized);

            if entry.is_dir() {
                dirs.insert(normalized);
            } else {
                let mut buf = Vec::new();
                entry.read_to_end(&mut buf).map_err(|source| AdapterError::Read {
                    path: normalized.clone(),
                    source,
                })?;
                files.insert(normalized, buf);
            }
        }

        let mut paths: Vec<String> = dirs.iter().cloned().chain(files.keys().cloned()).collect();
        paths.sort();
        paths.dedup();

        Ok(Self { paths, dirs, files })
    }
}

/// Inserts every ancestor directory of `path` (not `path` itself) into
/// `dirs`, so `img/a.jpg` with no explicit `img/` entry still makes `img` a
/// directory.
fn register_ancestors(dirs: &mut BTreeSet<String>, path: &str) {
    let mut current = path.to_string();
    while !current.is_empty() {
        let (parent, _) = path::split_parent(&current);
        let parent = parent.to_string();
        let inserted_new = dirs.insert(parent.clone());
        if !inserted_new && !parent.is_empty() {
            break;
        }
        current = parent;
    }
}

impl TreeAdapter for ZipAdapter {
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
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| AdapterError::NotFound { path: path.to_string() })?;
        serde_json::from_slice(bytes)
            .map_err(|source| AdapterError::NotJson { path: path.to_string(), source }.into())
    }
}
