// SPDX-License-Identifier: MIT OR Apache-2.0

//! The filesystem `TreeAdapter`: walks a directory with `ignore`'s
//! `.gitignore`-aware builder (the same traversal primitive the teacher
//! reaches for), normalizing every entry to the path form the evaluator
//! assumes.

use crate::error::AdapterError;
use dirschema_core::adapter::{self, TreeAdapter};
use dirschema_core::path;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A snapshot of one directory tree, enumerated once at construction time so
/// repeated `enumerate()` calls (and cross-path determinism) don't depend on
/// the filesystem staying still mid-run (spec §5: "correctness must not
/// depend on caching").
pub struct FilesystemAdapter {
    root: PathBuf,
    paths: Vec<String>,
    files: HashSet<String>,
    dirs: HashSet<String>,
}

impl FilesystemAdapter {
    /// Walks `root`, respecting `.gitignore`/`.ignore` files the way `ignore`
    /// does for every other tool built on it. Hidden files are included:
    /// DirSchema documents routinely target dotfiles (`.github/`, `.env`)
    /// that a default-hidden walk would silently skip.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, adapter::AdapterError> {
        let root = root.into();
        let mut paths = Vec::new();
        let mut files = HashSet::new();
        let mut dirs = HashSet::new();

        let walker = ignore::WalkBuilder::new(&root).hidden(false).build();
        for entry in walker {
            let entry = entry.map_err(|source| AdapterError::Walk {
                root: root.display().to_string(),
                source,
            })?;
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            let normalized = normalize_relative(rel);
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir {
                dirs.insert(normalized.clone());
            } else {
                files.insert(normalized.clone());
            }
            paths.push(normalized);
        }

        Ok(Self {
            root,
            paths,
            files,
            dirs,
        })
    }
}

fn normalize_relative(rel: &Path) -> String {
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    path::normalize(&joined).unwrap_or(joined)
}

impl TreeAdapter for FilesystemAdapter {
    fn enumerate(&self) -> Result<Vec<String>, adapter::AdapterError> {
        Ok(self.paths.clone())
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.dirs.contains(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn load_json(&self, path: &str) -> Result<Value, adapter::AdapterError> {
        if !self.files.contains(path) {
            return Err(AdapterError::NotFound { path: path.to_string() }.into());
        }
        let full = self.root.join(path);
        let text = std::fs::read_to_string(&full).map_err(|source| AdapterError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&text)
            .map_err(|source| AdapterError::NotJson { path: path.to_string(), source }.into())
    }
}
