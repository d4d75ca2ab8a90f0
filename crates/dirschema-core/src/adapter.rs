// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`TreeAdapter`] boundary: the only mandatory external contract of
//! the engine (spec §6). Concrete adapters (filesystem, ZIP, HDF5) live in
//! the `dirschema-adapters` crate and implement this trait; the evaluator
//! never inspects which concrete kind it was handed.

use serde_json::Value;

/// A boxed, type-erased adapter error so `TreeAdapter` stays object-safe:
/// the evaluator holds adapters behind `&dyn TreeAdapter`, and plugins (see
/// `dirschema-schema`) are handed the same trait object.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Enumerates normalized paths in a target tree and answers structural and
/// content questions about them. Implementations are expected to be
/// deterministic and reentrant for a single immutable snapshot of the
/// target; the evaluator may call any method multiple times for the same
/// path (e.g. once for `valid`, once for `validMeta`'s companion).
pub trait TreeAdapter: Send + Sync {
    /// Finite, ordered sequence of every normalized path in the tree,
    /// including the root (`""`). Enumeration order is adapter-defined and
    /// not semantically significant, but must be stable across calls on the
    /// same snapshot for the engine's output to be deterministic.
    fn enumerate(&self) -> Result<Vec<String>, AdapterError>;

    fn is_file(&self, path: &str) -> bool;
    fn is_dir(&self, path: &str) -> bool;
    fn exists(&self, path: &str) -> bool;

    /// Loads `path` and parses it as JSON. Fails if the path does not
    /// exist, cannot be read, or does not parse as JSON (YAML is never
    /// accepted here, per spec §6).
    fn load_json(&self, path: &str) -> Result<Value, AdapterError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! A minimal in-memory `TreeAdapter` used by this crate's own tests, so
    //! the evaluator's test suite doesn't depend on `dirschema-adapters`.
    use super::{AdapterError, TreeAdapter, Value};
    use std::collections::{BTreeMap, BTreeSet};

    #[derive(Default)]
    pub struct FakeAdapter {
        pub files: BTreeMap<String, Option<Value>>,
        pub dirs: BTreeSet<String>,
    }

    impl FakeAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(mut self, path: &str, json: Option<Value>) -> Self {
            self.files.insert(path.to_string(), json);
            self
        }

        pub fn with_dir(mut self, path: &str) -> Self {
            self.dirs.insert(path.to_string());
            self
        }
    }

    impl TreeAdapter for FakeAdapter {
        fn enumerate(&self) -> Result<Vec<String>, AdapterError> {
            let mut paths: BTreeSet<String> = BTreeSet::new();
            paths.insert(String::new());
            for f in self.files.keys() {
                paths.insert(f.clone());
            }
            for d in &self.dirs {
                paths.insert(d.clone());
            }
            Ok(paths.into_iter().collect())
        }

        fn is_file(&self, path: &str) -> bool {
            self.files.contains_key(path)
        }

        fn is_dir(&self, path: &str) -> bool {
            self.dirs.contains(path)
        }

        fn exists(&self, path: &str) -> bool {
            path.is_empty() || self.is_file(path) || self.is_dir(path)
        }

        fn load_json(&self, path: &str) -> Result<Value, AdapterError> {
            match self.files.get(path) {
                Some(Some(v)) => Ok(v.clone()),
                Some(None) => Err(format!("{path}: not valid JSON").into()),
                None => Err(format!("{path}: does not exist").into()),
            }
        }
    }
}
