// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps a data path to its companion metadata path and back.

use crate::path;

/// Four optional strings that together define where a data path's metadata
/// companion lives. At least one of `file_prefix`/`file_suffix` must be
/// non-empty or every path would be its own companion.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaConvention {
    pub path_prefix: String,
    pub path_suffix: String,
    pub file_prefix: String,
    pub file_suffix: String,
}

impl Default for MetaConvention {
    fn default() -> Self {
        Self {
            path_prefix: String::new(),
            path_suffix: String::new(),
            file_prefix: String::new(),
            file_suffix: "_meta.json".to_string(),
        }
    }
}

impl MetaConvention {
    /// `Ok` iff at least one of `file_prefix`/`file_suffix` is non-empty.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.file_prefix.is_empty() && self.file_suffix.is_empty() {
            Err("MetaConvention requires a non-empty file_prefix or file_suffix")
        } else {
            Ok(())
        }
    }

    /// Computes the metadata companion path for `path`, which is a file if
    /// `is_dir` is false and a directory otherwise.
    pub fn companion(&self, data_path: &str, is_dir: bool) -> String {
        let (parent, last) = path::split_parent(data_path);
        let prefix_part = if self.path_prefix.is_empty() {
            parent.to_string()
        } else {
            path::join_parent_child(&self.path_prefix, parent)
        };

        let (stem, filename) = if is_dir {
            let stem = path::join_parent_child(&prefix_part, last);
            let filename = format!("{}{}", self.file_prefix, self.file_suffix);
            (stem, filename)
        } else {
            let filename = format!("{}{}{}", self.file_prefix, last, self.file_suffix);
            (prefix_part, filename)
        };

        let composed = if self.path_suffix.is_empty() {
            path::join_parent_child(&stem, &filename)
        } else {
            let mid = path::join_parent_child(&stem, &self.path_suffix);
            path::join_parent_child(&mid, &filename)
        };

        path::normalize(&composed).unwrap_or(composed)
    }

    /// True iff `path` is the companion of some `(p, is_dir)` pair under
    /// this convention. Implemented by structurally inverting `companion`
    /// and verifying the round trip, rather than enumerating the (infinite)
    /// space of data paths.
    pub fn is_companion(&self, path: &str) -> bool {
        for is_dir in [true, false] {
            if let Some(candidate) = self.invert(path, is_dir) {
                if self.companion(&candidate, is_dir) == path {
                    return true;
                }
            }
        }
        false
    }

    fn invert(&self, path: &str, is_dir: bool) -> Option<String> {
        let rest = if self.path_prefix.is_empty() {
            path
        } else {
            strip_prefix_path(path, &self.path_prefix)?
        };

        let (before_filename, filename) = path::split_parent(rest);
        let before_suffix = if self.path_suffix.is_empty() {
            before_filename
        } else {
            let (bp, seg) = path::split_parent(before_filename);
            if seg != self.path_suffix {
                return None;
            }
            bp
        };

        if is_dir {
            if filename != format!("{}{}", self.file_prefix, self.file_suffix) {
                return None;
            }
            Some(before_suffix.to_string())
        } else {
            if !filename.starts_with(&self.file_prefix) || !filename.ends_with(&self.file_suffix) {
                return None;
            }
            let inner = &filename[self.file_prefix.len()..filename.len() - self.file_suffix.len()];
            if inner.is_empty() {
                return None;
            }
            Some(path::join_parent_child(before_suffix, inner))
        }
    }
}

fn strip_prefix_path<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if path == prefix {
        Some("")
    } else {
        path.strip_prefix(prefix)?.strip_prefix('/')
    }
}
