// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads a YAML/JSON rule document, resolves `$ref`s against the
//! [`dirschema_core::resolver`] URI grammar, and splits the optional
//! `rule`/`metaConvention` wrapper before handing the bare rule body to
//! [`dirschema_core::rule::Rule::parse`] (spec §4.4, §6: "assumed to deliver
//! a fully materialized, reference-resolved rule document").

use crate::error::LoadError;
use dirschema_core::meta::MetaConvention;
use dirschema_core::resolver::{self, ResolveContext, ResolvedSchema};
use dirschema_core::rule::{Rule, SchemaRef};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A fully loaded document: the rule tree plus the metadata convention that
/// applies to it (default if the document didn't specify one).
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub rule: Rule,
    pub meta: MetaConvention,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

/// Loads and fully resolves the rule document at `path`.
pub fn load_rule_document(path: &Path, ctx: &ResolveContext) -> Result<LoadedDocument, LoadError> {
    tracing::debug!(path = %path.display(), "loading rule document");
    let raw = parse_document_file(path)?;
    let mut visiting = HashSet::new();
    let materialized = materialize(&raw, &raw, ctx, &mut visiting)?;
    split_wrapper(materialized)
}

/// Loads a rule document already in memory (e.g. read from stdin), in the
/// given format.
pub fn load_rule_str(text: &str, format: DocumentFormat, ctx: &ResolveContext) -> Result<LoadedDocument, LoadError> {
    let raw = parse_text(text, format, "<stdin>")?;
    let mut visiting = HashSet::new();
    let materialized = materialize(&raw, &raw, ctx, &mut visiting)?;
    split_wrapper(materialized)
}

/// Looks for `dirschema.yaml`, `dirschema.yml`, or `dirschema.json` in
/// `cwd`, in that order, for the CLI's no-positional-argument convenience
/// (spec's Non-goals exclude schema *authoring* tooling, not discovering an
/// existing document).
pub fn discover_default_schema(cwd: &Path) -> Option<PathBuf> {
    for name in ["dirschema.yaml", "dirschema.yml", "dirschema.json"] {
        let candidate = cwd.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn split_wrapper(value: Value) -> Result<LoadedDocument, LoadError> {
    match &value {
        Value::Object(map) if map.contains_key("rule") => {
            let rule_value = map.get("rule").cloned().unwrap_or(Value::Bool(true));
            let meta = match map.get("metaConvention") {
                Some(v) => serde_json::from_value(v.clone()).map_err(|e| LoadError::Parse {
                    path: "<document>".to_string(),
                    format: "metaConvention",
                    message: e.to_string(),
                })?,
                None => MetaConvention::default(),
            };
            meta.validate()
                .map_err(|e| LoadError::InvalidMetaConvention(e.to_string()))?;
            let rule = Rule::parse(&rule_value)?;
            Ok(LoadedDocument { rule, meta })
        }
        _ => {
            let rule = Rule::parse(&value)?;
            Ok(LoadedDocument {
                rule,
                meta: MetaConvention::default(),
            })
        }
    }
}

/// Recursively resolves every `$ref` in `value`. `root` is the document
/// `value` was drawn from, used to satisfy `#/json/pointer` references;
/// external file references establish a new root for their own nested
/// `$ref`s. `visiting` detects cycles across the whole recursion, internal
/// and external references alike.
fn materialize(value: &Value, root: &Value, ctx: &ResolveContext, visiting: &mut HashSet<String>) -> Result<Value, LoadError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(r)) = map.get("$ref") {
                materialize_ref(r, root, ctx, visiting)
            } else {
                let mut out = serde_json::Map::new();
                for (k, v) in map {
                    out.insert(k.clone(), materialize(v, root, ctx, visiting)?);
                }
                Ok(Value::Object(out))
            }
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(materialize(item, root, ctx, visiting)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

fn materialize_ref(raw: &str, root: &Value, ctx: &ResolveContext, visiting: &mut HashSet<String>) -> Result<Value, LoadError> {
    if !visiting.insert(raw.to_string()) {
        return Err(LoadError::RefCycle(raw.to_string()));
    }

    let result = if let Some(pointer) = raw.strip_prefix('#') {
        let target = root
            .pointer(pointer)
            .ok_or_else(|| LoadError::RefNotFound(raw.to_string()))?;
        materialize(target, root, ctx, visiting)?
    } else {
        let resolved = resolver::resolve(&SchemaRef::Uri(raw.to_string()), ctx, false)?;
        let path = match resolved {
            ResolvedSchema::LocalFile(p) => p,
            ResolvedSchema::Remote(uri) => return Err(LoadError::RemoteRefUnsupported(uri)),
            ResolvedSchema::Plugin { .. } | ResolvedSchema::Inline(_) => {
                unreachable!("a $ref string never resolves to Inline/Plugin")
            }
        };
        let external_root = parse_document_file(&path)?;
        materialize(&external_root, &external_root, ctx, visiting)?
    };

    visiting.remove(raw);
    Ok(result)
}

fn parse_document_file(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_text(&text, infer_format(path), &path.display().to_string())
}

fn infer_format(path: &Path) -> DocumentFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => DocumentFormat::Json,
        // YAML 1.1 accepts JSON as a subset, so default to the more
        // permissive parser for anything else (`.yaml`/`.yml`/extensionless).
        _ => DocumentFormat::Yaml,
    }
}

fn parse_text(text: &str, format: DocumentFormat, location: &str) -> Result<Value, LoadError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| LoadError::Parse {
            path: location.to_string(),
            format: "JSON",
            message: e.to_string(),
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| LoadError::Parse {
            path: location.to_string(),
            format: "YAML",
            message: e.to_string(),
        }),
    }
}
