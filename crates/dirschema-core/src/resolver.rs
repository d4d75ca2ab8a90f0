// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolves a `valid`/`validMeta` schema reference to either an inline JSON
//! Schema document, a location the `JsonValidator` must fetch, or a plugin
//! invocation (spec §4.3).

use crate::error::EvalError;
use crate::rule::SchemaRef;
use std::path::{Path, PathBuf};

/// Where to find the bodies of `local://` and bare relative references, and
/// what `cwd://` means. Immutable for the duration of a run.
#[derive(Clone, Debug)]
pub struct ResolveContext {
    /// Base directory for `local://R` references. Defaults to the
    /// directory containing the dirschema document.
    pub local_base: PathBuf,
    /// Base directory for `cwd://R` references and bare relative paths.
    pub cwd: PathBuf,
}

impl ResolveContext {
    pub fn new(local_base: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            local_base: local_base.into(),
            cwd: cwd.into(),
        }
    }
}

/// The result of resolving a `SchemaRef`: a location the `JsonValidator`
/// knows how to turn into a schema document or plugin call. Fetching
/// `Remote` URIs and reading `LocalFile` paths is the validator's concern,
/// not the resolver's (spec §4.3).
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedSchema {
    /// An inline JSON Schema object given directly in the rule document.
    Inline(serde_json::Value),
    /// An absolute local filesystem path to a JSON Schema document.
    LocalFile(PathBuf),
    /// An `http://`/`https://` URI, fetched verbatim by the validator.
    Remote(String),
    /// A `v#NAME://ARG` plugin pseudo-URI.
    Plugin { validator: String, argument: String },
}

/// Resolves a raw schema reference from the rule document into a
/// [`ResolvedSchema`]. `allow_plugin` is `false` when resolving `$ref`s in
/// the document loader, where plugin pseudo-URIs are illegal (spec §4.3:
/// "Legal only as a value of `valid`/`validMeta`, never as `$ref` or schema
/// body").
pub fn resolve(
    schema_ref: &SchemaRef,
    ctx: &ResolveContext,
    allow_plugin: bool,
) -> Result<ResolvedSchema, EvalError> {
    match schema_ref {
        SchemaRef::Inline(value) => Ok(ResolvedSchema::Inline(value.clone())),
        SchemaRef::Uri(uri) => resolve_uri(uri, ctx, allow_plugin),
    }
}

fn resolve_uri(uri: &str, ctx: &ResolveContext, allow_plugin: bool) -> Result<ResolvedSchema, EvalError> {
    if let Some(rest) = uri.strip_prefix("http://") {
        return Ok(ResolvedSchema::Remote(format!("http://{rest}")));
    }
    if let Some(rest) = uri.strip_prefix("https://") {
        return Ok(ResolvedSchema::Remote(format!("https://{rest}")));
    }
    if let Some(rest) = uri.strip_prefix("file://") {
        return Ok(ResolvedSchema::LocalFile(PathBuf::from(rest)));
    }
    if let Some(rest) = uri.strip_prefix("local://") {
        return Ok(ResolvedSchema::LocalFile(join_and_normalize(&ctx.local_base, rest)));
    }
    if let Some(rest) = uri.strip_prefix("cwd://") {
        return Ok(ResolvedSchema::LocalFile(join_and_normalize(&ctx.cwd, rest)));
    }
    if let Some(rest) = uri.strip_prefix("v#") {
        if !allow_plugin {
            return Err(EvalError::PluginUriNotAllowed(uri.to_string()));
        }
        let (name, argument) = rest
            .split_once("://")
            .ok_or_else(|| EvalError::InvalidSchemaRef(uri.to_string()))?;
        return Ok(ResolvedSchema::Plugin {
            validator: name.to_string(),
            argument: argument.to_string(),
        });
    }
    if Path::new(uri).is_absolute() {
        return Ok(ResolvedSchema::LocalFile(PathBuf::from(uri)));
    }
    // bare relative path: treated as `cwd://R` unless a relative-base
    // override is configured (the CLI's `--cwd` flag is exactly that
    // override, already folded into `ctx.cwd`).
    Ok(ResolvedSchema::LocalFile(join_and_normalize(&ctx.cwd, uri)))
}

fn join_and_normalize(base: &Path, rest: &str) -> PathBuf {
    base.join(rest)
}

#[cfg(test)]
mod test {
    use super::*;

    fn ctx() -> ResolveContext {
        ResolveContext::new("/schemas", "/work")
    }

    #[test]
    fn resolves_local_scheme() {
        let r = resolve_uri("local://foo.json", &ctx(), true).unwrap();
        assert_eq!(r, ResolvedSchema::LocalFile(PathBuf::from("/schemas/foo.json")));
    }

    #[test]
    fn resolves_cwd_scheme() {
        let r = resolve_uri("cwd://foo.json", &ctx(), true).unwrap();
        assert_eq!(r, ResolvedSchema::LocalFile(PathBuf::from("/work/foo.json")));
    }

    #[test]
    fn bare_relative_is_cwd() {
        let r = resolve_uri("foo.json", &ctx(), true).unwrap();
        assert_eq!(r, ResolvedSchema::LocalFile(PathBuf::from("/work/foo.json")));
    }

    #[test]
    fn resolves_plugin_pseudo_uri() {
        let r = resolve_uri("v#enum://colors", &ctx(), true).unwrap();
        assert_eq!(
            r,
            ResolvedSchema::Plugin {
                validator: "enum".to_string(),
                argument: "colors".to_string()
            }
        );
    }

    #[test]
    fn plugin_uri_rejected_when_disallowed() {
        let err = resolve_uri("v#enum://colors", &ctx(), false).unwrap_err();
        assert!(matches!(err, EvalError::PluginUriNotAllowed(_)));
    }

    #[test]
    fn resolves_http_verbatim() {
        let r = resolve_uri("https://example.com/s.json", &ctx(), true).unwrap();
        assert_eq!(r, ResolvedSchema::Remote("https://example.com/s.json".to_string()));
    }

    #[test]
    fn resolves_absolute_path() {
        let r = resolve_uri("/abs/s.json", &ctx(), true).unwrap();
        assert_eq!(r, ResolvedSchema::LocalFile(PathBuf::from("/abs/s.json")));
    }
}
