// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scenarios exercising the evaluator (and, for the last one, the
//! full driver) against purpose-built rule documents, one per distinct
//! feature interaction rather than mechanical round-trips.

use dirschema_core::adapter::{AdapterError, TreeAdapter};
use dirschema_core::driver::Driver;
use dirschema_core::error::{ErrorReport, ValidationError};
use dirschema_core::meta::MetaConvention;
use dirschema_core::resolver::{ResolveContext, ResolvedSchema};
use dirschema_core::rule::Rule;
use dirschema_core::validator::JsonValidator;
use dirschema_core::Evaluator;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
struct InMemoryTree {
    files: BTreeMap<String, Option<Value>>,
    dirs: BTreeSet<String>,
}

impl InMemoryTree {
    fn new() -> Self {
        Self::default()
    }

    fn file(mut self, path: &str, json: Value) -> Self {
        self.files.insert(path.to_string(), Some(json));
        self
    }

    fn dir(mut self, path: &str) -> Self {
        self.dirs.insert(path.to_string());
        self
    }
}

impl TreeAdapter for InMemoryTree {
    fn enumerate(&self) -> Result<Vec<String>, AdapterError> {
        let mut paths: BTreeSet<String> = BTreeSet::new();
        paths.insert(String::new());
        paths.extend(self.files.keys().cloned());
        paths.extend(self.dirs.iter().cloned());
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

/// Interprets just enough of JSON Schema (`type` and `required`) to drive
/// these scenarios without pulling in a full schema backend.
struct MiniSchemaValidator;

impl JsonValidator for MiniSchemaValidator {
    fn validate(&self, schema: &ResolvedSchema, value: &Value) -> Result<(), ValidationError> {
        let ResolvedSchema::Inline(schema) = schema else {
            return Err(ValidationError::new("this fixture only resolves inline schemas"));
        };
        if let Some(expected) = schema.get("type").and_then(Value::as_str) {
            let matches = match expected {
                "object" => value.is_object(),
                "string" => value.is_string(),
                _ => true,
            };
            if !matches {
                return Err(ValidationError::new(format!("expected type `{expected}`")));
            }
        }
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for key in required {
                let key = key.as_str().unwrap_or_default();
                if value.get(key).is_none() {
                    return Err(ValidationError::new(format!("missing required field `{key}`")));
                }
            }
        }
        Ok(())
    }

    fn run_plugin(
        &self,
        name: &str,
        _argument: &str,
        _target_path: &str,
        _adapter: &dyn TreeAdapter,
    ) -> Result<(), ValidationError> {
        Err(ValidationError::new(format!("no plugin registered under `{name}`")))
    }
}

fn ctx() -> ResolveContext {
    ResolveContext::new("/schemas", "/work")
}

fn eval(tree: &InMemoryTree, rule: &Rule, path: &str) -> Option<ErrorReport> {
    let meta = MetaConvention::default();
    let validator = MiniSchemaValidator;
    let resolve_ctx = ctx();
    let evaluator = Evaluator::new(tree, &validator, &meta, &resolve_ctx);
    evaluator.evaluate(path, rule)
}

/// A `type`-gated file must also carry a companion metadata file with a
/// `license` field; the gate applies independently of whether the
/// companion actually satisfies its own schema.
#[test]
fn type_gate_checks_the_metadata_companion_schema() {
    let rule = Rule::parse(&json!({
        "match": "img/.+\\.jpg",
        "type": "file",
        "validMeta": {"required": ["license"]}
    }))
    .unwrap();

    let complete = InMemoryTree::new()
        .file("img/a.jpg", json!({}))
        .file("img/a.jpg_meta.json", json!({"license": "CC0"}));
    assert!(eval(&complete, &rule, "img/a.jpg").is_none());

    let incomplete = InMemoryTree::new()
        .file("img/a.jpg", json!({}))
        .file("img/a.jpg_meta.json", json!({}));
    let report = eval(&incomplete, &rule, "img/a.jpg").unwrap();
    assert!(report.chains().iter().any(|c| c.contains("license")));
}

/// A rule whose top-level `match` does not apply never reaches `next`, even
/// when `next` would fail for every path it could see.
#[test]
fn non_matching_top_level_rule_short_circuits_before_next() {
    let tree = InMemoryTree::new().file("doc/readme.txt", json!({}));
    let rule = Rule::parse(&json!({
        "match": "img/.+",
        "next": {"type": "dir"}
    }))
    .unwrap();
    assert!(eval(&tree, &rule, "doc/readme.txt").is_none());
}

/// `rewrite` redirects the successor to validate a different path than the
/// one the rule originally matched.
#[test]
fn rewrite_redirects_the_successor_to_a_thumbnail_path() {
    let tree = InMemoryTree::new()
        .file("img/a.jpg", json!({}))
        .file("thumb/a.jpg", json!({}));
    let rule = Rule::parse(&json!({
        "match": "img/(.+)",
        "rewrite": "thumb/\\1",
        "next": {"type": "file"}
    }))
    .unwrap();
    assert!(eval(&tree, &rule, "img/a.jpg").is_none());

    let missing_thumb = InMemoryTree::new().file("img/a.jpg", json!({}));
    let report = eval(&missing_thumb, &rule, "img/a.jpg").unwrap();
    assert!(report.chains().iter().any(|c| c.contains("next")));
}

/// `oneOf` demands exactly one branch, not "at least one": two branches
/// that both succeed is as much a failure as none succeeding. A bare
/// `match` is not itself an assertion (a non-matching `match` is vacuously
/// inapplicable, per the scenario above), so the branches here carry real
/// `type`/`valid` predicates rather than pattern gates.
#[test]
fn one_of_demands_exactly_one_matching_branch() {
    let tree = InMemoryTree::new().file("a.json", json!({}));

    let exactly_one = Rule::parse(&json!({
        "oneOf": [
            {"type": "dir"},
            {"type": "file"}
        ]
    }))
    .unwrap();
    assert!(eval(&tree, &exactly_one, "a.json").is_none());

    let both_succeed = Rule::parse(&json!({
        "oneOf": [
            {"type": "file"},
            {"valid": {"type": "object"}}
        ]
    }))
    .unwrap();
    let report = eval(&tree, &both_succeed, "a.json").unwrap();
    assert!(report.chains().iter().any(|c| c.contains("oneOf")));
}

/// `matchStart`/`matchStop` narrow the slice a nested `match` is attempted
/// against; whether the rule applies at all (and so whether `next` ever
/// runs) depends on that narrowed window, not the path's full length.
#[test]
fn match_start_and_stop_narrow_the_window_before_matching() {
    let tree = InMemoryTree::new().file("project/src/main.rs", json!({}));

    let narrowed = Rule::parse(&json!({
        "matchStart": 1,
        "matchStop": -1,
        "match": "src",
        "next": false
    }))
    .unwrap();
    let report = eval(&tree, &narrowed, "project/src/main.rs").unwrap();
    assert!(report.chains().iter().any(|c| c.contains("next")));

    let whole_path = Rule::parse(&json!({
        "match": "src",
        "next": false
    }))
    .unwrap();
    assert!(eval(&tree, &whole_path, "project/src/main.rs").is_none());
}

/// `if`/`then`/`else` branches on a condition whose own failure is never
/// itself reported, only the chosen branch's.
#[test]
fn if_then_else_branches_on_file_type() {
    let tree = InMemoryTree::new().file("a.txt", json!("hello")).dir("b");
    let rule = Rule::parse(&json!({
        "if": {"type": "file"},
        "then": {"valid": {"type": "string"}},
        "else": {"type": "dir"}
    }))
    .unwrap();
    assert!(eval(&tree, &rule, "a.txt").is_none());
    assert!(eval(&tree, &rule, "b").is_none());

    let wrong_content = InMemoryTree::new().file("a.txt", json!(42));
    let report = eval(&wrong_content, &rule, "a.txt").unwrap();
    assert!(report.chains().iter().any(|c| c.contains("then")));
}

/// A full driver run over a tree: `description` collapses a failing
/// composite node to a single message, and metadata companions never show
/// up as failures of their own.
#[test]
fn driver_run_collapses_descriptions_and_skips_companions() {
    let tree = InMemoryTree::new()
        .file("img/a.jpg", json!({}))
        .file("img/a.jpg_meta.json", json!({}));
    let meta = MetaConvention::default();
    let validator = MiniSchemaValidator;
    let resolve_ctx = ctx();
    let rule = Rule::parse(&json!({
        "match": "img/.+\\.jpg",
        "validMeta": {"required": ["license"]},
        "description": "every image needs a license in its metadata companion"
    }))
    .unwrap();
    let driver = Driver::new(&tree, &validator, &meta, &resolve_ctx);
    let report = driver.run(&rule).unwrap();

    assert!(!report.failures.contains_key("img/a.jpg_meta.json"));
    let failure = &report.failures["img/a.jpg"];
    assert_eq!(failure.message, "every image needs a license in its metadata companion");
    assert!(failure.children.is_empty());
}
