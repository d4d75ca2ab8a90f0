// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recursive rule interpreter (spec §4.5): given one path and the rule
//! tree that applies to it, produces `None` on success or an `ErrorReport`
//! tree describing every unsatisfied constraint.

use crate::adapter::TreeAdapter;
use crate::error::ErrorReport;
use crate::meta::MetaConvention;
use crate::resolver::{self, ResolveContext, ResolvedSchema};
use crate::rule::{Rule, RuleNode, SchemaRef, TypePredicate};
use crate::state::MatchState;
use crate::validator::JsonValidator;

/// Evaluates rule trees against a single `TreeAdapter`/`JsonValidator` pair.
/// Stateless beyond its references: safe to reuse (and share across
/// threads, see [`crate::driver::Driver`]) for every path in a run.
pub struct Evaluator<'a> {
    adapter: &'a dyn TreeAdapter,
    validator: &'a dyn JsonValidator,
    meta: &'a MetaConvention,
    resolve_ctx: &'a ResolveContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        adapter: &'a dyn TreeAdapter,
        validator: &'a dyn JsonValidator,
        meta: &'a MetaConvention,
        resolve_ctx: &'a ResolveContext,
    ) -> Self {
        Self {
            adapter,
            validator,
            meta,
            resolve_ctx,
        }
    }

    /// Evaluates `rule` against `path`, starting a fresh [`MatchState`] over
    /// the path's own segments.
    pub fn evaluate(&self, path: &str, rule: &Rule) -> Option<ErrorReport> {
        tracing::debug!(path, "entering rule evaluation");
        let state = MatchState::root(path);
        let result = self.eval_rule(path, rule, &state);
        tracing::debug!(path, failed = result.is_some(), "finished rule evaluation");
        result
    }

    fn eval_rule(&self, path: &str, rule: &Rule, state: &MatchState) -> Option<ErrorReport> {
        match rule {
            Rule::Bool(true) => None,
            Rule::Bool(false) => Some(ErrorReport::leaf("rule is unconditionally `false`")),
            Rule::Node(node) => self.eval_node(path, node, state),
        }
    }

    fn eval_node(&self, path: &str, node: &RuleNode, state: &MatchState) -> Option<ErrorReport> {
        // A `match` that fails to fully match makes the whole rule
        // inapplicable to this path, not a failure (spec §4.5 step 3).
        let next_state = self.eval_match(node, state)?;

        let mut children: Vec<(String, ErrorReport)> = Vec::new();

        // Primitive stage: type, then valid, then validMeta.
        if let Some(tp) = node.type_ {
            if let Some(report) = self.eval_type(path, tp) {
                children.push(("type".to_string(), report));
            }
        }
        if let Some(schema_ref) = &node.valid {
            if let Some(report) = self.eval_schema(schema_ref, path) {
                children.push(("valid".to_string(), report));
            }
        }
        if let Some(schema_ref) = &node.valid_meta {
            if let Some(report) = self.eval_valid_meta(path, schema_ref) {
                children.push(("validMeta".to_string(), report));
            }
        }

        // A failed primitive aborts before the logical stage (spec §4.5
        // step 4: "if any primitive failed, abort before the logical
        // stage"), so the reported failure is always the primitive's alone,
        // never mixed with sibling `allOf`/`anyOf`/`oneOf` failures that
        // never actually ran.
        if !children.is_empty() {
            return Some(ErrorReport::present(
                "one or more constraints were not satisfied",
                children,
                node.description.as_deref(),
                node.details,
            ));
        }

        // Logical stage.
        if let Some(inner) = &node.not {
            if self.eval_rule(path, inner, &next_state).is_none() {
                children.push(("not".to_string(), ErrorReport::leaf("`not` sub-rule matched")));
            }
        }
        if let Some(rules) = &node.all_of {
            for (i, r) in rules.iter().enumerate() {
                if let Some(report) = self.eval_rule(path, r, &next_state) {
                    children.push((format!("allOf[{i}]"), report));
                    break;
                }
            }
        }
        if let Some(rules) = &node.any_of {
            let mut failures = Vec::new();
            let mut any_ok = false;
            for (i, r) in rules.iter().enumerate() {
                match self.eval_rule(path, r, &next_state) {
                    None => {
                        any_ok = true;
                        break;
                    }
                    Some(report) => failures.push((format!("anyOf[{i}]"), report)),
                }
            }
            if !any_ok {
                children.extend(failures);
            }
        }
        if let Some(rules) = &node.one_of {
            let mut successes = 0usize;
            let mut failures = Vec::new();
            for (i, r) in rules.iter().enumerate() {
                match self.eval_rule(path, r, &next_state) {
                    None => successes += 1,
                    Some(report) => failures.push((format!("oneOf[{i}]"), report)),
                }
            }
            if successes != 1 {
                children.extend(failures);
                if successes > 1 {
                    children.push((
                        "oneOf".to_string(),
                        ErrorReport::leaf(format!("expected exactly one oneOf branch to match, {successes} did")),
                    ));
                }
            }
        }
        if let Some(if_rule) = &node.if_ {
            let condition_holds = self.eval_rule(path, if_rule, &next_state).is_none();
            let (key, branch) = if condition_holds {
                ("then", node.then.as_ref())
            } else {
                ("else", node.else_.as_ref())
            };
            if let Some(branch_rule) = branch {
                if let Some(report) = self.eval_rule(path, branch_rule, &next_state) {
                    children.push((key.to_string(), report));
                }
            }
        }

        if !children.is_empty() {
            return Some(ErrorReport::present(
                "one or more constraints were not satisfied",
                children,
                node.description.as_deref(),
                node.details,
            ));
        }

        // Successor stage: only reached once every prior stage succeeded.
        if let Some((key, report)) = self.eval_successor(path, node, &next_state) {
            return Some(ErrorReport::present(
                "successor rule failed",
                vec![(key, report)],
                node.description.as_deref(),
                node.details,
            ));
        }

        None
    }

    /// Resolves the slice window and, if `match` is present, attempts a
    /// full match against it. Returns `None` when a present `match` fails to
    /// fully match: the rule is inapplicable to this path, not failing
    /// (spec §4.5 step 3: "the entire rule is considered inapplicable:
    /// return success").
    fn eval_match(&self, node: &RuleNode, state: &MatchState) -> Option<MatchState> {
        let (lo, hi) = state.resolve(node.match_start, node.match_stop);
        let Some(pattern) = &node.match_pattern else {
            return Some(state.with_window(lo, hi));
        };
        let text = state.segment_range_text(lo, hi);
        match pattern.full_match(&text) {
            Some(caps) => Some(state.with_match(lo, hi, caps)),
            None => {
                tracing::debug!(pattern = %pattern.source, %text, "match did not apply, rule is inapplicable here");
                None
            }
        }
    }

    fn eval_type(&self, path: &str, predicate: TypePredicate) -> Option<ErrorReport> {
        let ok = match predicate {
            TypePredicate::MustExist => self.adapter.exists(path),
            TypePredicate::MustNotExist => !self.adapter.exists(path),
            TypePredicate::File => self.adapter.is_file(path),
            TypePredicate::Dir => self.adapter.is_dir(path),
        };
        if ok {
            return None;
        }
        let message = match predicate {
            TypePredicate::MustExist => format!("`{path}` does not exist"),
            TypePredicate::MustNotExist => format!("`{path}` exists but must not"),
            TypePredicate::File => format!("`{path}` is not a file"),
            TypePredicate::Dir => format!("`{path}` is not a directory"),
        };
        Some(ErrorReport::leaf(message))
    }

    /// `validMeta: S` requires a three-link chain (spec §4.5 step 4): `path`
    /// itself exists, its companion is loadable as JSON, and that JSON
    /// validates against `S`. The existence check is on `path`, not the
    /// companion — a companion load failure is reported by `eval_schema`
    /// further down the chain, but a missing `path` must fail here first
    /// with its own message rather than surfacing as an opaque companion
    /// load error.
    fn eval_valid_meta(&self, path: &str, schema_ref: &SchemaRef) -> Option<ErrorReport> {
        if !self.adapter.exists(path) {
            return Some(ErrorReport::leaf(format!("`{path}` does not exist")));
        }
        let companion = self.meta.companion(path, self.adapter.is_dir(path));
        self.eval_schema(schema_ref, &companion)
    }

    fn eval_schema(&self, schema_ref: &SchemaRef, target_path: &str) -> Option<ErrorReport> {
        let resolved = match resolver::resolve(schema_ref, self.resolve_ctx, true) {
            Ok(r) => r,
            Err(e) => return Some(ErrorReport::leaf(format!("failed to resolve schema: {e}"))),
        };
        match &resolved {
            ResolvedSchema::Plugin { validator, argument } => {
                match self.validator.run_plugin(validator, argument, target_path, self.adapter) {
                    Ok(()) => None,
                    Err(e) => Some(ErrorReport::leaf(e.0)),
                }
            }
            _ => {
                let value = match self.adapter.load_json(target_path) {
                    Ok(v) => v,
                    Err(e) => {
                        return Some(ErrorReport::leaf(format!(
                            "failed to load `{target_path}` as JSON: {e}"
                        )));
                    }
                };
                match self.validator.validate(&resolved, &value) {
                    Ok(()) => None,
                    Err(e) => Some(ErrorReport::leaf(e.0)),
                }
            }
        }
    }

    fn eval_successor(
        &self,
        path: &str,
        node: &RuleNode,
        next_state: &MatchState,
    ) -> Option<(String, ErrorReport)> {
        let successor = node.successor()?;
        let target_path = match &node.rewrite {
            Some(template) => {
                let rewritten_slice = rewrite_path(template, &effective_captures(next_state));
                next_state.splice_rewrite(&rewritten_slice)
            }
            None => path.to_string(),
        };
        let successor_state = next_state.rebased(&target_path);
        self.eval_rule(&target_path, successor, &successor_state)
            .map(|report| (node.successor_key().to_string(), report))
    }
}

/// Captures visible to `rewrite`: the most recent `match`'s groups, or an
/// implicit whole-slice capture in groups 0 and 1 if no `match` has ever
/// fired along this chain (spec §9).
fn effective_captures(state: &MatchState) -> Vec<Option<String>> {
    if state.matched {
        state.captures.clone()
    } else {
        let text = state.slice_text();
        vec![Some(text.clone()), Some(text)]
    }
}

/// Substitutes `\N` backreferences in `template` with the corresponding
/// capture, leaving `\N` for an out-of-range or non-participating group as
/// an empty string, and any other backslash escape verbatim.
fn rewrite_path(template: &str, captures: &[Option<String>]) -> String {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(d) if d.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let idx: usize = digits.parse().unwrap_or(0);
                if let Some(Some(value)) = captures.get(idx) {
                    out.push_str(value);
                }
            }
            Some(&other) => {
                out.push(other);
                chars.next();
            }
            None => out.push('\\'),
        }
    }
    out
}
