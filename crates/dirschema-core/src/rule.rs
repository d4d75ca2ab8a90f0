// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-memory typed representation of a parsed rule tree (spec §3, §4.4).
//!
//! A [`Rule`] is either the trivial boolean `true`/`false`, or a conjunction
//! node carrying at most one of each recognized key. The tree is built from
//! a generic `serde_json::Value` (the document loader is responsible for
//! turning YAML into that `Value` first) so this crate never has to know
//! anything about YAML.

use crate::error::EvalError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// A rule: the trivial booleans, or a conjunction node.
#[derive(Debug, Clone)]
pub enum Rule {
    Bool(bool),
    Node(Box<RuleNode>),
}

impl Rule {
    pub fn parse(value: &Value) -> Result<Self, EvalError> {
        let raw: RawRule = serde_json::from_value(value.clone())
            .map_err(|e| EvalError::Document(e.to_string()))?;
        Rule::try_from(raw)
    }
}

/// `type` predicate values: `true`/`false` test existence, `"file"`/`"dir"`
/// test the node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePredicate {
    MustExist,
    MustNotExist,
    File,
    Dir,
}

/// A `valid`/`validMeta` value: either an inline JSON Schema document or a
/// URI string the [`crate::resolver`] knows how to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    Inline(Value),
    Uri(String),
}

/// A compiled `match` pattern. The source pattern is wrapped so that a
/// match must consume the whole slice (spec §4.5 step 3: "attempt to fully
/// match the slice"); group 0 is therefore always the whole slice and the
/// user's own capture groups start at 1, exactly as the uncompiled pattern
/// would number them.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    pub source: String,
    regex: Regex,
}

impl MatchPattern {
    pub fn compile(source: &str) -> Result<Self, EvalError> {
        let anchored = format!("\\A(?:{source})\\z");
        let regex = Regex::new(&anchored)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Attempts a full match against `text`, returning the ordered capture
    /// list (group 0 = whole match) on success.
    pub fn full_match(&self, text: &str) -> Option<Vec<Option<String>>> {
        let caps = self.regex.captures(text)?;
        Some(
            (0..caps.len())
                .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }
}

/// A conjunction node: at most one of each recognized key, per spec §3.
#[derive(Debug, Clone, Default)]
pub struct RuleNode {
    pub match_pattern: Option<MatchPattern>,
    pub match_start: Option<i32>,
    pub match_stop: Option<i32>,
    pub rewrite: Option<String>,

    pub type_: Option<TypePredicate>,
    pub valid: Option<SchemaRef>,
    pub valid_meta: Option<SchemaRef>,

    pub not: Option<Rule>,
    pub all_of: Option<Vec<Rule>>,
    pub any_of: Option<Vec<Rule>>,
    pub one_of: Option<Vec<Rule>>,

    pub if_: Option<Rule>,
    pub then: Option<Rule>,
    pub else_: Option<Rule>,
    pub next: Option<Rule>,

    pub description: Option<String>,
    pub details: bool,
}

impl RuleNode {
    /// The rule evaluated after all same-level constraints succeed: `next`
    /// when present, otherwise the legacy `then` form when `if` is absent
    /// (spec §9: two eras of the DSL).
    pub fn successor(&self) -> Option<&Rule> {
        if self.next.is_some() {
            self.next.as_ref()
        } else if self.if_.is_none() {
            self.then.as_ref()
        } else {
            None
        }
    }

    /// The key under which a successor failure should be reported: the
    /// modern `next`, or the legacy `then` when that's the form in use.
    pub fn successor_key(&self) -> &'static str {
        if self.next.is_some() || self.if_.is_some() {
            "next"
        } else {
            "then"
        }
    }

    /// True iff `rewrite` is set but there is no successor to apply it to
    /// (spec §3: "semantically inert and should produce a lint warning but
    /// not an error").
    pub fn rewrite_is_inert(&self) -> bool {
        self.rewrite.is_some() && self.successor().is_none()
    }
}

// --- Deserialization ------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRule {
    Bool(bool),
    Node(Box<RawNode>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawType {
    Bool(bool),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchemaRef {
    Uri(String),
    Inline(Value),
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase", default)]
struct RawNode {
    #[serde(rename = "match")]
    match_: Option<String>,
    match_start: Option<i64>,
    match_stop: Option<i64>,
    rewrite: Option<String>,

    #[serde(rename = "type")]
    type_: Option<RawType>,
    valid: Option<RawSchemaRef>,
    valid_meta: Option<RawSchemaRef>,

    not: Option<Box<RawRule>>,
    all_of: Option<Vec<RawRule>>,
    any_of: Option<Vec<RawRule>>,
    one_of: Option<Vec<RawRule>>,

    #[serde(rename = "if")]
    if_: Option<Box<RawRule>>,
    then: Option<Box<RawRule>>,
    #[serde(rename = "else")]
    else_: Option<Box<RawRule>>,
    next: Option<Box<RawRule>>,

    description: Option<String>,
    details: Option<bool>,
}

fn to_i32(field: &'static str, value: i64) -> Result<i32, EvalError> {
    i32::try_from(value).map_err(|_| EvalError::IntegerOutOfRange { field, value })
}

impl TryFrom<RawRule> for Rule {
    type Error = EvalError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        match raw {
            RawRule::Bool(b) => Ok(Rule::Bool(b)),
            RawRule::Node(node) => Ok(Rule::Node(Box::new(RuleNode::try_from(*node)?))),
        }
    }
}

impl TryFrom<RawNode> for RuleNode {
    type Error = EvalError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let match_pattern = raw.match_.as_deref().map(MatchPattern::compile).transpose()?;
        let match_start = raw.match_start.map(|v| to_i32("matchStart", v)).transpose()?;
        let match_stop = raw.match_stop.map(|v| to_i32("matchStop", v)).transpose()?;

        let type_ = raw
            .type_
            .map(|t| match t {
                RawType::Bool(true) => Ok(TypePredicate::MustExist),
                RawType::Bool(false) => Ok(TypePredicate::MustNotExist),
                RawType::Str(s) if s == "file" => Ok(TypePredicate::File),
                RawType::Str(s) if s == "dir" => Ok(TypePredicate::Dir),
                RawType::Str(s) => Err(EvalError::InvalidTypeValue(s)),
            })
            .transpose()?;

        let valid = raw.valid.map(to_schema_ref).transpose()?;
        let valid_meta = raw.valid_meta.map(to_schema_ref).transpose()?;

        let not = raw.not.map(|r| Rule::try_from(*r)).transpose()?;
        let all_of = raw
            .all_of
            .map(|v| v.into_iter().map(Rule::try_from).collect())
            .transpose()?;
        let any_of = raw
            .any_of
            .map(|v| v.into_iter().map(Rule::try_from).collect())
            .transpose()?;
        let one_of = raw
            .one_of
            .map(|v| v.into_iter().map(Rule::try_from).collect())
            .transpose()?;

        let if_ = raw.if_.map(|r| Rule::try_from(*r)).transpose()?;
        let then = raw.then.map(|r| Rule::try_from(*r)).transpose()?;
        let else_ = raw.else_.map(|r| Rule::try_from(*r)).transpose()?;
        let next = raw.next.map(|r| Rule::try_from(*r)).transpose()?;

        if if_.is_none() && then.is_some() && next.is_some() {
            return Err(EvalError::AmbiguousSuccessor);
        }
        if if_.is_none() && else_.is_some() {
            return Err(EvalError::LegacySuccessorWithIf);
        }
        if if_.is_none() && then.is_some() && next.is_none() {
            tracing::warn!(
                "rule node uses the legacy `then`-as-successor form; prefer `next` (the two DSL eras are both accepted, but `then` without `if` is ambiguous to a reader)"
            );
        }

        let node = RuleNode {
            match_pattern,
            match_start,
            match_stop,
            rewrite: raw.rewrite,
            type_,
            valid,
            valid_meta,
            not,
            all_of,
            any_of,
            one_of,
            if_,
            then,
            else_,
            next,
            description: raw.description,
            details: raw.details.unwrap_or(true),
        };

        if node.rewrite_is_inert() {
            tracing::warn!("rule node has `rewrite` but no `next`/`then` successor; the rewrite has no effect");
        }

        Ok(node)
    }
}

fn to_schema_ref(raw: RawSchemaRef) -> Result<SchemaRef, EvalError> {
    match raw {
        RawSchemaRef::Uri(s) => Ok(SchemaRef::Uri(s)),
        RawSchemaRef::Inline(v) => Ok(SchemaRef::Inline(v)),
    }
}
