// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types and the per-path [`ErrorReport`] tree the evaluator produces.

use thiserror::Error;

/// Errors raised while turning a parsed JSON/YAML document into a
/// [`crate::rule::Rule`] tree, or while resolving a schema reference. These
/// are "rule-document invalid" errors in the taxonomy of the evaluator: they
/// abort the whole run before any path is evaluated.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("rule node has both `next` and `then` outside an `if`/`then`/`else` context")]
    AmbiguousSuccessor,

    #[error("rule node has both `if` and a bare `then` used as the legacy successor form")]
    LegacySuccessorWithIf,

    #[error("unknown rule key `{0}`")]
    UnknownKey(String),

    #[error("`{field}` value {value} does not fit in a signed 32-bit integer")]
    IntegerOutOfRange { field: &'static str, value: i64 },

    #[error("invalid regex in `match`: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("`type` must be `true`, `false`, \"file\", or \"dir\", found {0}")]
    InvalidTypeValue(String),

    #[error("`valid`/`validMeta` schema reference must be an object or a string, found {0}")]
    InvalidSchemaRef(String),

    #[error("`v#NAME://ARG` plugin pseudo-URI is not legal here: {0}")]
    PluginUriNotAllowed(String),

    #[error("metadata convention requires a non-empty file_prefix or file_suffix")]
    InvalidMetaConvention,

    #[error("document parse error: {0}")]
    Document(String),
}

/// A schema validation or plugin invocation failure, surfaced by the
/// `JsonValidator` boundary (implemented outside this crate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A tree mirroring the rule tree, recording the failing key and message for
/// every unsatisfied sub-rule. Success is represented by the absence of a
/// report (`evaluate` returns `Option<ErrorReport>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// The message shown for this node: either a system-generated default
    /// or the rule's `description` override.
    pub message: String,
    /// Nested failures, keyed by the rule key they came from (`"type"`,
    /// `"valid"`, `"allOf[2]"`, `"next"`, ...). Empty when `description` was
    /// set or `details` is `false` on the owning rule, or when this report
    /// is itself a leaf.
    pub children: Vec<(String, ErrorReport)>,
}

impl ErrorReport {
    pub fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            children: Vec::new(),
        }
    }

    pub fn node(message: impl Into<String>, children: Vec<(String, ErrorReport)>) -> Self {
        Self {
            message: message.into(),
            children,
        }
    }

    /// Applies `description`/`details` node-level presentation rules: a
    /// `description` collapses the node to a single message with no
    /// children; `details: false` keeps the default message but still drops
    /// children.
    pub fn present(
        default_message: impl Into<String>,
        children: Vec<(String, ErrorReport)>,
        description: Option<&str>,
        details: bool,
    ) -> Self {
        if let Some(desc) = description {
            Self::leaf(desc.to_string())
        } else if !details {
            Self::leaf(default_message)
        } else {
            Self::node(default_message, children)
        }
    }

    /// Renders the failure chain as `key -> key -> message` lines, the
    /// minimal format the CLI collaborator (spec §6) requires: "the chain of
    /// failed rule keys" per path.
    pub fn chains(&self) -> Vec<String> {
        if self.children.is_empty() {
            return vec![self.message.clone()];
        }
        let mut out = Vec::new();
        for (key, child) in &self.children {
            for chain in child.chains() {
                out.push(format!("{key} -> {chain}"));
            }
        }
        out
    }
}
