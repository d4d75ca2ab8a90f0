// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives a full run: enumerates a tree, filters out metadata companions,
//! evaluates the rule tree against every remaining path, and collects the
//! failures into a single report (spec §5).

use crate::adapter::{AdapterError, TreeAdapter};
use crate::eval::Evaluator;
use crate::meta::MetaConvention;
use crate::resolver::ResolveContext;
use crate::rule::Rule;
use crate::error::ErrorReport;
use crate::validator::JsonValidator;
use std::collections::BTreeMap;

/// The outcome of a full run: every path that failed at least one
/// constraint, keyed by its normalized path and ordered lexicographically
/// so output is deterministic regardless of adapter enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub failures: BTreeMap<String, ErrorReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of `key -> key -> message` lines across every failing
    /// path, the unit the CLI's `-v` counts against.
    pub fn total_chains(&self) -> usize {
        self.failures.values().map(|r| r.chains().len()).sum()
    }
}

/// Runs one rule tree against one tree snapshot.
pub struct Driver<'a> {
    adapter: &'a dyn TreeAdapter,
    validator: &'a dyn JsonValidator,
    meta: &'a MetaConvention,
    resolve_ctx: &'a ResolveContext,
}

impl<'a> Driver<'a> {
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

    /// Evaluates `rule` against every enumerated path that is not itself a
    /// metadata companion (spec §5: companions are consumed through
    /// `validMeta`, never evaluated as targets in their own right).
    pub fn run(&self, rule: &Rule) -> Result<RunReport, AdapterError> {
        let evaluator = Evaluator::new(self.adapter, self.validator, self.meta, self.resolve_ctx);
        let mut failures = BTreeMap::new();
        for path in self.adapter.enumerate()? {
            if self.meta.is_companion(&path) {
                continue;
            }
            if let Some(report) = evaluator.evaluate(&path, rule) {
                failures.insert(path, report);
            }
        }
        Ok(RunReport { failures })
    }
}
