// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders a [`dirschema_core::driver::RunReport`] in the two formats the
//! CLI supports (spec §6).

use crate::cli::OutputFormat;
use dirschema_core::driver::RunReport;
use serde_json::json;

pub fn render(report: &RunReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

fn render_text(report: &RunReport) -> String {
    // A clean report prints nothing (spec §7: "a successful run emits
    // nothing"); the exit code alone carries the result.
    if report.is_success() {
        return String::new();
    }
    let mut out = String::new();
    for (path, error) in &report.failures {
        let display = if path.is_empty() { "." } else { path.as_str() };
        for chain in error.chains() {
            out.push_str(&format!("{display}: {chain}\n"));
        }
    }
    out
}

fn render_json(report: &RunReport) -> String {
    let failures: serde_json::Map<String, serde_json::Value> = report
        .failures
        .iter()
        .map(|(path, error)| (path.clone(), json!({ "message": error.message, "chains": error.chains() })))
        .collect();
    let value = json!({
        "ok": report.is_success(),
        "failures": failures,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}
