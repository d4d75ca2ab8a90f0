// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argument parsing (spec §6). Positional args name the rule document and
//! the target tree; everything else tunes how they're read.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dirschema", version, about = "Validate a directory, archive, or HDF5 file against a DirSchema rule document")]
pub struct Args {
    /// Path to the rule document (YAML or JSON), or `-` for stdin. When
    /// omitted, looks for `dirschema.yaml`/`.yml`/`.json` in the current
    /// directory.
    pub schema: Option<String>,

    /// Root of the tree to validate. Defaults to the current directory.
    pub target: Option<PathBuf>,

    /// Which adapter reads `target`. Inferred from its extension when
    /// omitted (`.zip` -> zip, `.h5`/`.hdf5` -> hdf5, otherwise fs).
    #[arg(long, value_enum)]
    pub adapter: Option<AdapterKind>,

    /// Base directory for `local://` schema references. Defaults to the
    /// rule document's own directory.
    #[arg(long)]
    pub local_base: Option<PathBuf>,

    /// Base directory for `cwd://` references and bare relative schema
    /// paths. Defaults to the process's current directory.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Output format for the failure report.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Increase log verbosity. Repeatable: `-v` debug, `-vv` trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Coarse tracing granularity, independent of `-v`.
    #[arg(long, value_enum, default_value = "nothing")]
    pub trace: Granularity,
}

/// Granularity of the per-run trace the evaluator and driver emit, kept as
/// its own knob alongside `-v` rather than folded into it: `-v` widens
/// *everything* tracing logs, `--trace` picks which of dirschema's own
/// spans show up at all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Granularity {
    /// No per-run tracing output.
    #[default]
    Nothing,
    /// How many paths were scanned and how many failed.
    Summary,
    /// Per-path, per-rule-node tracing.
    Entity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AdapterKind {
    Fs,
    Zip,
    Hdf5,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl AdapterKind {
    /// Infers the adapter from `target`'s extension, falling back to `fs`
    /// for directories and anything unrecognized.
    pub fn infer(target: &std::path::Path) -> Self {
        match target.extension().and_then(|e| e.to_str()) {
            Some("zip") => Self::Zip,
            Some("h5" | "hdf5") => Self::Hdf5,
            _ => Self::Fs,
        }
    }
}
