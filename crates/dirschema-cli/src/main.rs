// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `dirschema` binary: validates a target tree against a rule document
//! and prints the failure report (spec §6).

mod cli;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{AdapterKind, Args, Granularity};
#[cfg(feature = "fs")]
use dirschema_adapters::FilesystemAdapter;
#[cfg(feature = "hdf5")]
use dirschema_adapters::Hdf5Adapter;
#[cfg(feature = "zip")]
use dirschema_adapters::ZipAdapter;
use dirschema_core::adapter::TreeAdapter;
use dirschema_core::driver::Driver;
use dirschema_core::resolver::ResolveContext;
use dirschema_loader::{discover_default_schema, load_rule_document, load_rule_str, DocumentFormat};
use dirschema_schema::{JsonSchemaValidator, PluginRegistry};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.trace, args.verbose);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// `--trace` picks the level dirschema's own spans log at; `-v` widens the
/// filter for everything else (dependencies included). The wider of the two
/// wins when they disagree.
fn init_logging(trace: Granularity, verbose: u8) {
    let own_level = match trace {
        Granularity::Nothing => "warn",
        Granularity::Summary => "info",
        Granularity::Entity => "debug",
    };
    let default_directive = match verbose {
        0 => format!("dirschema={own_level},warn"),
        1 => "dirschema=debug,warn".to_string(),
        _ => "dirschema=trace,debug".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).init();
}

/// Runs one validation pass. Returns `Ok(true)` when the report is clean,
/// `Ok(false)` when it contains failures (exit code 1), and `Err` for
/// anything that aborts before a report can be produced (exit code 2).
fn run(args: Args) -> Result<bool> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let target = args.target.clone().unwrap_or_else(|| cwd.clone());
    let resolve_cwd = args.cwd.clone().unwrap_or_else(|| cwd.clone());

    // `local_base` is the default base for `local://` references, both while
    // loading the document's own `$ref`s and later while resolving a rule's
    // `valid`/`validMeta` schema refs during evaluation, so both must agree
    // on the same directory (spec §4.3: "defaults to the directory of the
    // dirschema document").
    let (doc, local_base) = match args.schema.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading schema from stdin")?;
            let local_base = args.local_base.clone().unwrap_or_else(|| resolve_cwd.clone());
            let ctx = ResolveContext::new(local_base.clone(), resolve_cwd.clone());
            (load_rule_str(&text, DocumentFormat::Yaml, &ctx)?, local_base)
        }
        Some(path) => {
            let path = PathBuf::from(path);
            let local_base = args.local_base.clone().unwrap_or_else(|| parent_dir(&path));
            let ctx = ResolveContext::new(local_base.clone(), resolve_cwd.clone());
            (load_rule_document(&path, &ctx)?, local_base)
        }
        None => {
            let path = discover_default_schema(&cwd).with_context(|| {
                format!("no schema given and no dirschema.yaml/.yml/.json found in {}", cwd.display())
            })?;
            let local_base = args.local_base.clone().unwrap_or_else(|| parent_dir(&path));
            let ctx = ResolveContext::new(local_base.clone(), resolve_cwd.clone());
            (load_rule_document(&path, &ctx)?, local_base)
        }
    };

    let adapter_kind = args.adapter.unwrap_or_else(|| AdapterKind::infer(&target));
    let adapter = build_adapter(adapter_kind, &target)?;

    let plugins = PluginRegistry::new();
    let validator = JsonSchemaValidator::new(plugins);
    let resolve_ctx = ResolveContext::new(local_base, resolve_cwd);

    let driver = Driver::new(adapter.as_ref(), &validator, &doc.meta, &resolve_ctx);
    let report = driver.run(&doc.rule).context("walking target tree")?;

    print!("{}", report::render(&report, args.format));
    Ok(report.is_success())
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
}

fn build_adapter(kind: AdapterKind, target: &Path) -> Result<Box<dyn TreeAdapter>> {
    match kind {
        #[cfg(feature = "fs")]
        AdapterKind::Fs => Ok(Box::new(FilesystemAdapter::new(target)?)),
        #[cfg(not(feature = "fs"))]
        AdapterKind::Fs => bail!("this build was compiled without the `fs` adapter"),

        #[cfg(feature = "zip")]
        AdapterKind::Zip => Ok(Box::new(ZipAdapter::open(target)?)),
        #[cfg(not(feature = "zip"))]
        AdapterKind::Zip => bail!("this build was compiled without the `zip` adapter"),

        #[cfg(feature = "hdf5")]
        AdapterKind::Hdf5 => Ok(Box::new(Hdf5Adapter::open(target)?)),
        #[cfg(not(feature = "hdf5"))]
        AdapterKind::Hdf5 => bail!("this build was compiled without the `hdf5` adapter"),
    }
}
