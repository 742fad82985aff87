//! gonew CLI - start a new Go module from a template
//!
//! Usage: `gonew SRCMOD[@VERSION] [DSTMOD [DIR]]`
//!
//! The template module is cloned with git into DIR (default: ./<last element
//! of DSTMOD>), then its module path is changed to DSTMOD everywhere it is
//! declared or imported:
//! - the `module` statement of the root go.mod
//! - import paths naming the module or one of its packages
//! - the package clause of Go files in the module root
//!
//! The template's .git directory is removed unless --keep-git is given.

mod config;
mod git;
mod output;
mod process;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use git::Protocol;
use gonew_rewrite::{check_import_path, leaf, ModuleIdentity};
use output::{OutputFormat, Reporter};
use process::{check_target_dir, rewrite_tree};

#[derive(Parser)]
#[command(name = "gonew")]
#[command(version)]
#[command(about = "Start a new Go module by cloning a template module")]
struct Cli {
    /// Template module path, optionally followed by @VERSION (branch or tag)
    #[arg(value_name = "SRCMOD[@VERSION]")]
    src: String,

    /// Module path of the new module (default: the template's module path)
    #[arg(value_name = "DSTMOD")]
    dst: Option<String>,

    /// Directory for the new module (default: ./<last element of DSTMOD>)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Clone protocol: ssh, https
    #[arg(long, value_name = "PROTOCOL")]
    protocol: Option<String>,

    /// Create a shallow clone with this many commits
    #[arg(long, value_name = "N")]
    depth: Option<u32>,

    /// Keep the template's .git directory
    #[arg(long)]
    keep_git: bool,

    /// Output format: text, json
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Show more output (repeat for more detail)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only show errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    /// Path to config file (default: auto-detect .gonew.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

/// Initialize tracing with appropriate verbosity; RUST_LOG takes precedence
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Load config file
    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        let cfg = Config::load_path(config_path)?;
        info!("using config {}", config_path.display());
        cfg
    } else {
        match Config::load()? {
            Some((cfg, path)) => {
                info!("using config {}", path.display());
                cfg
            }
            None => Config::default(),
        }
    };

    // Determine output format
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let format = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(format).ok_or_else(|| {
            anyhow!(
                "Invalid output format '{}'. Valid options: text, json",
                format
            )
        })?
    };

    let protocol = match cli.protocol.as_deref().or(config.clone.protocol.as_deref()) {
        Some(name) => Protocol::from_str(name).ok_or_else(|| {
            anyhow!("Invalid protocol '{}'. Valid options: ssh, https", name)
        })?,
        None => Protocol::default(),
    };
    let depth = cli.depth.or(config.clone.depth);
    let keep_git = cli.keep_git || config.clone.keep_git.unwrap_or(false);

    let (src_mod, version) = git::split_version(&cli.src);
    check_import_path(src_mod).context("invalid source module name")?;

    let dst_mod = cli.dst.as_deref().unwrap_or(src_mod);
    check_import_path(dst_mod).context("invalid destination module name")?;

    let dir = cli
        .dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(".").join(leaf(dst_mod)));
    check_target_dir(&dir)?;

    let url = git::clone_url(src_mod, protocol)?;
    git::clone_repository(&url, &dir, version, depth)?;

    let identity = ModuleIdentity::new(src_mod, dst_mod);
    let report = rewrite_tree(&dir, &identity, &config, keep_git)
        .with_context(|| format!("Failed to rewrite {}", dir.display()))?;
    info!("wrote {} file(s)", report.files_written);

    let mut reporter = Reporter::new(output_format, cli.verbose > 0);
    reporter.report_tree(&report);
    reporter.finish(dst_mod, &dir)?;

    Ok(ExitCode::SUCCESS)
}
