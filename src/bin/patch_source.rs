//! Apply a literal substitution rule to a source file in place.
//!
//! Usage:
//!   patch-source
//!   patch-source --path app/routes.py --pattern '<n>' --replacement '<name>'
//!   patch-source --dry-run --json
//!
//! With no arguments the built-in target and rule are used, unless
//! `MAINT_PATCH_PATH`, `MAINT_PATCH_PATTERN` or `MAINT_PATCH_REPLACEMENT`
//! override them. Empty variables count as unset; pass `--replacement ''`
//! to delete every occurrence.

use anyhow::{Context, Result};
use clap::Parser;
use maintkit::{FsTextStore, PatchConfig, PatchMode, PatchResult, SubstitutionRule, patch_with};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "patch-source")]
#[command(about = "Replace every literal occurrence of a pattern in a file")]
struct Cli {
    /// File to patch; defaults to the configured source path.
    #[arg(long)]
    path: Option<PathBuf>,
    /// Literal text to search for.
    #[arg(long)]
    pattern: Option<String>,
    /// Literal text to substitute.
    #[arg(long)]
    replacement: Option<String>,
    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,
    /// Emit the result as a JSON object.
    #[arg(long)]
    json: bool,
}

fn main() {
    maintkit::logging::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let mode = if cli.dry_run {
        PatchMode::DryRun
    } else {
        PatchMode::Write
    };

    let result = patch_with(&FsTextStore, &config.source_path, &config.rule, mode)
        .with_context(|| format!("patching {}", config.source_path.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", summary(&result, mode));
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<PatchConfig> {
    let mut config = PatchConfig::from_env().context("reading patch configuration")?;
    if let Some(path) = &cli.path {
        config.source_path = path.clone();
    }
    if cli.pattern.is_some() || cli.replacement.is_some() {
        let pattern = cli
            .pattern
            .clone()
            .unwrap_or_else(|| config.rule.pattern().to_string());
        let replacement = cli
            .replacement
            .clone()
            .unwrap_or_else(|| config.rule.replacement().to_string());
        config.rule = SubstitutionRule::new(pattern, replacement)?;
    }
    Ok(config)
}

fn summary(result: &PatchResult, mode: PatchMode) -> String {
    let verb = match mode {
        PatchMode::Write => "Patched",
        PatchMode::DryRun => "Would patch",
    };
    let noun = if result.replacements == 1 {
        "replacement"
    } else {
        "replacements"
    };
    format!(
        "{verb} {}: {} {noun}, {} bytes",
        result.path.display(),
        result.replacements,
        result.content_len
    )
}
