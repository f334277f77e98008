//! Schema Compatibility CLI
//!
//! Compares two versions of an Avro schema and validates the changes against
//! the subject's compatibility mode.
//!
//! Usage:
//!   compat-check old_schema.avsc new_schema.avsc
//!   compat-check old.avsc new.avsc --mode FULL --show-diff

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use schema_compat::config::OutputFormat;
use schema_compat::{
    load_schema, report, CheckerConfig, CompatibilityChecker, CompatibilityMode, RegistryClient,
};

#[derive(Parser)]
#[command(name = "compat-check")]
#[command(about = "Check compatibility between two Avro schema versions")]
struct Cli {
    /// Path to the previous schema version
    old_schema: PathBuf,

    /// Path to the new schema version
    new_schema: PathBuf,

    /// Path to a config file (default: compat.toml in standard locations)
    #[arg(short, long)]
    config: Option<String>,

    /// Compatibility mode override; skips the registry lookup
    #[arg(short, long)]
    mode: Option<String>,

    /// Registry base URL override
    #[arg(long)]
    registry_url: Option<String>,

    /// Registry subject whose mode governs the check
    #[arg(short, long)]
    subject: Option<String>,

    /// Output format (text, json)
    #[arg(short, long)]
    format: Option<String>,

    /// Print the full field diff listing before the verdict
    #[arg(long)]
    show_diff: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = CheckerConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(url) = cli.registry_url {
        config.registry.url = url;
    }
    if let Some(subject) = cli.subject {
        config.registry.subject = Some(subject);
    }
    if cli.show_diff {
        config.report.show_diff = true;
    }

    let old = load_schema(&cli.old_schema)
        .with_context(|| format!("failed to load {}", cli.old_schema.display()))?;
    let new = load_schema(&cli.new_schema)
        .with_context(|| format!("failed to load {}", cli.new_schema.display()))?;

    let mode = resolve_mode(&cli.mode, &config)?;

    let result = CompatibilityChecker::new(mode).check(&old, &new);

    let format = match cli.format.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("text") => OutputFormat::Text,
        Some(other) => anyhow::bail!("unsupported output format: {}", other),
        None => config.report.format,
    };

    match format {
        OutputFormat::Text => {
            println!("{}", report::render_text(&result, config.report.show_diff));
        }
        OutputFormat::Json => {
            println!("{}", report::render_json(&result)?);
        }
    }

    Ok(result.verdict.exit_code())
}

/// Resolve the mode to check under: an explicit override wins, then the
/// registry lookup for the configured subject, then the configured default.
fn resolve_mode(
    override_mode: &Option<String>,
    config: &CheckerConfig,
) -> anyhow::Result<CompatibilityMode> {
    if let Some(mode) = override_mode {
        return Ok(CompatibilityMode::parse(mode));
    }

    let fallback = config.fallback_mode();
    match &config.registry.subject {
        Some(subject) => {
            let client = RegistryClient::new(&config.registry)
                .context("failed to build registry client")?;
            Ok(client.subject_mode(subject, fallback))
        }
        None => Ok(fallback),
    }
}
