//! Configuration CLI
//!
//! Shows the effective layered configuration or writes a starter config file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schema_compat::CheckerConfig;

#[derive(Parser)]
#[command(name = "compat-config")]
#[command(about = "Inspect and bootstrap compatibility checker configuration")]
struct Cli {
    /// Path to a config file (default: compat.toml in standard locations)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as TOML
    Show,

    /// Write a starter config file with the default values
    Init {
        /// Where to write the file
        #[arg(default_value = "compat.toml")]
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Show => {
            let config = CheckerConfig::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            let rendered =
                toml::to_string_pretty(&config).context("failed to render configuration")?;
            print!("{}", rendered);
            Ok(())
        }

        Commands::Init { path } => {
            if std::path::Path::new(&path).exists() {
                anyhow::bail!("refusing to overwrite existing file: {}", path);
            }
            let config = CheckerConfig::default();
            config
                .save(&path)
                .with_context(|| format!("failed to write {}", path))?;
            println!("✅ Wrote starter configuration to {}", path);
            Ok(())
        }
    }
}
