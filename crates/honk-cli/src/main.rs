//! honk CLI - generate keys, prove and verify over JSON trace files

mod commands;
mod config;
mod files;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{keygen, prove, verify};
use console::style;
use std::path::PathBuf;

/// Prove and verify execution traces
#[derive(Parser)]
#[command(name = "honk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Setup and output flags accepted by every subcommand
#[derive(Args, Clone)]
pub struct CommonArgs {
    /// Path to a TOML config file
    #[arg(short, long, env = "HONK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Largest supported trace, as log2 of the row count
    #[arg(long)]
    pub max_log_circuit_size: Option<u32>,

    /// Domain label for the commitment generators
    #[arg(long)]
    pub generator_label: Option<String>,

    /// Result format on stdout
    #[arg(long, default_value = "human")]
    pub output: OutputFormat,

    /// Suppress progress and summary lines
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit to a trace's precomputed columns and write the verification key
    Keygen(keygen::KeygenArgs),

    /// Prove a trace and write the proof
    Prove(prove::ProveArgs),

    /// Verify a proof against a verification key and public inputs
    Verify(verify::VerifyArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen(args) => {
            let config = config::Config::load(&args.common)?;
            keygen::run(&config, args)
        }
        Commands::Prove(args) => {
            let config = config::Config::load(&args.common)?;
            prove::run(&config, args)
        }
        Commands::Verify(args) => {
            let config = config::Config::load(&args.common)?;
            verify::run(&config, args)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
