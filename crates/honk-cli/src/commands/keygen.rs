//! Keygen command - commit to the precomputed columns and write the verification key

use crate::config::Config;
use crate::files::TraceFile;
use crate::CommonArgs;
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct KeygenArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to the JSON trace file
    #[arg(long)]
    trace: PathBuf,

    /// Where to write the verification key
    #[arg(long)]
    vk: PathBuf,
}

pub fn run(config: &Config, args: KeygenArgs) -> Result<()> {
    let trace_file = TraceFile::read(&args.trace)?;
    config.honk.check_circuit_size(trace_file.log_circuit_size)?;
    let key = trace_file.proving_key()?;

    if !config.quiet && !config.json_output {
        println!(
            "{} Generating verification key for {} rows...",
            style("→").cyan().bold(),
            key.trace.size()
        );
    }

    let pb = super::spinner(config, "Committing to precomputed columns...")?;
    let scheme = config.honk.commitment_scheme();
    let vk = key.verification_key(&scheme);
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let vk = vk.context("Failed to commit to precomputed columns")?;

    let bytes = vk.to_bytes();
    fs::write(&args.vk, &bytes).with_context(|| format!("Failed to write VK file: {:?}", args.vk))?;

    if config.json_output {
        println!(
            r#"{{"vk": "{}", "size": {}, "vk_hash": "{}"}}"#,
            args.vk.display(),
            bytes.len(),
            honk_core::debug::fr_to_hex(&vk.hash())
        );
    } else if !config.quiet {
        println!("{} Verification key written", style("✓").green().bold());
        println!();
        println!("  File: {}", args.vk.display());
        println!("  Size: {} bytes", bytes.len());
        println!("  Hash: {}", honk_core::debug::fr_to_hex(&vk.hash()));
    }
    Ok(())
}
