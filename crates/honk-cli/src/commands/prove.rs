//! Prove command - prove a trace and write the proof

use crate::config::Config;
use crate::files::{PublicInputsFile, TraceFile};
use crate::CommonArgs;
use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct ProveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to the JSON trace file
    #[arg(long)]
    trace: PathBuf,

    /// Where to write the proof
    #[arg(long)]
    proof: PathBuf,

    /// Also write the public inputs as a JSON array
    #[arg(long)]
    public_inputs_out: Option<PathBuf>,
}

pub fn run(config: &Config, args: ProveArgs) -> Result<()> {
    let trace_file = TraceFile::read(&args.trace)?;
    config.honk.check_circuit_size(trace_file.log_circuit_size)?;
    let key = trace_file.proving_key()?;
    let public_inputs = key.public_inputs.clone();

    if !config.quiet && !config.json_output {
        println!(
            "{} Proving {} rows with {} public inputs...",
            style("→").cyan().bold(),
            key.trace.size(),
            public_inputs.len()
        );
    }

    let pb = super::spinner(config, "Running prover rounds...")?;
    let scheme = config.honk.commitment_scheme();
    let start = Instant::now();
    let proof = honk_core::prove(key, &scheme);
    let elapsed = start.elapsed();
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let proof = proof.context("Proving failed")?;

    fs::write(&args.proof, &proof)
        .with_context(|| format!("Failed to write proof file: {:?}", args.proof))?;
    if let Some(path) = &args.public_inputs_out {
        PublicInputsFile::from_scalars(&public_inputs).write(path)?;
    }

    if config.json_output {
        println!(
            r#"{{"proof": "{}", "size": {}, "millis": {}}}"#,
            args.proof.display(),
            proof.len(),
            elapsed.as_millis()
        );
    } else if !config.quiet {
        println!("{} Proof written", style("✓").green().bold());
        println!();
        println!("  File: {}", args.proof.display());
        println!("  Size: {} bytes", proof.len());
        println!("  Time: {:.2?}", elapsed);
    }
    Ok(())
}
