//! Verify command - check a proof against a verification key

use crate::config::Config;
use crate::files::PublicInputsFile;
use crate::CommonArgs;
use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use honk_core::VerificationKey;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to the verification key file
    #[arg(long)]
    vk: PathBuf,

    /// Path to the proof file
    #[arg(long)]
    proof: PathBuf,

    /// Path to the public inputs JSON array (omit for circuits without public inputs)
    #[arg(long)]
    public_inputs: Option<PathBuf>,
}

pub fn run(config: &Config, args: VerifyArgs) -> Result<()> {
    let vk_bytes =
        fs::read(&args.vk).with_context(|| format!("Failed to read VK file: {:?}", args.vk))?;
    let proof = fs::read(&args.proof)
        .with_context(|| format!("Failed to read proof file: {:?}", args.proof))?;
    let public_inputs = match &args.public_inputs {
        Some(path) => PublicInputsFile::read(path)?,
        None => vec![],
    };

    let vk = VerificationKey::from_bytes(&vk_bytes).context("Invalid verification key")?;
    config.honk.check_circuit_size(vk.log_circuit_size)?;

    if !config.quiet && !config.json_output {
        println!("{} Checking proof against {:?}", style("→").cyan().bold(), args.vk);
        println!("  {} proof bytes, {} public inputs, {} rows", proof.len(), public_inputs.len(), vk.circuit_size());
        println!();
    }

    let scheme = config.honk.commitment_scheme();
    let verified = honk_core::verify(&vk, &proof, &public_inputs, &scheme)?;

    if config.json_output {
        println!(r#"{{"verified": {}}}"#, verified);
    } else if !config.quiet {
        if verified {
            println!("{} Proof accepted", style("✓").green().bold());
        } else {
            println!("{} Proof rejected", style("✗").red().bold());
        }
    }

    if !verified {
        bail!("proof rejected");
    }
    Ok(())
}
