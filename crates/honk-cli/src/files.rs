//! JSON input and output files
//!
//! Trace file:
//!
//! ```json
//! {
//!   "log_circuit_size": 3,
//!   "pub_inputs_offset": 1,
//!   "public_inputs": ["0x2a"],
//!   "columns": { "w_l": ["0x0", "0x2a", ...], "q_arith": [...] }
//! }
//! ```
//!
//! Columns left out keep their defaults (zero, or the identity permutation for
//! `sigma_k`/`id_k`). Public inputs files are a JSON array of hex scalars.

use anyhow::{anyhow, Context, Result};
use honk_core::debug::fr_to_hex;
use honk_core::field::fr_from_hex;
use honk_core::{Fr, ProvingKey, Trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct TraceFile {
    pub log_circuit_size: u32,
    #[serde(default)]
    pub pub_inputs_offset: usize,
    #[serde(default)]
    pub public_inputs: Vec<String>,
    pub columns: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicInputsFile(pub Vec<String>);

fn parse_scalars(values: &[String], what: &str) -> Result<Vec<Fr>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| fr_from_hex(v).ok_or_else(|| anyhow!("{}[{}]: invalid scalar {:?}", what, i, v)))
        .collect()
}

impl TraceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read trace file: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid trace file: {:?}", path))
    }

    pub fn public_inputs(&self) -> Result<Vec<Fr>> {
        parse_scalars(&self.public_inputs, "public_inputs")
    }

    /// Parse every column and validate the public input placement
    pub fn proving_key(&self) -> Result<ProvingKey> {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| Ok((name.clone(), parse_scalars(values, name)?)))
            .collect::<Result<Vec<(String, Vec<Fr>)>>>()?;
        let trace = Trace::from_named_columns(self.log_circuit_size, columns)?;
        Ok(ProvingKey::new(trace, self.public_inputs()?, self.pub_inputs_offset)?)
    }
}

impl PublicInputsFile {
    pub fn from_scalars(values: &[Fr]) -> Self {
        Self(values.iter().map(fr_to_hex).collect())
    }

    pub fn read(path: &Path) -> Result<Vec<Fr>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read public inputs file: {:?}", path))?;
        let file: PublicInputsFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid public inputs file: {:?}", path))?;
        parse_scalars(&file.0, "public_inputs")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write public inputs file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use honk_core::entities::Entity;
    use honk_core::field::fr_from_u64;

    const TRACE: &str = r#"{
        "log_circuit_size": 2,
        "pub_inputs_offset": 1,
        "public_inputs": ["0x2a"],
        "columns": {
            "w_l": ["0x0", "0x2a", "0x0", "0x0"],
            "q_c": ["0x0", "0x0", "0x5", "0x0"]
        }
    }"#;

    #[test]
    fn test_trace_file_to_key() {
        let file: TraceFile = serde_json::from_str(TRACE).unwrap();
        let key = file.proving_key().unwrap();
        assert_eq!(key.public_inputs, vec![fr_from_u64(42)]);
        assert_eq!(key.trace.get(Entity::Qc, 2), fr_from_u64(5));
        // Untouched columns keep their defaults
        assert_eq!(key.trace.get(Entity::Id2, 1), fr_from_u64(5));
    }

    #[test]
    fn test_trace_file_rejects_unknown_column() {
        let json = TRACE.replace("q_c", "q_unknown");
        let file: TraceFile = serde_json::from_str(&json).unwrap();
        let err = file.proving_key().unwrap_err();
        assert!(err.to_string().contains("q_unknown"));
    }

    #[test]
    fn test_trace_file_rejects_bad_scalar() {
        let json = TRACE.replace("0x5", "0xzz");
        let file: TraceFile = serde_json::from_str(&json).unwrap();
        assert!(file.proving_key().is_err());
    }

    #[test]
    fn test_public_inputs_json() {
        let file = PublicInputsFile::from_scalars(&[fr_from_u64(255)]);
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.starts_with("[\"0x"));
        let parsed: PublicInputsFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parse_scalars(&parsed.0, "pi").unwrap(), vec![fr_from_u64(255)]);
    }
}
