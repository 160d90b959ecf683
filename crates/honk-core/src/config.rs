//! Library configuration

use crate::errors::KeyError;
use crate::pcs::PedersenIpa;
use crate::trace::MAX_LOG_CIRCUIT_SIZE;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LOG_CIRCUIT_SIZE: u32 = 16;
pub const DEFAULT_GENERATOR_LABEL: &str = "honk-core/pedersen-ipa";

/// Commitment setup parameters. Prover and verifier must agree on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HonkConfig {
    /// Largest supported trace, as log2 of the row count
    pub max_log_circuit_size: u32,
    /// Domain label the commitment generators are derived from
    pub generator_label: String,
}

impl Default for HonkConfig {
    fn default() -> Self {
        Self {
            max_log_circuit_size: DEFAULT_MAX_LOG_CIRCUIT_SIZE,
            generator_label: DEFAULT_GENERATOR_LABEL.to_string(),
        }
    }
}

impl HonkConfig {
    /// Reject traces larger than the setup
    pub fn check_circuit_size(&self, log_size: u32) -> Result<(), KeyError> {
        let max = self.max_log_circuit_size.min(MAX_LOG_CIRCUIT_SIZE);
        if log_size > max {
            return Err(KeyError::CircuitTooLarge { log_size, max });
        }
        Ok(())
    }

    /// Build the commitment scheme for this configuration
    pub fn commitment_scheme(&self) -> PedersenIpa {
        PedersenIpa::setup(
            self.max_log_circuit_size.min(MAX_LOG_CIRCUIT_SIZE),
            &self.generator_label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcs::CommitmentScheme;

    #[test]
    fn test_defaults() {
        let config = HonkConfig::default();
        assert_eq!(config.max_log_circuit_size, 16);
        assert_eq!(config.generator_label, "honk-core/pedersen-ipa");
    }

    #[test]
    fn test_circuit_size_check() {
        let config = HonkConfig {
            max_log_circuit_size: 4,
            ..Default::default()
        };
        assert!(config.check_circuit_size(4).is_ok());
        assert!(matches!(
            config.check_circuit_size(5),
            Err(KeyError::CircuitTooLarge { log_size: 5, max: 4 })
        ));
        assert_eq!(config.commitment_scheme().max_size(), 16);
    }
}
