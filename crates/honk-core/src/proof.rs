//! Proof byte layout
//!
//! A proof is the concatenation of every transcript payload in round order. Its size
//! depends only on the circuit size and the number of public inputs.
//!
//! ## Binary proof format
//!
//! 1. circuit_size, public_input_size, pub_inputs_offset: 3 × 32 bytes
//! 2. public inputs: num_public_inputs × 32 bytes
//! 3. w_l, w_r, w_o, calldata, calldata_read_counts, return_data,
//!    return_data_read_counts: 7 × 64 bytes
//! 4. lookup_read_counts, lookup_read_tags, w_4: 3 × 64 bytes
//! 5. lookup_inverses, calldata_inverses, return_data_inverses: 3 × 64 bytes
//! 6. z_perm: 64 bytes
//! 7. sumcheck univariates: log_n × 7 × 32 bytes
//! 8. sumcheck evaluations: 45 × 32 bytes
//! 9. two opening proofs (unshifted, shifted): 2 × (log_n × 2 × 64 + 32) bytes

use crate::entities::{DERIVED_ROUND, INVERSE_ROUND, NUM_ALL_ENTITIES, WIRE_ROUND};
use crate::errors::ProofError;
use crate::relations::BATCHED_RELATION_PARTIAL_LENGTH;
use crate::types::{FR_SIZE, G1_SIZE};

/// Metadata words at the start of every proof
pub const NUM_PREAMBLE_WORDS: usize = 3;

/// Witness commitments sent before sumcheck
pub const NUM_WITNESS_COMMITMENTS: usize = WIRE_ROUND.len() + DERIVED_ROUND.len() + INVERSE_ROUND.len() + 1;

/// Opening proofs at the end of every proof
pub const NUM_OPENINGS: usize = 2;

/// Section offsets and total size for one `(log_n, num_public_inputs)` pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofLayout {
    pub log_circuit_size: usize,
    pub num_public_inputs: usize,
}

impl ProofLayout {
    pub fn new(log_circuit_size: usize, num_public_inputs: usize) -> Self {
        Self {
            log_circuit_size,
            num_public_inputs,
        }
    }

    /// Start of the witness commitments
    pub fn commitments_offset(&self) -> usize {
        (NUM_PREAMBLE_WORDS + self.num_public_inputs) * FR_SIZE
    }

    /// Start of the univariate sent in sumcheck round `round`
    pub fn univariate_offset(&self, round: usize) -> usize {
        self.commitments_offset()
            + NUM_WITNESS_COMMITMENTS * G1_SIZE
            + round * BATCHED_RELATION_PARTIAL_LENGTH * FR_SIZE
    }

    /// Start of the claimed entity evaluations
    pub fn evaluations_offset(&self) -> usize {
        self.univariate_offset(self.log_circuit_size)
    }

    /// Size of one opening proof: an `(L, R)` pair per round plus the final scalar
    pub fn opening_size(&self) -> usize {
        self.log_circuit_size * 2 * G1_SIZE + FR_SIZE
    }

    /// Start of opening proof `index` (0 = unshifted, 1 = shifted)
    pub fn opening_offset(&self, index: usize) -> usize {
        self.evaluations_offset() + NUM_ALL_ENTITIES * FR_SIZE + index * self.opening_size()
    }

    pub fn expected_size(&self) -> usize {
        self.opening_offset(NUM_OPENINGS)
    }

    /// Exact size check, before any parsing
    pub fn check(&self, proof: &[u8]) -> Result<(), ProofError> {
        let expected = self.expected_size();
        if proof.len() != expected {
            return Err(ProofError::InvalidSize {
                expected,
                actual: proof.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_size() {
        // 32·(3+2) + 14·64 + 3·7·32 + 45·32 + 2·(3·128 + 32)
        let layout = ProofLayout::new(3, 2);
        assert_eq!(layout.expected_size(), 160 + 896 + 672 + 1440 + 832);
        assert_eq!(NUM_WITNESS_COMMITMENTS, 14);
    }

    #[test]
    fn test_offsets_are_ordered() {
        let layout = ProofLayout::new(4, 0);
        assert_eq!(layout.commitments_offset(), 96);
        assert_eq!(layout.univariate_offset(0), 96 + 14 * 64);
        assert_eq!(layout.univariate_offset(1) - layout.univariate_offset(0), 224);
        assert_eq!(layout.opening_offset(1) - layout.opening_offset(0), 4 * 128 + 32);
    }

    #[test]
    fn test_check() {
        let layout = ProofLayout::new(1, 0);
        let proof = vec![0u8; layout.expected_size()];
        assert!(layout.check(&proof).is_ok());
        assert!(matches!(
            layout.check(&proof[1..]),
            Err(ProofError::InvalidSize { .. })
        ));
    }
}
