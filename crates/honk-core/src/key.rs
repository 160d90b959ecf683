//! Proving and verification keys
//!
//! ## Verification key format (1696 bytes)
//! - [0..8]: circuit_size as 64-bit big-endian
//! - [8..16]: log2_circuit_size as 64-bit big-endian
//! - [16..24]: num_public_inputs as 64-bit big-endian
//! - [24..32]: pub_inputs_offset as 64-bit big-endian
//! - [32..1696]: 26 G1 commitments to the precomputed columns (64 bytes each), in
//!   [`Entity`] order

use crate::entities::{Entity, NUM_PRECOMPUTED_ENTITIES};
use crate::errors::{KeyError, PcsError};
use crate::field::fr_reduce;
use crate::ops::{g1_from_bytes, g1_to_bytes};
use crate::pcs::CommitmentScheme;
use crate::relations::databus::BusColumn;
use crate::trace::{Trace, MAX_LOG_CIRCUIT_SIZE, MIN_LOG_CIRCUIT_SIZE};
use crate::transcript::u64_to_word;
use crate::types::{Fr, G1, G1_SIZE};
use ark_ff::{One, Zero};
use rayon::prelude::*;
use sha3::{Digest, Keccak256};

/// Header: 4 × 8-byte big-endian u64
pub const VK_HEADER_SIZE: usize = 32;

/// Serialized verification key size
pub const VK_SIZE: usize = VK_HEADER_SIZE + NUM_PRECOMPUTED_ENTITIES * G1_SIZE;

/// Everything the prover needs: the filled trace and its public inputs
#[derive(Clone, Debug)]
pub struct ProvingKey {
    pub trace: Trace,
    pub public_inputs: Vec<Fr>,
    pub pub_inputs_offset: usize,
}

impl ProvingKey {
    /// Check that the public inputs fit in the trace and sit in `w_l` at
    /// `pub_inputs_offset..pub_inputs_offset + len`, and that every bus read count is
    /// 0 or 1.
    ///
    /// A bus entry can back at most one read. A value read twice must be written to two
    /// entries.
    pub fn new(trace: Trace, public_inputs: Vec<Fr>, pub_inputs_offset: usize) -> Result<Self, KeyError> {
        let size = trace.size();
        let count = public_inputs.len();
        if pub_inputs_offset.checked_add(count).map_or(true, |end| end > size) {
            return Err(KeyError::PublicInputsOutOfRange {
                offset: pub_inputs_offset,
                count,
                size,
            });
        }
        let w_l = trace.column(Entity::Wl);
        for (index, pi) in public_inputs.iter().enumerate() {
            let row = pub_inputs_offset + index;
            if w_l[row] != *pi {
                return Err(KeyError::PublicInputMismatch { index, row });
            }
        }
        for column in BusColumn::ALL {
            let counts = trace.column(column.read_counts());
            if let Some(row) = counts.iter().position(|c| !c.is_zero() && !c.is_one()) {
                return Err(KeyError::BusReadCount {
                    column: column.read_counts().name(),
                    row,
                });
            }
        }
        Ok(Self {
            trace,
            public_inputs,
            pub_inputs_offset,
        })
    }

    #[inline]
    pub fn log_circuit_size(&self) -> u32 {
        self.trace.log_size()
    }

    /// Commit to the precomputed columns
    pub fn verification_key<C: CommitmentScheme>(&self, scheme: &C) -> Result<VerificationKey, PcsError> {
        let precomputed: Vec<Entity> = Entity::precomputed().collect();
        let commitments = precomputed
            .par_iter()
            .map(|e| scheme.commit(self.trace.column(*e)))
            .collect::<Result<Vec<G1>, PcsError>>()?;
        Ok(VerificationKey {
            log_circuit_size: self.trace.log_size(),
            num_public_inputs: self.public_inputs.len() as u64,
            pub_inputs_offset: self.pub_inputs_offset as u64,
            commitments,
        })
    }
}

/// Commitments to the precomputed columns plus circuit metadata
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationKey {
    pub log_circuit_size: u32,
    pub num_public_inputs: u64,
    pub pub_inputs_offset: u64,
    /// One commitment per precomputed entity, in [`Entity`] order
    pub commitments: Vec<G1>,
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_be_bytes(word)
}

impl VerificationKey {
    #[inline]
    pub fn circuit_size(&self) -> u64 {
        1u64 << self.log_circuit_size
    }

    /// Commitment of a precomputed entity
    pub fn commitment(&self, entity: Entity) -> Option<&G1> {
        if entity.is_precomputed() {
            self.commitments.get(entity.index())
        } else {
            None
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VK_SIZE);
        out.extend_from_slice(&self.circuit_size().to_be_bytes());
        out.extend_from_slice(&(self.log_circuit_size as u64).to_be_bytes());
        out.extend_from_slice(&self.num_public_inputs.to_be_bytes());
        out.extend_from_slice(&self.pub_inputs_offset.to_be_bytes());
        for c in &self.commitments {
            out.extend_from_slice(&g1_to_bytes(c));
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != VK_SIZE {
            return Err(KeyError::InvalidSize {
                expected: VK_SIZE,
                actual: bytes.len(),
            });
        }

        let circuit_size = read_u64(&bytes[0..8]);
        let log_circuit_size = read_u64(&bytes[8..16]);
        let num_public_inputs = read_u64(&bytes[16..24]);
        let pub_inputs_offset = read_u64(&bytes[24..32]);

        // Validate
        if log_circuit_size < MIN_LOG_CIRCUIT_SIZE as u64 || log_circuit_size > MAX_LOG_CIRCUIT_SIZE as u64 {
            return Err(KeyError::InvalidCircuitSize);
        }
        if circuit_size != 1u64 << log_circuit_size {
            return Err(KeyError::InvalidCircuitSize);
        }
        if pub_inputs_offset
            .checked_add(num_public_inputs)
            .map_or(true, |end| end > circuit_size)
        {
            return Err(KeyError::PublicInputsOutOfRange {
                offset: pub_inputs_offset as usize,
                count: num_public_inputs as usize,
                size: circuit_size as usize,
            });
        }

        let commitments = bytes[VK_HEADER_SIZE..]
            .chunks_exact(G1_SIZE)
            .map(|chunk| {
                let mut point = [0u8; G1_SIZE];
                point.copy_from_slice(chunk);
                g1_from_bytes(&point).map_err(|_| KeyError::PointNotOnCurve)
            })
            .collect::<Result<Vec<G1>, KeyError>>()?;

        Ok(Self {
            log_circuit_size: log_circuit_size as u32,
            num_public_inputs,
            pub_inputs_offset,
            commitments,
        })
    }

    /// Keccak256 of the header fields (as 32-byte words) and all commitments, reduced mod r
    pub fn hash(&self) -> Fr {
        let mut hasher = Keccak256::new();
        hasher.update(u64_to_word(self.circuit_size()));
        hasher.update(u64_to_word(self.log_circuit_size as u64));
        hasher.update(u64_to_word(self.num_public_inputs));
        hasher.update(u64_to_word(self.pub_inputs_offset));
        for c in &self.commitments {
            hasher.update(g1_to_bytes(c));
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        fr_reduce(&digest)
    }
}
