//! Core types shared by the prover and verifier
//!
//! Field elements are arkworks `Fr` values in memory. On the wire they are 32-byte
//! big-endian integers; commitments are 64-byte `x || y` big-endian points.

/// BN254 scalar field element.
pub type Fr = ark_bn254::Fr;

/// BN254 G1 point in affine form (commitments, generators).
pub type G1 = ark_bn254::G1Affine;

/// Projective G1 point, used for accumulation before normalizing.
pub type G1Projective = ark_bn254::G1Projective;

/// Encoded size of a scalar in the proof stream.
pub const FR_SIZE: usize = 32;

/// Encoded size of a commitment in the proof stream.
pub const G1_SIZE: usize = 64;

/// Encoded G1 identity (point at infinity).
pub const G1_IDENTITY_BYTES: [u8; G1_SIZE] = [0u8; G1_SIZE];

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::AffineRepr;

    #[test]
    fn test_encoded_sizes() {
        assert_eq!(FR_SIZE * 2, G1_SIZE);
        assert!(G1::identity().is_zero());
    }
}
