//! BN254 G1 operations and point encoding
//!
//! Points are encoded as 64 bytes `x || y` big-endian; the identity is 64 zero bytes
//! ((0, 0) is not on the curve, so the encoding is unambiguous).

use crate::errors::ProofError;
use crate::types::{Fr, G1Projective, FR_SIZE, G1, G1_IDENTITY_BYTES, G1_SIZE};
use ark_bn254::Fq;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{BigInteger, PrimeField};

/// G1 addition
#[inline]
pub fn g1_add(a: &G1, b: &G1) -> G1 {
    (a.into_group() + b).into_affine()
}

/// G1 scalar multiplication
#[inline]
pub fn g1_mul(point: &G1, scalar: &Fr) -> G1 {
    (*point * scalar).into_affine()
}

/// Multi-scalar multiplication `Σ scalars[i] · points[i]` over the common prefix
pub fn g1_msm(points: &[G1], scalars: &[Fr]) -> G1 {
    let len = points.len().min(scalars.len());
    if len == 0 {
        return G1::identity();
    }
    G1Projective::msm_unchecked(&points[..len], &scalars[..len]).into_affine()
}

/// Encode a point as `x || y` big-endian
pub fn g1_to_bytes(point: &G1) -> [u8; G1_SIZE] {
    if point.is_zero() {
        return G1_IDENTITY_BYTES;
    }
    let mut out = [0u8; G1_SIZE];
    write_fq(&mut out[..FR_SIZE], &point.x);
    write_fq(&mut out[FR_SIZE..], &point.y);
    out
}

/// Decode a point, checking coordinates are canonical and the point is on the curve
pub fn g1_from_bytes(bytes: &[u8; G1_SIZE]) -> Result<G1, ProofError> {
    if *bytes == G1_IDENTITY_BYTES {
        return Ok(G1::identity());
    }
    let x = read_fq(&bytes[..FR_SIZE]).ok_or(ProofError::InvalidG1Point)?;
    let y = read_fq(&bytes[FR_SIZE..]).ok_or(ProofError::InvalidG1Point)?;
    let point = G1::new_unchecked(x, y);
    // BN254 G1 has cofactor 1, so on-curve implies prime-order subgroup
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ProofError::InvalidG1Point);
    }
    Ok(point)
}

fn write_fq(out: &mut [u8], value: &Fq) {
    let bytes = value.into_bigint().to_bytes_be();
    let start = out.len() - bytes.len();
    out[start..].copy_from_slice(&bytes);
}

fn read_fq(bytes: &[u8]) -> Option<Fq> {
    let value = Fq::from_be_bytes_mod_order(bytes);
    let mut reencoded = [0u8; FR_SIZE];
    write_fq(&mut reencoded, &value);
    (reencoded[..] == *bytes).then_some(value)
}

/// Check that a point is not the identity (used for generator sanity checks)
#[inline]
pub fn g1_is_identity(point: &G1) -> bool {
    point.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_u64;

    #[test]
    fn test_generator_encoding() {
        let g = G1::generator();
        let bytes = g1_to_bytes(&g);
        // BN254 generator is (1, 2)
        assert_eq!(bytes[31], 1);
        assert_eq!(bytes[63], 2);
        assert_eq!(g1_from_bytes(&bytes).unwrap(), g);
    }

    #[test]
    fn test_identity_encoding() {
        let bytes = g1_to_bytes(&G1::identity());
        assert_eq!(bytes, G1_IDENTITY_BYTES);
        assert!(g1_is_identity(&g1_from_bytes(&bytes).unwrap()));
    }

    #[test]
    fn test_rejects_off_curve() {
        let mut bytes = g1_to_bytes(&G1::generator());
        bytes[63] = 3;
        assert!(matches!(
            g1_from_bytes(&bytes),
            Err(ProofError::InvalidG1Point)
        ));
    }

    #[test]
    fn test_msm_matches_naive() {
        let g = G1::generator();
        let two_g = g1_add(&g, &g);
        let points = [g, two_g];
        let scalars = [fr_from_u64(3), fr_from_u64(5)];
        // 3g + 10g = 13g
        assert_eq!(g1_msm(&points, &scalars), g1_mul(&g, &fr_from_u64(13)));
        assert!(g1_is_identity(&g1_msm(&[], &[])));
    }
}
