//! Scalar-field helpers on top of arkworks `Fr`
//!
//! Encoding is 32-byte big-endian. Decoding from the proof stream is strict (values
//! must be canonical); hash output is reduced mod r.

use crate::types::{Fr, FR_SIZE};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};

/// Convert u64 to Fr
#[inline]
pub fn fr_from_u64(val: u64) -> Fr {
    Fr::from(val)
}

/// Convert a signed integer to Fr (negative values map to r - |val|)
pub fn fr_from_i64(val: i64) -> Fr {
    if val < 0 {
        -Fr::from(val.unsigned_abs())
    } else {
        Fr::from(val as u64)
    }
}

/// Encode as 32 bytes big-endian
pub fn fr_to_bytes(fr: &Fr) -> [u8; FR_SIZE] {
    let mut out = [0u8; FR_SIZE];
    let bytes = fr.into_bigint().to_bytes_be();
    out[FR_SIZE - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Decode 32 big-endian bytes, rejecting values >= r
pub fn fr_from_bytes(bytes: &[u8; FR_SIZE]) -> Option<Fr> {
    let fr = Fr::from_be_bytes_mod_order(bytes);
    (fr_to_bytes(&fr) == *bytes).then_some(fr)
}

/// Reduce a 32-byte big-endian value (e.g. a hash) mod r
#[inline]
pub fn fr_reduce(bytes: &[u8; FR_SIZE]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Parse a hex string (optional `0x` prefix, up to 64 digits) into a canonical Fr
pub fn fr_from_hex(s: &str) -> Option<Fr> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > 2 * FR_SIZE {
        return None;
    }
    let padded = format!("{:0>64}", digits);
    let mut bytes = [0u8; FR_SIZE];
    hex::decode_to_slice(padded, &mut bytes).ok()?;
    fr_from_bytes(&bytes)
}

/// Split the canonical encoding into the low and high 128-bit halves
pub fn fr_split_128(fr: &Fr) -> (Fr, Fr) {
    let bytes = fr_to_bytes(fr);
    let mut lo = [0u8; FR_SIZE];
    let mut hi = [0u8; FR_SIZE];
    lo[16..].copy_from_slice(&bytes[16..]);
    hi[16..].copy_from_slice(&bytes[..16]);
    (fr_reduce(&lo), fr_reduce(&hi))
}

/// Invert every nonzero entry in place with one field inversion (Montgomery's trick).
///
/// Zero entries stay zero, so a column that is inactive on some rows can be inverted
/// without filtering first.
pub fn batch_inv(values: &mut [Fr]) {
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = Fr::one();
    for v in values.iter() {
        prefix.push(acc);
        if !v.is_zero() {
            acc *= v;
        }
    }

    // acc is a product of nonzero elements, so it is invertible
    let mut inv = match acc.inverse() {
        Some(inv) => inv,
        None => return,
    };

    for (v, before) in values.iter_mut().zip(prefix).rev() {
        if v.is_zero() {
            continue;
        }
        let next = inv * *v;
        *v = inv * before;
        inv = next;
    }
}

/// Successive powers `[1, x, x^2, ..., x^(count-1)]`
pub fn powers(x: &Fr, count: usize) -> Vec<Fr> {
    let mut out = Vec::with_capacity(count);
    let mut cur = Fr::one();
    for _ in 0..count {
        out.push(cur);
        cur *= x;
    }
    out
}

/// `Σ values[i] · weights[i]` over short vectors (alpha or rho batching)
pub fn weighted_sum(values: &[Fr], weights: &[Fr]) -> Fr {
    debug_assert_eq!(values.len(), weights.len());
    values
        .iter()
        .zip(weights)
        .fold(Fr::zero(), |acc, (v, w)| acc + *v * w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bytes_canonical() {
        let x = fr_from_u64(0x1234_5678);
        let bytes = fr_to_bytes(&x);
        assert_eq!(&bytes[28..], &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(fr_from_bytes(&bytes), Some(x));

        // r itself is not canonical
        let modulus = hex_literal::hex!(
            "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
        );
        assert_eq!(fr_from_bytes(&modulus), None);
        assert_eq!(fr_reduce(&modulus), Fr::zero());
    }

    #[test]
    fn test_from_i64() {
        assert_eq!(fr_from_i64(-17) + fr_from_u64(17), Fr::zero());
        assert_eq!(fr_from_i64(5), fr_from_u64(5));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(fr_from_hex("0x09"), Some(fr_from_u64(9)));
        assert_eq!(fr_from_hex("ff"), Some(fr_from_u64(255)));
        assert_eq!(fr_from_hex(""), None);
        assert_eq!(fr_from_hex("zz"), None);
    }

    #[test]
    fn test_split_128() {
        let mut bytes = [0u8; 32];
        bytes[15] = 7;
        bytes[31] = 3;
        let x = fr_reduce(&bytes);
        let (lo, hi) = fr_split_128(&x);
        assert_eq!(lo, fr_from_u64(3));
        assert_eq!(hi, fr_from_u64(7));
    }

    #[test]
    fn test_batch_inv_skips_zeros() {
        let mut values = vec![
            fr_from_u64(2),
            Fr::zero(),
            fr_from_u64(5),
            Fr::zero(),
            fr_from_u64(9),
        ];
        let expected: Vec<Fr> = values
            .iter()
            .map(|v| v.inverse().unwrap_or(Fr::zero()))
            .collect();
        batch_inv(&mut values);
        assert_eq!(values, expected);
    }

    #[test]
    fn test_batch_inv_all_zero() {
        let mut values = vec![Fr::zero(); 4];
        batch_inv(&mut values);
        assert!(values.iter().all(Zero::is_zero));
    }

    #[test]
    fn test_powers() {
        let p = powers(&fr_from_u64(3), 4);
        assert_eq!(
            p,
            vec![
                fr_from_u64(1),
                fr_from_u64(3),
                fr_from_u64(9),
                fr_from_u64(27)
            ]
        );
    }

    #[test]
    fn test_weighted_sum() {
        let values = [fr_from_u64(1), fr_from_u64(2), fr_from_u64(3)];
        let weights = powers(&fr_from_u64(10), 3);
        assert_eq!(weighted_sum(&values, &weights), fr_from_u64(321));
        assert_eq!(weighted_sum(&[], &[]), Fr::zero());
    }

    proptest! {
        #[test]
        fn prop_batch_inv_matches_single(raw in prop::collection::vec(0u64..1000, 0..40)) {
            let mut values: Vec<Fr> = raw.iter().map(|&v| fr_from_u64(v)).collect();
            let original = values.clone();
            batch_inv(&mut values);
            for (inv, v) in values.iter().zip(original.iter()) {
                if v.is_zero() {
                    prop_assert!(inv.is_zero());
                } else {
                    prop_assert_eq!(*inv * v, Fr::one());
                }
            }
        }
    }
}
