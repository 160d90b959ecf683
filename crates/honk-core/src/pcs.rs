//! Commitment scheme interface and a Pedersen/IPA instantiation
//!
//! An opening claim states `⟨column, weights⟩ = value` for a committed column. Evaluating
//! a multilinear column at `u` uses `weights = eq(u, ·)`; its shift uses the weights from
//! [`shifted_weights`](crate::polynomial::shifted_weights).
//!
//! [`PedersenIpa`] commits with `C = Σ a_i·G_i` and opens with a Bulletproofs-style
//! inner-product argument. It is not hiding.

use crate::errors::{PcsError, VerifyError};
use crate::field::batch_inv;
use crate::ops::{g1_msm, g1_mul};
use crate::polynomial::inner_product;
use crate::transcript::{ProverTranscript, VerifierTranscript};
use crate::types::{Fr, G1Projective, G1};
use ark_bn254::Fq;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField, Zero};
use rayon::prelude::*;
use sha3::{Digest, Keccak256};

/// What the verifier checks: `⟨column behind commitment, weights⟩ = value`
#[derive(Clone, Debug)]
pub struct OpeningClaim {
    pub commitment: G1,
    pub weights: Vec<Fr>,
    pub value: Fr,
}

/// What the prover opens: the column itself plus the same weights and value
#[derive(Clone, Debug)]
pub struct OpeningWitness {
    pub column: Vec<Fr>,
    pub weights: Vec<Fr>,
    pub value: Fr,
}

pub trait CommitmentScheme: Sync {
    /// Longest column the setup can commit to and open
    fn max_size(&self) -> usize;

    fn commit(&self, column: &[Fr]) -> Result<G1, PcsError>;

    /// Write an opening proof for `witness` into the transcript
    fn open(&self, witness: &OpeningWitness, transcript: &mut ProverTranscript) -> Result<(), PcsError>;

    /// Read an opening proof from the transcript. `Ok(false)` means the proof parsed but
    /// does not open the claim.
    fn verify_open(
        &self,
        claim: &OpeningClaim,
        transcript: &mut VerifierTranscript<'_>,
    ) -> Result<bool, VerifyError>;
}

/// Pedersen vector commitments with an inner-product opening
#[derive(Clone, Debug)]
pub struct PedersenIpa {
    generators: Vec<G1>,
    /// Auxiliary generator binding the inner product
    h: G1,
}

/// Deterministic point from `(label, index)` by try-and-increment on x
fn hash_to_curve(label: &str, index: u64) -> G1 {
    let mut counter = 0u32;
    loop {
        let mut hasher = Keccak256::new();
        hasher.update(label.as_bytes());
        hasher.update(index.to_be_bytes());
        hasher.update(counter.to_be_bytes());
        let digest = hasher.finalize();
        let x = Fq::from_be_bytes_mod_order(&digest);
        // BN254 G1 has cofactor 1: every curve point is in the group
        if let Some(point) = G1::get_point_from_x_unchecked(x, false) {
            return point;
        }
        counter += 1;
    }
}

impl PedersenIpa {
    /// Derive `2^max_log_size` generators (plus the auxiliary one) from `label`
    pub fn setup(max_log_size: u32, label: &str) -> Self {
        let count = 1usize << max_log_size;
        let generators: Vec<G1> = (0..count as u64)
            .into_par_iter()
            .map(|i| hash_to_curve(label, i))
            .collect();
        let h = hash_to_curve(label, u64::MAX);
        log::debug!("derived {} commitment generators for {:?}", count, label);
        Self { generators, h }
    }

    fn generators_for(&self, len: usize) -> Result<&[G1], PcsError> {
        if len > self.generators.len() {
            return Err(PcsError::SetupTooSmall {
                available: self.generators.len(),
                requested: len,
            });
        }
        if !len.is_power_of_two() {
            return Err(PcsError::LengthMismatch(format!(
                "opening length {} is not a power of two",
                len
            )));
        }
        Ok(&self.generators[..len])
    }
}

/// `Π_j x_j^{±1}` per index: round `j` folds on bit `k - 1 - j` (1 takes `x_j`, 0 takes `x_j⁻¹`)
fn folding_coefficients(challenges: &[Fr], inverses: &[Fr]) -> Vec<Fr> {
    let mut s = vec![Fr::from(1u64)];
    for (x, x_inv) in challenges.iter().zip(inverses) {
        s = s.iter().flat_map(|v| [*v * x_inv, *v * x]).collect();
    }
    s
}

impl CommitmentScheme for PedersenIpa {
    fn max_size(&self) -> usize {
        self.generators.len()
    }

    fn commit(&self, column: &[Fr]) -> Result<G1, PcsError> {
        if column.len() > self.generators.len() {
            return Err(PcsError::SetupTooSmall {
                available: self.generators.len(),
                requested: column.len(),
            });
        }
        Ok(g1_msm(&self.generators[..column.len()], column))
    }

    fn open(&self, witness: &OpeningWitness, transcript: &mut ProverTranscript) -> Result<(), PcsError> {
        let n = witness.column.len();
        if witness.weights.len() != n {
            return Err(PcsError::LengthMismatch(format!(
                "{} weights for a column of {}",
                witness.weights.len(),
                n
            )));
        }
        let mut g: Vec<G1> = self.generators_for(n)?.to_vec();
        let mut a = witness.column.clone();
        let mut b = witness.weights.clone();

        let xi = transcript.challenge("IPA:xi");
        let u = g1_mul(&self.h, &xi);

        let mut round = 0;
        while a.len() > 1 {
            let half = a.len() / 2;
            let (a_lo, a_hi) = a.split_at(half);
            let (b_lo, b_hi) = b.split_at(half);
            let (g_lo, g_hi) = g.split_at(half);

            let l = (g1_msm(g_hi, a_lo).into_group() + u * inner_product(a_lo, b_hi)).into_affine();
            let r = (g1_msm(g_lo, a_hi).into_group() + u * inner_product(a_hi, b_lo)).into_affine();
            transcript.send_g1(&format!("IPA:L_{}", round), &l);
            transcript.send_g1(&format!("IPA:R_{}", round), &r);

            let x = transcript.challenge(&format!("IPA:x_{}", round));
            let x_inv = x.inverse().ok_or(PcsError::ZeroChallenge)?;

            let a_next: Vec<Fr> = a_lo.iter().zip(a_hi).map(|(lo, hi)| *lo * x + *hi * x_inv).collect();
            let b_next: Vec<Fr> = b_lo.iter().zip(b_hi).map(|(lo, hi)| *lo * x_inv + *hi * x).collect();
            let g_next: Vec<G1Projective> = g_lo
                .par_iter()
                .zip(g_hi.par_iter())
                .map(|(lo, hi)| *lo * x_inv + *hi * x)
                .collect();

            a = a_next;
            b = b_next;
            g = G1Projective::normalize_batch(&g_next);
            round += 1;
        }

        transcript.send_scalar("IPA:a", &a[0]);
        Ok(())
    }

    fn verify_open(
        &self,
        claim: &OpeningClaim,
        transcript: &mut VerifierTranscript<'_>,
    ) -> Result<bool, VerifyError> {
        let n = claim.weights.len();
        let g = self.generators_for(n)?;
        let rounds = n.trailing_zeros() as usize;

        let xi = transcript.challenge("IPA:xi");
        let u = g1_mul(&self.h, &xi);

        let mut p = claim.commitment.into_group() + u * claim.value;
        let mut challenges = Vec::with_capacity(rounds);
        for round in 0..rounds {
            let l = transcript.receive_g1(&format!("IPA:L_{}", round))?;
            let r = transcript.receive_g1(&format!("IPA:R_{}", round))?;
            let x = transcript.challenge(&format!("IPA:x_{}", round));
            if x.is_zero() {
                return Ok(false);
            }
            let x_sq = x.square();
            let x_inv_sq = match x_sq.inverse() {
                Some(v) => v,
                None => return Ok(false),
            };
            p += l * x_sq + r * x_inv_sq;
            challenges.push(x);
        }
        let a = transcript.receive_scalar("IPA:a")?;

        let mut inverses = challenges.clone();
        batch_inv(&mut inverses);
        let s = folding_coefficients(&challenges, &inverses);

        let g_final = g1_msm(g, &s);
        let b_final = inner_product(&s, &claim.weights);
        let expected = (g_final.into_group() + u * b_final) * a;

        Ok(p == expected)
    }
}
