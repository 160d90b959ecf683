//! Fiat-Shamir transcript using Keccak256
//!
//! Every payload is absorbed as `len(label) || label || bytes`. A challenge absorbs its
//! label, finalizes, reduces the digest mod r and restarts the hasher seeded with the
//! full reduced value, so each challenge commits to everything sent before it.
//!
//! [`ProverTranscript`] also appends each sent payload to the proof bytes;
//! [`VerifierTranscript`] reads the same payloads back from a cursor over the proof.

use crate::errors::ProofError;
use crate::field::{fr_from_bytes, fr_reduce, fr_split_128, fr_to_bytes};
use crate::ops::{g1_from_bytes, g1_to_bytes};
use crate::types::{Fr, FR_SIZE, G1, G1_SIZE};
use sha3::{Digest, Keccak256};

/// Hash state shared by both transcript sides
#[derive(Clone)]
pub struct Transcript {
    hasher: Keccak256,
}

impl Transcript {
    /// Create a new empty transcript
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    fn absorb_label(&mut self, label: &str) {
        self.hasher.update((label.len() as u32).to_be_bytes());
        self.hasher.update(label.as_bytes());
    }

    /// Absorb a labelled payload
    pub fn absorb(&mut self, label: &str, bytes: &[u8]) {
        self.absorb_label(label);
        self.hasher.update(bytes);
    }

    /// Internal: derive the full reduced challenge and reseed the hasher with it.
    fn raw_challenge(&mut self, label: &str) -> Fr {
        self.absorb_label(label);
        let hash = self.hasher.finalize_reset();

        let mut hash_bytes = [0u8; FR_SIZE];
        hash_bytes.copy_from_slice(&hash);
        let full_challenge = fr_reduce(&hash_bytes);

        self.hasher.update(fr_to_bytes(&full_challenge));

        crate::dbg_fr!(label, &full_challenge);
        full_challenge
    }

    /// Generate a single challenge (lower 128 bits of the reduced hash)
    pub fn challenge(&mut self, label: &str) -> Fr {
        let full = self.raw_challenge(label);
        let (lower, _) = fr_split_128(&full);
        lower
    }

    /// Generate a challenge and split it into two 128-bit values (lower, upper)
    pub fn challenge_split(&mut self, label: &str) -> (Fr, Fr) {
        let full = self.raw_challenge(label);
        fr_split_128(&full)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a small integer as a 32-byte big-endian word
pub fn u64_to_word(val: u64) -> [u8; FR_SIZE] {
    let mut bytes = [0u8; FR_SIZE];
    bytes[FR_SIZE - 8..].copy_from_slice(&val.to_be_bytes());
    bytes
}

/// Prover side: absorbs and records every sent payload
#[derive(Clone, Default)]
pub struct ProverTranscript {
    inner: Transcript,
    proof_data: Vec<u8>,
}

impl ProverTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    fn send_bytes(&mut self, label: &str, bytes: &[u8]) {
        self.inner.absorb(label, bytes);
        self.proof_data.extend_from_slice(bytes);
    }

    /// Send a small integer (32-byte big-endian word)
    pub fn send_u64(&mut self, label: &str, val: u64) {
        self.send_bytes(label, &u64_to_word(val));
    }

    pub fn send_scalar(&mut self, label: &str, scalar: &Fr) {
        self.send_bytes(label, &fr_to_bytes(scalar));
    }

    /// Send a run of scalars as one payload
    pub fn send_scalars(&mut self, label: &str, scalars: &[Fr]) {
        let mut bytes = Vec::with_capacity(scalars.len() * FR_SIZE);
        for s in scalars {
            bytes.extend_from_slice(&fr_to_bytes(s));
        }
        self.send_bytes(label, &bytes);
    }

    pub fn send_g1(&mut self, label: &str, point: &G1) {
        crate::dbg_g1!(label, point);
        self.send_bytes(label, &g1_to_bytes(point));
    }

    /// Absorb a value both sides already know; nothing is written to the proof
    pub fn add_to_hash_buffer(&mut self, label: &str, scalar: &Fr) {
        self.inner.absorb(label, &fr_to_bytes(scalar));
    }

    pub fn challenge(&mut self, label: &str) -> Fr {
        self.inner.challenge(label)
    }

    pub fn challenge_split(&mut self, label: &str) -> (Fr, Fr) {
        self.inner.challenge_split(label)
    }

    /// Bytes sent so far
    pub fn proof_len(&self) -> usize {
        self.proof_data.len()
    }

    /// Consume the transcript and return the proof bytes
    pub fn export_proof(self) -> Vec<u8> {
        self.proof_data
    }
}

/// Verifier side: reads payloads from the proof in the prover's order
pub struct VerifierTranscript<'a> {
    inner: Transcript,
    proof: &'a [u8],
    cursor: usize,
}

impl<'a> VerifierTranscript<'a> {
    pub fn new(proof: &'a [u8]) -> Self {
        Self {
            inner: Transcript::new(),
            proof,
            cursor: 0,
        }
    }

    fn receive_bytes(&mut self, label: &str, len: usize) -> Result<&'a [u8], ProofError> {
        let remaining = self.proof.len() - self.cursor;
        if remaining < len {
            return Err(ProofError::Truncated {
                label: label.to_string(),
                needed: len,
                remaining,
            });
        }
        let proof: &'a [u8] = self.proof;
        let bytes = &proof[self.cursor..self.cursor + len];
        self.cursor += len;
        self.inner.absorb(label, bytes);
        Ok(bytes)
    }

    /// Receive a small integer sent with [`ProverTranscript::send_u64`]
    pub fn receive_u64(&mut self, label: &str) -> Result<u64, ProofError> {
        let bytes = self.receive_bytes(label, FR_SIZE)?;
        if bytes[..FR_SIZE - 8].iter().any(|&b| b != 0) {
            return Err(ProofError::InvalidScalar);
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[FR_SIZE - 8..]);
        Ok(u64::from_be_bytes(word))
    }

    pub fn receive_scalar(&mut self, label: &str) -> Result<Fr, ProofError> {
        let bytes = self.receive_bytes(label, FR_SIZE)?;
        decode_scalar(bytes)
    }

    pub fn receive_scalars(&mut self, label: &str, count: usize) -> Result<Vec<Fr>, ProofError> {
        let bytes = self.receive_bytes(label, count * FR_SIZE)?;
        bytes.chunks_exact(FR_SIZE).map(decode_scalar).collect()
    }

    pub fn receive_g1(&mut self, label: &str) -> Result<G1, ProofError> {
        let bytes = self.receive_bytes(label, G1_SIZE)?;
        let mut point = [0u8; G1_SIZE];
        point.copy_from_slice(bytes);
        let point = g1_from_bytes(&point)?;
        crate::dbg_g1!(label, &point);
        Ok(point)
    }

    pub fn add_to_hash_buffer(&mut self, label: &str, scalar: &Fr) {
        self.inner.absorb(label, &fr_to_bytes(scalar));
    }

    pub fn challenge(&mut self, label: &str) -> Fr {
        self.inner.challenge(label)
    }

    pub fn challenge_split(&mut self, label: &str) -> (Fr, Fr) {
        self.inner.challenge_split(label)
    }

    /// Fail if any proof bytes were not consumed
    pub fn finish(&self) -> Result<(), ProofError> {
        match self.proof.len() - self.cursor {
            0 => Ok(()),
            extra => Err(ProofError::TrailingBytes(extra)),
        }
    }
}

fn decode_scalar(bytes: &[u8]) -> Result<Fr, ProofError> {
    let mut word = [0u8; FR_SIZE];
    word.copy_from_slice(bytes);
    fr_from_bytes(&word).ok_or(ProofError::InvalidScalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_u64;
    use ark_ec::AffineRepr;
    use ark_ff::Zero;

    #[test]
    fn test_transcript_deterministic() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb("msg", b"hello");
        t2.absorb("msg", b"hello");

        assert_eq!(t1.challenge("c"), t2.challenge("c"));
    }

    #[test]
    fn test_transcript_different_inputs() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb("msg", b"hello");
        t2.absorb("msg", b"world");

        assert_ne!(t1.challenge("c"), t2.challenge("c"));
    }

    #[test]
    fn test_labels_are_bound() {
        let mut t1 = Transcript::new();
        let mut t2 = Transcript::new();

        t1.absorb("a", b"payload");
        t2.absorb("b", b"payload");
        assert_ne!(t1.challenge("c"), t2.challenge("c"));

        let mut t3 = Transcript::new();
        let mut t4 = Transcript::new();
        assert_ne!(t3.challenge("alpha"), t4.challenge("beta"));
    }

    #[test]
    fn test_challenges_chain() {
        let mut t = Transcript::new();
        t.absorb("msg", b"x");
        let c1 = t.challenge("c");
        let c2 = t.challenge("c");
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_challenge_split_is_128_bits() {
        let mut t = Transcript::new();
        t.absorb("msg", b"test");

        let (lower, upper) = t.challenge_split("c");
        assert!(fr_to_bytes(&lower)[..16].iter().all(|&b| b == 0));
        assert!(fr_to_bytes(&upper)[..16].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_keccak_empty_vector() {
        // Raw Keccak256 of the empty string, the seed of every transcript
        let digest = Keccak256::digest(b"");
        assert_eq!(
            digest.as_slice(),
            &hex_literal::hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")[..]
        );
    }

    #[test]
    fn test_prover_verifier_agree() {
        let mut prover = ProverTranscript::new();
        prover.send_u64("size", 8);
        prover.send_scalar("x", &fr_from_u64(42));
        prover.send_g1("C", &G1::generator());
        prover.send_scalars("evals", &[fr_from_u64(1), fr_from_u64(2)]);
        let prover_challenge = prover.challenge("alpha");
        let proof = prover.export_proof();
        assert_eq!(proof.len(), 32 + 32 + 64 + 64);

        let mut verifier = VerifierTranscript::new(&proof);
        assert_eq!(verifier.receive_u64("size").unwrap(), 8);
        assert_eq!(verifier.receive_scalar("x").unwrap(), fr_from_u64(42));
        assert_eq!(verifier.receive_g1("C").unwrap(), G1::generator());
        assert_eq!(
            verifier.receive_scalars("evals", 2).unwrap(),
            vec![fr_from_u64(1), fr_from_u64(2)]
        );
        assert_eq!(verifier.challenge("alpha"), prover_challenge);
        assert!(verifier.finish().is_ok());
    }

    #[test]
    fn test_truncated_read_fails() {
        let mut prover = ProverTranscript::new();
        prover.send_scalar("x", &Fr::zero());
        let proof = prover.export_proof();

        let mut verifier = VerifierTranscript::new(&proof[..31]);
        assert!(matches!(
            verifier.receive_scalar("x"),
            Err(ProofError::Truncated { needed: 32, remaining: 31, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_fail() {
        let proof = [0u8; 40];
        let mut verifier = VerifierTranscript::new(&proof);
        verifier.receive_scalar("x").unwrap();
        assert!(matches!(verifier.finish(), Err(ProofError::TrailingBytes(8))));
    }

    #[test]
    fn test_non_canonical_scalar_rejected() {
        let proof = [0xffu8; 32];
        let mut verifier = VerifierTranscript::new(&proof);
        assert!(matches!(
            verifier.receive_scalar("x"),
            Err(ProofError::InvalidScalar)
        ));
    }
}
