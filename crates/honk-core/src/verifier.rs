//! Verifier orchestration
//!
//! Mirrors the prover's rounds on a [`VerifierTranscript`]. Malformed input (wrong proof
//! size, bad encodings, wrong public input count) is an `Err`; a well-formed proof that
//! fails any check returns `Ok(false)`.

use crate::entities::{
    Entity, DERIVED_ROUND, INVERSE_ROUND, NUM_ALL_ENTITIES, NUM_UNSHIFTED_ENTITIES, TO_BE_SHIFTED,
    WIRE_ROUND,
};
use crate::errors::{PcsError, SumcheckError, VerifyError};
use crate::field::{powers, weighted_sum};
use crate::key::VerificationKey;
use crate::ops::g1_msm;
use crate::pcs::{CommitmentScheme, OpeningClaim};
use crate::polynomial::{eq_evals, shifted_weights};
use crate::proof::ProofLayout;
use crate::prover::commitment_label;
use crate::relations::permutation::compute_public_input_delta;
use crate::relations::RelationParameters;
use crate::sumcheck::{verify_sumcheck, SumcheckChallenges, SumcheckOutput};
use crate::transcript::VerifierTranscript;
use crate::types::{Fr, G1};
use ark_ec::AffineRepr;

/// Challenges derived before sumcheck
#[derive(Debug, Clone)]
pub struct Challenges {
    pub relation_parameters: RelationParameters,
    pub sumcheck: SumcheckChallenges,
}

/// Verify a proof against a verification key and the expected public inputs.
pub fn verify<C: CommitmentScheme>(
    vk: &VerificationKey,
    proof: &[u8],
    public_inputs: &[Fr],
    scheme: &C,
) -> Result<bool, VerifyError> {
    if public_inputs.len() as u64 != vk.num_public_inputs {
        return Err(VerifyError::PublicInput(format!(
            "expected {} public inputs, got {}",
            vk.num_public_inputs,
            public_inputs.len()
        )));
    }

    let layout = ProofLayout::new(vk.log_circuit_size as usize, public_inputs.len());
    layout.check(proof)?;

    let requested = vk.circuit_size() as usize;
    if requested > scheme.max_size() {
        return Err(PcsError::SetupTooSmall {
            available: scheme.max_size(),
            requested,
        }
        .into());
    }

    log::info!(
        "verifying proof of {} bytes for circuit of size {}",
        proof.len(),
        vk.circuit_size()
    );

    let verified = verify_inner(vk, proof, public_inputs, scheme)?;
    log::info!("verification result: {}", verified);
    Ok(verified)
}

fn verify_inner<C: CommitmentScheme>(
    vk: &VerificationKey,
    proof: &[u8],
    public_inputs: &[Fr],
    scheme: &C,
) -> Result<bool, VerifyError> {
    let mut transcript = VerifierTranscript::new(proof);

    // Step 1: Preamble
    if !receive_preamble(&mut transcript, vk, public_inputs)? {
        return Ok(false);
    }

    // Step 2: Witness commitments and the challenges that depend on them
    let mut commitments = vec![G1::identity(); NUM_UNSHIFTED_ENTITIES];
    commitments[..vk.commitments.len()].copy_from_slice(&vk.commitments);
    let challenges = receive_commitments(&mut transcript, vk, public_inputs, &mut commitments)?;

    // Step 3: Sumcheck
    let sumcheck = match verify_sumcheck(
        &mut transcript,
        &challenges.relation_parameters,
        &challenges.sumcheck,
    ) {
        Ok(output) => output,
        Err(SumcheckError::Proof(e)) => return Err(e.into()),
        Err(e) => {
            log::warn!("sumcheck failed: {}", e);
            return Ok(false);
        }
    };
    log::debug!("sumcheck passed");

    // Step 4: Batched openings
    let verified = verify_openings(&mut transcript, scheme, &commitments, &sumcheck)?;
    transcript.finish()?;
    Ok(verified)
}

fn receive_preamble(
    transcript: &mut VerifierTranscript<'_>,
    vk: &VerificationKey,
    public_inputs: &[Fr],
) -> Result<bool, VerifyError> {
    transcript.add_to_hash_buffer("vk_hash", &vk.hash());
    let circuit_size = transcript.receive_u64("circuit_size")?;
    let num_public_inputs = transcript.receive_u64("public_input_size")?;
    let offset = transcript.receive_u64("pub_inputs_offset")?;
    if circuit_size != vk.circuit_size()
        || num_public_inputs != vk.num_public_inputs
        || offset != vk.pub_inputs_offset
    {
        log::warn!(
            "proof metadata (size {}, {} public inputs at {}) does not match the verification key",
            circuit_size,
            num_public_inputs,
            offset
        );
        return Ok(false);
    }

    for (i, expected) in public_inputs.iter().enumerate() {
        let received = transcript.receive_scalar(&format!("public_input_{}", i))?;
        if received != *expected {
            log::warn!("public input {} does not match", i);
            return Ok(false);
        }
    }
    Ok(true)
}

fn receive_round(
    transcript: &mut VerifierTranscript<'_>,
    entities: &[Entity],
    commitments: &mut [G1],
) -> Result<(), VerifyError> {
    for entity in entities {
        commitments[entity.index()] = transcript.receive_g1(&commitment_label(*entity))?;
    }
    Ok(())
}

/// Read the witness commitments in round order and derive every pre-sumcheck challenge
fn receive_commitments(
    transcript: &mut VerifierTranscript<'_>,
    vk: &VerificationKey,
    public_inputs: &[Fr],
    commitments: &mut [G1],
) -> Result<Challenges, VerifyError> {
    let mut params = RelationParameters::default();

    receive_round(transcript, &WIRE_ROUND, commitments)?;

    let (eta, eta_two) = transcript.challenge_split("eta");
    params.eta = eta;
    params.eta_two = eta_two;
    params.eta_three = transcript.challenge("eta_three");
    crate::dbg_fr!("eta", &params.eta);
    receive_round(transcript, &DERIVED_ROUND, commitments)?;

    let (beta, gamma) = transcript.challenge_split("beta_gamma");
    params.beta = beta;
    params.gamma = gamma;
    crate::dbg_fr!("beta", &params.beta);
    crate::dbg_fr!("gamma", &params.gamma);
    receive_round(transcript, &INVERSE_ROUND, commitments)?;

    params.public_input_delta =
        compute_public_input_delta(public_inputs, &beta, &gamma, vk.pub_inputs_offset);
    receive_round(transcript, &[Entity::ZPerm], commitments)?;

    let alpha = transcript.challenge("alpha");
    let gate_challenge = transcript.challenge("gate_challenge");
    crate::dbg_fr!("alpha", &alpha);
    crate::dbg_fr!("gate_challenge", &gate_challenge);

    Ok(Challenges {
        relation_parameters: params,
        sumcheck: SumcheckChallenges::new(alpha, gate_challenge, vk.log_circuit_size as usize),
    })
}

/// Batch the entity claims with powers of rho and check both openings
fn verify_openings<C: CommitmentScheme>(
    transcript: &mut VerifierTranscript<'_>,
    scheme: &C,
    commitments: &[G1],
    sumcheck: &SumcheckOutput,
) -> Result<bool, VerifyError> {
    let rho = transcript.challenge("rho");
    let rho_powers = powers(&rho, NUM_ALL_ENTITIES);
    let (unshifted_rho, shifted_rho) = rho_powers.split_at(NUM_UNSHIFTED_ENTITIES);
    let evals = &sumcheck.claimed_evaluations;

    let eq = eq_evals(&sumcheck.challenges);

    let unshifted = OpeningClaim {
        commitment: g1_msm(commitments, unshifted_rho),
        value: weighted_sum(&evals[..NUM_UNSHIFTED_ENTITIES], unshifted_rho),
        weights: eq.clone(),
    };

    // Shifted claims open the unshifted source columns at the shifted weights
    let sources: Vec<G1> = TO_BE_SHIFTED
        .iter()
        .map(|e| commitments[e.index()])
        .collect();
    let shifted = OpeningClaim {
        commitment: g1_msm(&sources, shifted_rho),
        value: weighted_sum(&evals[NUM_UNSHIFTED_ENTITIES..], shifted_rho),
        weights: shifted_weights(&eq),
    };

    let unshifted_ok = scheme.verify_open(&unshifted, transcript)?;
    let shifted_ok = scheme.verify_open(&shifted, transcript)?;
    if !unshifted_ok {
        log::warn!("unshifted opening rejected");
    }
    if !shifted_ok {
        log::warn!("shifted opening rejected");
    }
    Ok(unshifted_ok && shifted_ok)
}
