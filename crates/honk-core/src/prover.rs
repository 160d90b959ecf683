//! Prover orchestration
//!
//! The proof is produced in seven transcript rounds:
//! 1. Preamble: vk hash (absorbed only), circuit metadata and public inputs
//! 2. Wire commitments
//! 3. eta challenges, lookup read counts/tags, `w_4`
//! 4. beta/gamma, the three log-derivative inverse columns
//! 5. The permutation grand product
//! 6. alpha, gate challenges and sumcheck
//! 7. rho and the two batched openings (unshifted and shifted claims)

use crate::entities::{
    Entity, DERIVED_ROUND, INVERSE_ROUND, NUM_ALL_ENTITIES, NUM_UNSHIFTED_ENTITIES, TO_BE_SHIFTED,
    WIRE_ROUND,
};
use crate::errors::{PcsError, ProveError};
use crate::field::{powers, weighted_sum};
use crate::key::ProvingKey;
use crate::pcs::{CommitmentScheme, OpeningWitness};
use crate::polynomial::{eq_evals, shifted_weights};
use crate::relations::databus::{compute_bus_inverses, BusColumn};
use crate::relations::logderiv_lookup::{compute_lookup_inverses, compute_read_counts_and_tags};
use crate::relations::permutation::{compute_grand_product, compute_public_input_delta};
use crate::relations::RelationParameters;
use crate::sumcheck::{SumcheckChallenges, SumcheckOutput, SumcheckProver};
use crate::transcript::ProverTranscript;
use crate::types::{Fr, G1};
use ark_ff::Zero;
use rayon::prelude::*;

/// Transcript label of a committed column
pub(crate) fn commitment_label(entity: Entity) -> String {
    entity.name().to_uppercase()
}

/// One proving session. Consumed by [`Prover::prove`].
pub struct Prover<'a, C: CommitmentScheme> {
    scheme: &'a C,
    key: ProvingKey,
    vk_hash: Fr,
    transcript: ProverTranscript,
    params: RelationParameters,
}

impl<'a, C: CommitmentScheme> Prover<'a, C> {
    /// Commits to the precomputed columns to bind the verification key into the transcript
    pub fn new(key: ProvingKey, scheme: &'a C) -> Result<Self, ProveError> {
        let vk = key.verification_key(scheme)?;
        Ok(Self {
            scheme,
            key,
            vk_hash: vk.hash(),
            transcript: ProverTranscript::new(),
            params: RelationParameters::default(),
        })
    }

    fn commit_and_send(&mut self, entities: &[Entity]) -> Result<(), PcsError> {
        let trace = &self.key.trace;
        let scheme = self.scheme;
        let commitments = entities
            .par_iter()
            .map(|e| scheme.commit(trace.column(*e)))
            .collect::<Result<Vec<G1>, PcsError>>()?;
        for (entity, commitment) in entities.iter().zip(commitments.iter()) {
            self.transcript.send_g1(&commitment_label(*entity), commitment);
        }
        Ok(())
    }

    fn execute_preamble_round(&mut self) {
        self.transcript.add_to_hash_buffer("vk_hash", &self.vk_hash);
        self.transcript.send_u64("circuit_size", self.key.trace.size() as u64);
        self.transcript
            .send_u64("public_input_size", self.key.public_inputs.len() as u64);
        self.transcript
            .send_u64("pub_inputs_offset", self.key.pub_inputs_offset as u64);
        for (i, pi) in self.key.public_inputs.iter().enumerate() {
            self.transcript.send_scalar(&format!("public_input_{}", i), pi);
        }
    }

    fn execute_wire_commitments_round(&mut self) -> Result<(), PcsError> {
        self.commit_and_send(&WIRE_ROUND)
    }

    /// Derive lookup read counts and tags, then commit them together with `w_4`
    fn execute_derived_columns_round(&mut self) -> Result<(), ProveError> {
        let (eta, eta_two) = self.transcript.challenge_split("eta");
        let eta_three = self.transcript.challenge("eta_three");
        self.params.eta = eta;
        self.params.eta_two = eta_two;
        self.params.eta_three = eta_three;

        let (counts, tags) = compute_read_counts_and_tags(&self.key.trace);
        self.key.trace.set_column(Entity::LookupReadCounts, counts)?;
        self.key.trace.set_column(Entity::LookupReadTags, tags)?;

        self.commit_and_send(&DERIVED_ROUND)?;
        Ok(())
    }

    fn execute_log_derivative_round(&mut self) -> Result<(), ProveError> {
        let (beta, gamma) = self.transcript.challenge_split("beta_gamma");
        self.params.beta = beta;
        self.params.gamma = gamma;

        let lookup_inverses = compute_lookup_inverses(&self.key.trace, &self.params);
        self.key.trace.set_column(Entity::LookupInverses, lookup_inverses)?;
        for column in BusColumn::ALL {
            let inverses = compute_bus_inverses(&self.key.trace, &self.params, column);
            self.key.trace.set_column(column.inverses(), inverses)?;
        }

        self.commit_and_send(&INVERSE_ROUND)?;
        Ok(())
    }

    fn execute_grand_product_round(&mut self) -> Result<(), ProveError> {
        self.params.public_input_delta = compute_public_input_delta(
            &self.key.public_inputs,
            &self.params.beta,
            &self.params.gamma,
            self.key.pub_inputs_offset as u64,
        );
        let z_perm = compute_grand_product(&self.key.trace, &self.params);
        self.key.trace.set_column(Entity::ZPerm, z_perm)?;

        #[cfg(feature = "debug")]
        if let Err(failure) = crate::diagnostics::check_trace(&self.key.trace, &self.params) {
            log::warn!("trace does not satisfy the relations: {}", failure);
        }

        self.commit_and_send(&[Entity::ZPerm])?;
        Ok(())
    }

    fn execute_relation_check_rounds(&mut self) -> SumcheckOutput {
        let alpha = self.transcript.challenge("alpha");
        let gate_challenge = self.transcript.challenge("gate_challenge");
        let challenges = SumcheckChallenges::new(
            alpha,
            gate_challenge,
            self.key.trace.log_size() as usize,
        );
        SumcheckProver::new(self.key.trace.full_polynomials(), &self.params, &challenges)
            .prove(&mut self.transcript)
    }

    /// Batch all claims with powers of rho and open the two batched columns
    fn execute_opening_round(&mut self, sumcheck: &SumcheckOutput) -> Result<(), PcsError> {
        let rho = self.transcript.challenge("rho");
        let rho_powers = powers(&rho, NUM_ALL_ENTITIES);
        let evals = &sumcheck.claimed_evaluations;

        let eq = eq_evals(&sumcheck.challenges);
        let trace = &self.key.trace;

        let unshifted: Vec<Entity> = Entity::unshifted_entities().collect();
        let unshifted_witness = OpeningWitness {
            column: batch_columns(trace, &unshifted, &rho_powers[..NUM_UNSHIFTED_ENTITIES]),
            value: weighted_sum(&evals[..NUM_UNSHIFTED_ENTITIES], &rho_powers[..NUM_UNSHIFTED_ENTITIES]),
            weights: eq.clone(),
        };

        let shifted_witness = OpeningWitness {
            column: batch_columns(trace, &TO_BE_SHIFTED, &rho_powers[NUM_UNSHIFTED_ENTITIES..]),
            value: weighted_sum(&evals[NUM_UNSHIFTED_ENTITIES..], &rho_powers[NUM_UNSHIFTED_ENTITIES..]),
            weights: shifted_weights(&eq),
        };

        self.scheme.open(&unshifted_witness, &mut self.transcript)?;
        self.scheme.open(&shifted_witness, &mut self.transcript)?;
        Ok(())
    }

    pub fn prove(mut self) -> Result<Vec<u8>, ProveError> {
        log::info!(
            "proving circuit of size {} with {} public inputs",
            self.key.trace.size(),
            self.key.public_inputs.len()
        );

        self.execute_preamble_round();
        self.execute_wire_commitments_round()?;
        self.execute_derived_columns_round()?;
        self.execute_log_derivative_round()?;
        self.execute_grand_product_round()?;
        let sumcheck = self.execute_relation_check_rounds();
        self.execute_opening_round(&sumcheck)?;

        let proof = self.transcript.export_proof();
        log::info!("proof generated: {} bytes", proof.len());
        Ok(proof)
    }
}

/// `Σ_k weights[k] · column(entities[k])`, row by row
fn batch_columns(trace: &crate::trace::Trace, entities: &[Entity], weights: &[Fr]) -> Vec<Fr> {
    (0..trace.size())
        .into_par_iter()
        .map(|row| {
            entities
                .iter()
                .zip(weights)
                .fold(Fr::zero(), |acc, (e, w)| acc + trace.get(*e, row) * w)
        })
        .collect()
}

/// Prove with a fresh session
pub fn prove<C: CommitmentScheme>(key: ProvingKey, scheme: &C) -> Result<Vec<u8>, ProveError> {
    Prover::new(key, scheme)?.prove()
}
