//! Sumcheck over the batched relation polynomial
//!
//! The claim is that
//!
//! ```text
//! Σ_i pow(i) · Σ_{s row-local} α^s · sub_s(row_i) + Σ_i Σ_{s trace-sum} α^s · sub_s(row_i) = 0
//! ```
//!
//! where `pow(i) = Π_k g_k^{bit_k(i)}` is the gate separator built from the gate
//! challenges. Each round binds the lowest remaining variable.
//!
//! Algorithm (verifier side):
//! 1. Initialize target = 0, pow_partial = 1
//! 2. For each round r in 0..log_n:
//!    - Check that univariate[0] + univariate[1] == target
//!    - Set target to the univariate evaluated at u_r (barycentric)
//!    - Update pow_partial with the round's gate challenge
//! 3. Batch all subrelations at the claimed evaluations, scaling row-local ones by
//!    pow_partial, and compare against the final target

use crate::entities::{RowValues, NUM_ALL_ENTITIES};
use crate::errors::SumcheckError;
use crate::field::{fr_from_u64, powers, weighted_sum};
use crate::polynomial::fold_in_place;
use crate::relations::{
    accumulate_all, evaluate_subrelations, RelationParameters,
    SubrelationLayout, BATCHED_RELATION_PARTIAL_LENGTH, MAX_PARTIAL_RELATION_LENGTH,
    NUM_SUBRELATIONS,
};
use crate::transcript::{ProverTranscript, VerifierTranscript};
use crate::types::Fr;
use crate::univariate::Univariate;
use ark_ff::{Field, One, Zero};
use rayon::prelude::*;

/// Challenges shared by both sides of the relation check
#[derive(Debug, Clone)]
pub struct SumcheckChallenges {
    pub alpha: Fr,
    pub gate_challenges: Vec<Fr>,
}

impl SumcheckChallenges {
    /// Gate challenges are `g, g^2, g^4, ...`, one per round
    pub fn new(alpha: Fr, gate_challenge: Fr, log_n: usize) -> Self {
        let mut gate_challenges = Vec::with_capacity(log_n);
        let mut g = gate_challenge;
        for _ in 0..log_n {
            gate_challenges.push(g);
            g.square_in_place();
        }
        Self {
            alpha,
            gate_challenges,
        }
    }

    /// `[1, α, α², ...]`, one weight per subrelation
    pub fn alpha_powers(&self) -> Vec<Fr> {
        powers(&self.alpha, NUM_SUBRELATIONS)
    }
}

/// What a finished sumcheck leaves behind: the random point and the entity claims there
#[derive(Debug, Clone)]
pub struct SumcheckOutput {
    pub challenges: Vec<Fr>,
    pub claimed_evaluations: Vec<Fr>,
}

/// `pow(i)` for every row
fn gate_separator_table(gate_challenges: &[Fr]) -> Vec<Fr> {
    let mut table = Vec::with_capacity(1 << gate_challenges.len());
    table.push(Fr::one());
    for g in gate_challenges {
        let len = table.len();
        for i in 0..len {
            let v = table[i] * g;
            table.push(v);
        }
    }
    table
}

/// `pow_partial · (1 + u·(g − 1))`
#[inline]
pub fn update_pow(pow: &Fr, gate_challenge: &Fr, chi: &Fr) -> Fr {
    *pow * (Fr::one() + *chi * (*gate_challenge - Fr::one()))
}

#[inline]
fn check_round_sum(univariate: &[Fr], target: &Fr) -> bool {
    univariate[0] + univariate[1] == *target
}

/// Prover state for one sumcheck run
pub struct SumcheckProver<'a> {
    polynomials: Vec<Vec<Fr>>,
    params: &'a RelationParameters,
    challenges: &'a SumcheckChallenges,
    alpha_powers: Vec<Fr>,
    pow_table: Vec<Fr>,
    layout: SubrelationLayout,
}

impl<'a> SumcheckProver<'a> {
    /// `polynomials` are the full entity columns in [`Entity`](crate::entities::Entity) order
    pub fn new(
        polynomials: Vec<Vec<Fr>>,
        params: &'a RelationParameters,
        challenges: &'a SumcheckChallenges,
    ) -> Self {
        debug_assert_eq!(polynomials.len(), NUM_ALL_ENTITIES);
        Self {
            polynomials,
            params,
            alpha_powers: challenges.alpha_powers(),
            pow_table: gate_separator_table(&challenges.gate_challenges),
            challenges,
            layout: SubrelationLayout::new(),
        }
    }

    /// Per-subrelation univariates for one round, each of length `degree + 1`
    fn accumulate_edges(&self, round: usize) -> Vec<Vec<Fr>> {
        let half = self.polynomials[0].len() / 2;
        let periodicity = 1usize << (round + 1);
        let degrees = &self.layout.degrees;
        let zero_acc = || -> Vec<Vec<Fr>> {
            degrees.iter().map(|d| vec![Fr::zero(); d + 1]).collect()
        };

        (0..half)
            .into_par_iter()
            .fold(zero_acc, |mut acc, j| {
                let scaling = self.pow_table[j * periodicity];
                let mut row = RowValues::zero();
                let mut step = RowValues::zero();
                for (e, poly) in self.polynomials.iter().enumerate() {
                    row.as_mut_slice()[e] = poly[2 * j];
                    step.as_mut_slice()[e] = poly[2 * j + 1] - poly[2 * j];
                }

                let mut evals = [Fr::zero(); NUM_SUBRELATIONS];
                for k in 0..MAX_PARTIAL_RELATION_LENGTH {
                    if k > 0 {
                        for (v, d) in row.as_mut_slice().iter_mut().zip(step.as_slice()) {
                            *v += d;
                        }
                    }
                    evals.iter_mut().for_each(|v| *v = Fr::zero());
                    accumulate_all(&mut evals, &row, self.params, &scaling);
                    for (s, sub) in acc.iter_mut().enumerate() {
                        if k < sub.len() {
                            sub[k] += evals[s];
                        }
                    }
                }
                acc
            })
            .reduce(zero_acc, |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    for (p, q) in x.iter_mut().zip(y) {
                        *p += q;
                    }
                }
                a
            })
    }

    /// Round univariate `S_r` on `{0..BATCHED_RELATION_PARTIAL_LENGTH-1}`
    pub fn compute_round_univariate(&self, round: usize, pow_partial: &Fr) -> Univariate {
        let per_subrelation = self.accumulate_edges(round);

        // ((1 - X) + X·g_r)·pow_partial for row-local subrelations
        let g = self.challenges.gate_challenges[round];
        let separator = Univariate::new(
            (0..BATCHED_RELATION_PARTIAL_LENGTH as u64)
                .map(|k| {
                    let x = fr_from_u64(k);
                    ((Fr::one() - x) + x * g) * pow_partial
                })
                .collect(),
        );

        let mut result = Univariate::zero(BATCHED_RELATION_PARTIAL_LENGTH);
        for (s, evals) in per_subrelation.into_iter().enumerate() {
            let mut u = Univariate::new(evals).extend_to(BATCHED_RELATION_PARTIAL_LENGTH);
            u *= self.alpha_powers[s];
            if self.layout.linearly_independent[s] {
                u.mul_pointwise(&separator);
            }
            result += &u;
        }
        result
    }

    /// Run every round, then send the entity evaluations at the final point
    pub fn prove(mut self, transcript: &mut ProverTranscript) -> SumcheckOutput {
        let log_n = self.challenges.gate_challenges.len();
        let mut pow_partial = Fr::one();
        let mut challenges = Vec::with_capacity(log_n);

        for round in 0..log_n {
            let univariate = self.compute_round_univariate(round, &pow_partial);
            transcript.send_scalars(&format!("Sumcheck:univariate_{}", round), univariate.evals());
            let u = transcript.challenge(&format!("Sumcheck:u_{}", round));
            crate::dbg_fr!(format!("u_{}", round), &u);

            self.polynomials
                .par_iter_mut()
                .for_each(|poly| fold_in_place(poly, &u));
            pow_partial = update_pow(&pow_partial, &self.challenges.gate_challenges[round], &u);
            challenges.push(u);
            log::debug!("sumcheck round {} done", round);
        }

        let claimed_evaluations: Vec<Fr> = self.polynomials.iter().map(|p| p[0]).collect();
        transcript.send_scalars("Sumcheck:evaluations", &claimed_evaluations);

        SumcheckOutput {
            challenges,
            claimed_evaluations,
        }
    }
}

/// Verify the sumcheck protocol round by round, then the batched relation at the claimed
/// evaluations.
pub fn verify_sumcheck(
    transcript: &mut VerifierTranscript<'_>,
    params: &RelationParameters,
    challenges: &SumcheckChallenges,
) -> Result<SumcheckOutput, SumcheckError> {
    let log_n = challenges.gate_challenges.len();
    let mut target = Fr::zero();
    let mut pow_partial = Fr::one();
    let mut u_challenges = Vec::with_capacity(log_n);

    for round in 0..log_n {
        let univariate = transcript.receive_scalars(
            &format!("Sumcheck:univariate_{}", round),
            BATCHED_RELATION_PARTIAL_LENGTH,
        )?;
        if !check_round_sum(&univariate, &target) {
            return Err(SumcheckError::RoundSum { round });
        }

        let u = transcript.challenge(&format!("Sumcheck:u_{}", round));
        target = Univariate::new(univariate).evaluate(&u);
        pow_partial = update_pow(&pow_partial, &challenges.gate_challenges[round], &u);
        u_challenges.push(u);
    }

    let claimed_evaluations = transcript.receive_scalars("Sumcheck:evaluations", NUM_ALL_ENTITIES)?;
    let row = RowValues::from_slice(&claimed_evaluations).ok_or(SumcheckError::FinalRelation)?;

    let evals = evaluate_subrelations(&row, params, &pow_partial);
    let batched = weighted_sum(&evals, &challenges.alpha_powers());
    crate::dbg_fr!("batched relation", &batched);
    crate::dbg_fr!("final target", &target);
    if batched != target {
        return Err(SumcheckError::FinalRelation);
    }

    Ok(SumcheckOutput {
        challenges: u_challenges,
        claimed_evaluations,
    })
}
