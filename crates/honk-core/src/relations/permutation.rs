//! Permutation argument over the four wires
//!
//! Copy constraints are encoded as a grand product `z_perm` of
//! `Π_k (w_k + id_k·β + γ) / Π_k (w_k + sigma_k·β + γ)`. Public input cells are taken out
//! of their copy cycles, which leaves `public_input_delta` as the value the product
//! must reach on the last row.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::field::{batch_inv, fr_from_u64};
use crate::trace::Trace;
use crate::types::Fr;
use ark_ff::{Field, One, Zero};
use rayon::prelude::*;

pub struct PermutationRelation;

const WIRES: [Entity; 4] = [Entity::Wl, Entity::Wr, Entity::Wo, Entity::W4];
const IDS: [Entity; 4] = [Entity::Id1, Entity::Id2, Entity::Id3, Entity::Id4];
const SIGMAS: [Entity; 4] = [Entity::Sigma1, Entity::Sigma2, Entity::Sigma3, Entity::Sigma4];

/// Numerator and denominator of the grand-product factor at one row
fn row_factors(row: &RowValues, beta: &Fr, gamma: &Fr) -> (Fr, Fr) {
    let mut num = Fr::one();
    let mut den = Fr::one();
    for k in 0..4 {
        let w = row[WIRES[k]];
        num *= w + row[IDS[k]] * beta + gamma;
        den *= w + row[SIGMAS[k]] * beta + gamma;
    }
    (num, den)
}

impl Relation for PermutationRelation {
    const NAME: &'static str = "Permutation";
    const SUBRELATION_DEGREES: &'static [usize] = &[5, 2];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, true];

    fn accumulate(acc: &mut [Fr], row: &RowValues, params: &RelationParameters, scaling_factor: &Fr) {
        let (num, den) = row_factors(row, &params.beta, &params.gamma);

        let lhs = (row[Entity::ZPerm] + row[Entity::LagrangeFirst]) * num;
        let rhs = (row[Entity::ZPermShift] + row[Entity::LagrangeLast] * params.public_input_delta) * den;
        acc[0] += (lhs - rhs) * scaling_factor;

        acc[1] += row[Entity::LagrangeLast] * row[Entity::ZPermShift] * scaling_factor;
    }
}

/// Value the grand product reaches over the whole trace.
///
/// Public input `j` sits in `w_l` at row `offset + j` with `sigma_1 = -(offset + j + 1)`.
pub fn compute_public_input_delta(public_inputs: &[Fr], beta: &Fr, gamma: &Fr, offset: u64) -> Fr {
    let mut numerator = Fr::one();
    let mut denominator = Fr::one();

    let mut numerator_acc = *gamma + *beta * fr_from_u64(offset);
    let mut denominator_acc = *gamma - *beta * fr_from_u64(offset + 1);

    for pi in public_inputs {
        numerator *= numerator_acc + pi;
        denominator *= denominator_acc + pi;
        numerator_acc += beta;
        denominator_acc -= beta;
    }

    crate::dbg_fr!("public_input_delta numerator", &numerator);
    crate::dbg_fr!("public_input_delta denominator", &denominator);

    // A zero denominator means gamma collided with a public input; the proof will not verify
    numerator * denominator.inverse().unwrap_or_default()
}

/// Grand product column: `z[0] = 0`, `z[i + 1] = Π_{k <= i} num_k / den_k`
pub fn compute_grand_product(trace: &Trace, params: &RelationParameters) -> Vec<Fr> {
    let n = trace.size();
    let (nums, mut dens): (Vec<Fr>, Vec<Fr>) = (0..n)
        .into_par_iter()
        .map(|i| row_factors(&trace.row(i), &params.beta, &params.gamma))
        .unzip();
    batch_inv(&mut dens);

    let mut z = vec![Fr::zero(); n];
    let mut running = Fr::one();
    for i in 0..n - 1 {
        running *= nums[i] * dens[i];
        z[i + 1] = running;
    }
    crate::trace!("grand product over {} rows", n);
    z
}
