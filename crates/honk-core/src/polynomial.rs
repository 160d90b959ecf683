//! Multilinear helpers over the boolean hypercube
//!
//! Row `i` of a column is the point whose coordinate `k` is bit `k` of `i`, so the first
//! sumcheck round binds the lowest bit.

use crate::types::Fr;
use ark_ff::{One, Zero};
use rayon::prelude::*;

/// `eq(u, i) = Π_k (u_k if bit_k(i) else 1 − u_k)` for every row `i`
pub fn eq_evals(u: &[Fr]) -> Vec<Fr> {
    let mut evals = Vec::with_capacity(1 << u.len());
    evals.push(Fr::one());
    for (k, u_k) in u.iter().enumerate() {
        let half = 1 << k;
        evals.resize(2 * half, Fr::zero());
        for i in 0..half {
            let e = evals[i];
            evals[i + half] = e * u_k;
            evals[i] = e - evals[i + half];
        }
    }
    evals
}

/// Weights that evaluate the shift of a column: `b[j] = eq[j − 1]`, `b[0] = 0`
pub fn shifted_weights(eq: &[Fr]) -> Vec<Fr> {
    let mut out = Vec::with_capacity(eq.len());
    out.push(Fr::zero());
    out.extend_from_slice(&eq[..eq.len().saturating_sub(1)]);
    out
}

/// `⟨a, b⟩`
pub fn inner_product(a: &[Fr], b: &[Fr]) -> Fr {
    debug_assert_eq!(a.len(), b.len());
    a.par_iter()
        .zip(b.par_iter())
        .map(|(x, y)| *x * y)
        .reduce(Fr::zero, |acc, v| acc + v)
}

/// Multilinear extension of `column` at `u`
pub fn mle_evaluate(column: &[Fr], u: &[Fr]) -> Fr {
    inner_product(column, &eq_evals(u))
}

/// Bind the lowest variable to `challenge`: `p[j] = p[2j] + challenge·(p[2j+1] − p[2j])`
pub fn fold_in_place(poly: &mut Vec<Fr>, challenge: &Fr) {
    let half = poly.len() / 2;
    for j in 0..half {
        let lo = poly[2 * j];
        let hi = poly[2 * j + 1];
        poly[j] = lo + *challenge * (hi - lo);
    }
    poly.truncate(half);
}
