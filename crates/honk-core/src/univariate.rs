//! Univariates in evaluation form over the domain `{0, 1, ..., len - 1}`

use crate::field::{batch_inv, fr_from_u64};
use crate::types::Fr;
use ark_ff::{One, Zero};
use std::ops::{AddAssign, MulAssign};

#[derive(Clone, Debug, PartialEq)]
pub struct Univariate {
    evals: Vec<Fr>,
}

impl Univariate {
    pub fn new(evals: Vec<Fr>) -> Self {
        Self { evals }
    }

    pub fn zero(len: usize) -> Self {
        Self {
            evals: vec![Fr::zero(); len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.evals.is_empty()
    }

    pub fn evals(&self) -> &[Fr] {
        &self.evals
    }

    pub fn into_evals(self) -> Vec<Fr> {
        self.evals
    }

    /// Extrapolate to `len` points. The polynomial through the current points (degree
    /// below the current length) is evaluated at the new domain points.
    pub fn extend_to(&self, len: usize) -> Univariate {
        let mut evals = self.evals.clone();
        if len <= evals.len() {
            evals.truncate(len);
            return Univariate { evals };
        }
        for k in self.evals.len()..len {
            evals.push(self.evaluate(&fr_from_u64(k as u64)));
        }
        Univariate { evals }
    }

    /// Evaluate at an arbitrary point by barycentric interpolation.
    ///
    /// `p(χ) = B(χ) · Σ_i p(i) / (d_i · (χ − i))` with `B(χ) = Π_i (χ − i)` and
    /// `d_i = Π_{j≠i} (i − j)`. Points on the domain return the stored value.
    pub fn evaluate(&self, chi: &Fr) -> Fr {
        let n = self.evals.len();
        let domain: Vec<Fr> = (0..n as u64).map(fr_from_u64).collect();
        if let Some(i) = domain.iter().position(|x| x == chi) {
            return self.evals[i];
        }

        let mut b = Fr::one();
        let mut denominators = Vec::with_capacity(n);
        for (i, xi) in domain.iter().enumerate() {
            let chi_minus = *chi - xi;
            b *= chi_minus;
            denominators.push(barycentric_weight(i, n) * chi_minus);
        }
        batch_inv(&mut denominators);

        let sum = self
            .evals
            .iter()
            .zip(denominators.iter())
            .fold(Fr::zero(), |acc, (e, d)| acc + *e * d);
        b * sum
    }

    /// Pointwise product with another univariate of the same length
    pub fn mul_pointwise(&mut self, other: &Univariate) {
        debug_assert_eq!(self.len(), other.len());
        for (a, b) in self.evals.iter_mut().zip(other.evals.iter()) {
            *a *= b;
        }
    }
}

/// `d_i = Π_{j≠i} (i − j)` over the domain `{0..n-1}`, i.e. `(-1)^(n-1-i) · i! · (n-1-i)!`
fn barycentric_weight(i: usize, n: usize) -> Fr {
    let mut w = Fr::one();
    for j in 0..n {
        if j != i {
            w *= fr_from_u64(i as u64) - fr_from_u64(j as u64);
        }
    }
    w
}

impl AddAssign<&Univariate> for Univariate {
    fn add_assign(&mut self, rhs: &Univariate) {
        debug_assert_eq!(self.len(), rhs.len());
        for (a, b) in self.evals.iter_mut().zip(rhs.evals.iter()) {
            *a += b;
        }
    }
}

impl MulAssign<Fr> for Univariate {
    fn mul_assign(&mut self, rhs: Fr) {
        for a in self.evals.iter_mut() {
            *a *= rhs;
        }
    }
}
