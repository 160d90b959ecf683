//! Log-derivative inverse columns
//!
//! Every log-derivative argument (the table lookup and each bus column) needs a column
//! `I` with `I_i = 1 / (read_i · write_i)` on rows where the inverse is required and zero
//! elsewhere. The products are formed row-parallel and inverted with a single batched
//! inversion.

use crate::entities::RowValues;
use crate::field::batch_inv;
use crate::trace::Trace;
use crate::types::Fr;
use ark_ff::Zero;
use rayon::prelude::*;

/// Terms of one log-derivative argument at one row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogDerivTerms {
    /// `read_selector + read_count - read_selector·read_count`
    pub inverse_exists: Fr,
    pub read: Fr,
    pub write: Fr,
}

/// `a + b - a·b`: nonzero when either boolean flag is set
#[inline]
pub fn inverse_exists(read_selector: &Fr, read_count: &Fr) -> Fr {
    *read_selector + read_count - *read_selector * read_count
}

/// Build the inverse column for one argument.
///
/// `terms` maps a row to that argument's read/write terms. Rows whose `inverse_exists`
/// is zero get a zero inverse.
pub fn compute_inverses<F>(trace: &Trace, terms: F) -> Vec<Fr>
where
    F: Fn(&RowValues) -> LogDerivTerms + Sync,
{
    let mut inverses: Vec<Fr> = (0..trace.size())
        .into_par_iter()
        .map(|i| {
            let t = terms(&trace.row(i));
            if t.inverse_exists.is_zero() {
                Fr::zero()
            } else {
                t.read * t.write
            }
        })
        .collect();
    batch_inv(&mut inverses);
    inverses
}
