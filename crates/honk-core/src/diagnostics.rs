//! Trace diagnostics
//!
//! Evaluates every subrelation directly on a filled trace and names the first one that
//! fails. Row-local subrelations are checked row by row; trace-sum subrelations are
//! checked on their total. This never feeds the verifier's decision.

use crate::relations::{evaluate_subrelations, RelationKind, RelationParameters, NUM_SUBRELATIONS};
use crate::trace::Trace;
use crate::types::Fr;
use ark_ff::{One, Zero};
use rayon::prelude::*;
use thiserror::Error;

/// First failing subrelation of a trace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{relation} subrelation {subrelation} fails {}", location(.row))]
pub struct RelationFailure {
    pub relation: &'static str,
    /// Index within the relation
    pub subrelation: usize,
    /// `None` for trace-sum subrelations
    pub row: Option<usize>,
}

fn location(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!("at row {}", r),
        None => "over the trace sum".to_string(),
    }
}

pub fn check_trace(trace: &Trace, params: &RelationParameters) -> Result<(), RelationFailure> {
    let one = Fr::one();
    let rows: Vec<Vec<Fr>> = (0..trace.size())
        .into_par_iter()
        .map(|i| evaluate_subrelations(&trace.row(i), params, &one))
        .collect();

    let mut sums = [Fr::zero(); NUM_SUBRELATIONS];
    for (i, evals) in rows.iter().enumerate() {
        for kind in RelationKind::ALL {
            let independent = kind.linearly_independent();
            for (subrelation, s) in kind.subrelation_range().enumerate() {
                if !independent[subrelation] {
                    sums[s] += evals[s];
                } else if !evals[s].is_zero() {
                    return Err(RelationFailure {
                        relation: kind.name(),
                        subrelation,
                        row: Some(i),
                    });
                }
            }
        }
    }

    for kind in RelationKind::ALL {
        let independent = kind.linearly_independent();
        for (subrelation, s) in kind.subrelation_range().enumerate() {
            if !independent[subrelation] && !sums[s].is_zero() {
                return Err(RelationFailure {
                    relation: kind.name(),
                    subrelation,
                    row: None,
                });
            }
        }
    }
    Ok(())
}
