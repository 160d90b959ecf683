//! Log-derivative table lookup
//!
//! A lookup row (`q_lookup = 1`) reads the tuple `(w_l, w_r, w_o, q_o)`; the table is the
//! four `table_k` columns. Both sides are compressed with powers of eta:
//!
//! ```text
//! read  = w_l + γ + w_r·η + w_o·η₂ + q_o·η₃
//! write = table_1 + γ + table_2·η + table_3·η₂ + table_4·η₃
//! ```
//!
//! Subrelation 0 pins the inverse column on rows that read or are read from.
//! Subrelation 1 is the log-derivative sum `Σ q_lookup/read − counts/write`, which only
//! vanishes over the whole trace.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::field::fr_from_u64;
use crate::logderiv::{compute_inverses, inverse_exists, LogDerivTerms};
use crate::trace::Trace;
use crate::types::Fr;
use ark_ff::{One, Zero};
use std::collections::HashMap;

pub struct LogDerivLookupRelation;

const TABLE: [Entity; 4] = [Entity::Table1, Entity::Table2, Entity::Table3, Entity::Table4];

/// Tuple a lookup row reads
#[inline]
fn read_tuple(row: &RowValues) -> [Fr; 4] {
    [row[Entity::Wl], row[Entity::Wr], row[Entity::Wo], row[Entity::Qo]]
}

#[inline]
fn table_tuple(row: &RowValues) -> [Fr; 4] {
    TABLE.map(|e| row[e])
}

#[inline]
fn compress(tuple: &[Fr; 4], params: &RelationParameters) -> Fr {
    tuple[0] + params.gamma + tuple[1] * params.eta + tuple[2] * params.eta_two + tuple[3] * params.eta_three
}

/// Read/write terms of the lookup at one row
pub fn lookup_terms(row: &RowValues, params: &RelationParameters) -> LogDerivTerms {
    LogDerivTerms {
        inverse_exists: inverse_exists(&row[Entity::LookupReadTags], &row[Entity::QLookup]),
        read: compress(&read_tuple(row), params),
        write: compress(&table_tuple(row), params),
    }
}

impl Relation for LogDerivLookupRelation {
    const NAME: &'static str = "LogDerivLookup";
    const SUBRELATION_DEGREES: &'static [usize] = &[3, 3];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, false];

    fn accumulate(acc: &mut [Fr], row: &RowValues, params: &RelationParameters, scaling_factor: &Fr) {
        let terms = lookup_terms(row, params);
        let inverses = row[Entity::LookupInverses];

        acc[0] += (terms.read * terms.write * inverses - terms.inverse_exists) * scaling_factor;
        acc[1] += row[Entity::QLookup] * inverses * terms.write
            - row[Entity::LookupReadCounts] * inverses * terms.read;
    }
}

/// How often each table row is read, and the boolean tag marking rows read at least once.
///
/// A tuple present in several table rows is credited to the first of them. A read whose
/// tuple is not in the table credits nothing; the trace-sum subrelation then fails.
pub fn compute_read_counts_and_tags(trace: &Trace) -> (Vec<Fr>, Vec<Fr>) {
    let n = trace.size();
    let mut table_index: HashMap<[Fr; 4], usize> = HashMap::with_capacity(n);
    for i in 0..n {
        let tuple = TABLE.map(|e| trace.get(e, i));
        table_index.entry(tuple).or_insert(i);
    }

    let mut counts = vec![0u64; n];
    let q_lookup = trace.column(Entity::QLookup);
    for (i, q) in q_lookup.iter().enumerate() {
        if q.is_zero() {
            continue;
        }
        let tuple = [
            trace.get(Entity::Wl, i),
            trace.get(Entity::Wr, i),
            trace.get(Entity::Wo, i),
            trace.get(Entity::Qo, i),
        ];
        match table_index.get(&tuple) {
            Some(&t) => counts[t] += 1,
            None => log::debug!("lookup at row {} reads a tuple missing from the table", i),
        }
    }

    let tags = counts
        .iter()
        .map(|&c| if c > 0 { Fr::one() } else { Fr::zero() })
        .collect();
    let counts = counts.into_iter().map(fr_from_u64).collect();
    (counts, tags)
}

/// Inverse column of the table lookup
pub fn compute_lookup_inverses(trace: &Trace, params: &RelationParameters) -> Vec<Fr> {
    compute_inverses(trace, |row| lookup_terms(row, params))
}
