//! Relation framework
//!
//! A relation is a family of polynomial identities (subrelations) over one row and its
//! shift. Each subrelation declares a degree bound and whether it is row-local (must
//! vanish at every row, scaled by the per-row scaling factor) or globally linear (only
//! its sum over the whole trace must vanish, never scaled).
//!
//! The relation set is closed: [`RelationKind::ALL`] lists it in accumulation order and
//! the subrelation index space is the concatenation of each relation's subrelations.
//!
//! | relation        | subrelations | degrees    |
//! |-----------------|--------------|------------|
//! | Arithmetic      | 0-1          | 5, 4       |
//! | Permutation     | 2-3          | 5, 2       |
//! | LogDerivLookup  | 4-5          | 3, 3       |
//! | DeltaRange      | 6-9          | 5, 5, 5, 5 |
//! | Elliptic        | 10-11        | 5, 5       |
//! | Databus         | 12-15        | 3, 4, 3, 4 |

pub mod arithmetic;
pub mod databus;
pub mod delta_range;
pub mod elliptic;
pub mod logderiv_lookup;
pub mod permutation;

use crate::entities::RowValues;
use crate::types::Fr;
use ark_ff::Zero;
use std::ops::Range;

pub use arithmetic::ArithmeticRelation;
pub use databus::{BusColumn, DatabusLookupRelation};
pub use delta_range::DeltaRangeRelation;
pub use elliptic::EllipticRelation;
pub use logderiv_lookup::LogDerivLookupRelation;
pub use permutation::PermutationRelation;

/// Relation parameters for constraint evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationParameters {
    pub eta: Fr,
    pub eta_two: Fr,
    pub eta_three: Fr,
    pub beta: Fr,
    pub gamma: Fr,
    pub public_input_delta: Fr,
}

/// Capability every relation implements
pub trait Relation {
    const NAME: &'static str;

    /// Degree bound of each subrelation (as a polynomial in the row values, including
    /// the scaling factor's contribution of zero degree)
    const SUBRELATION_DEGREES: &'static [usize];

    /// `true` for row-local subrelations, `false` for trace-sum ones
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool];

    fn subrelation_count() -> usize {
        Self::SUBRELATION_DEGREES.len()
    }

    fn degree_bounds() -> &'static [usize] {
        Self::SUBRELATION_DEGREES
    }

    /// Add this row's contribution into `acc` (one slot per subrelation)
    fn accumulate(acc: &mut [Fr], row: &RowValues, params: &RelationParameters, scaling_factor: &Fr);
}

/// Total number of subrelations across the relation set
pub const NUM_SUBRELATIONS: usize = ArithmeticRelation::SUBRELATION_DEGREES.len()
    + PermutationRelation::SUBRELATION_DEGREES.len()
    + LogDerivLookupRelation::SUBRELATION_DEGREES.len()
    + DeltaRangeRelation::SUBRELATION_DEGREES.len()
    + EllipticRelation::SUBRELATION_DEGREES.len()
    + DatabusLookupRelation::SUBRELATION_DEGREES.len();

/// Highest declared subrelation degree
pub const MAX_SUBRELATION_DEGREE: usize = {
    let tables: [&[usize]; 6] = [
        ArithmeticRelation::SUBRELATION_DEGREES,
        PermutationRelation::SUBRELATION_DEGREES,
        LogDerivLookupRelation::SUBRELATION_DEGREES,
        DeltaRangeRelation::SUBRELATION_DEGREES,
        EllipticRelation::SUBRELATION_DEGREES,
        DatabusLookupRelation::SUBRELATION_DEGREES,
    ];
    let mut max = 0;
    let mut t = 0;
    while t < tables.len() {
        let mut i = 0;
        while i < tables[t].len() {
            if tables[t][i] > max {
                max = tables[t][i];
            }
            i += 1;
        }
        t += 1;
    }
    max
};

/// Points needed to pin down any single subrelation on one edge
pub const MAX_PARTIAL_RELATION_LENGTH: usize = MAX_SUBRELATION_DEGREE + 1;

/// Points per sumcheck round univariate (one more degree for the gate separator)
pub const BATCHED_RELATION_PARTIAL_LENGTH: usize = MAX_SUBRELATION_DEGREE + 2;

/// The closed set of relations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Arithmetic,
    Permutation,
    LogDerivLookup,
    DeltaRange,
    Elliptic,
    Databus,
}

impl RelationKind {
    /// Accumulation order; fixes the subrelation index space
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Arithmetic,
        RelationKind::Permutation,
        RelationKind::LogDerivLookup,
        RelationKind::DeltaRange,
        RelationKind::Elliptic,
        RelationKind::Databus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::NAME,
            RelationKind::Permutation => PermutationRelation::NAME,
            RelationKind::LogDerivLookup => LogDerivLookupRelation::NAME,
            RelationKind::DeltaRange => DeltaRangeRelation::NAME,
            RelationKind::Elliptic => EllipticRelation::NAME,
            RelationKind::Databus => DatabusLookupRelation::NAME,
        }
    }

    pub fn degree_bounds(self) -> &'static [usize] {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::degree_bounds(),
            RelationKind::Permutation => PermutationRelation::degree_bounds(),
            RelationKind::LogDerivLookup => LogDerivLookupRelation::degree_bounds(),
            RelationKind::DeltaRange => DeltaRangeRelation::degree_bounds(),
            RelationKind::Elliptic => EllipticRelation::degree_bounds(),
            RelationKind::Databus => DatabusLookupRelation::degree_bounds(),
        }
    }

    pub fn linearly_independent(self) -> &'static [bool] {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::SUBRELATION_LINEARLY_INDEPENDENT,
            RelationKind::Permutation => PermutationRelation::SUBRELATION_LINEARLY_INDEPENDENT,
            RelationKind::LogDerivLookup => {
                LogDerivLookupRelation::SUBRELATION_LINEARLY_INDEPENDENT
            }
            RelationKind::DeltaRange => DeltaRangeRelation::SUBRELATION_LINEARLY_INDEPENDENT,
            RelationKind::Elliptic => EllipticRelation::SUBRELATION_LINEARLY_INDEPENDENT,
            RelationKind::Databus => DatabusLookupRelation::SUBRELATION_LINEARLY_INDEPENDENT,
        }
    }

    pub fn subrelation_count(self) -> usize {
        self.degree_bounds().len()
    }

    /// Index range of this relation's subrelations in the global layout
    pub fn subrelation_range(self) -> Range<usize> {
        let mut start = 0;
        for kind in RelationKind::ALL {
            if kind == self {
                break;
            }
            start += kind.subrelation_count();
        }
        start..start + self.subrelation_count()
    }

    /// Dispatch to the relation's accumulate; `acc` is this relation's slice
    pub fn accumulate(
        self,
        acc: &mut [Fr],
        row: &RowValues,
        params: &RelationParameters,
        scaling_factor: &Fr,
    ) {
        match self {
            RelationKind::Arithmetic => {
                ArithmeticRelation::accumulate(acc, row, params, scaling_factor)
            }
            RelationKind::Permutation => {
                PermutationRelation::accumulate(acc, row, params, scaling_factor)
            }
            RelationKind::LogDerivLookup => {
                LogDerivLookupRelation::accumulate(acc, row, params, scaling_factor)
            }
            RelationKind::DeltaRange => {
                DeltaRangeRelation::accumulate(acc, row, params, scaling_factor)
            }
            RelationKind::Elliptic => {
                EllipticRelation::accumulate(acc, row, params, scaling_factor)
            }
            RelationKind::Databus => {
                DatabusLookupRelation::accumulate(acc, row, params, scaling_factor)
            }
        }
    }
}

/// Flattened per-subrelation metadata
#[derive(Clone, Debug)]
pub struct SubrelationLayout {
    pub degrees: Vec<usize>,
    pub linearly_independent: Vec<bool>,
}

impl SubrelationLayout {
    /// Build the layout, aborting if any relation's tables disagree.
    pub fn new() -> Self {
        let mut degrees = Vec::with_capacity(NUM_SUBRELATIONS);
        let mut linearly_independent = Vec::with_capacity(NUM_SUBRELATIONS);
        for kind in RelationKind::ALL {
            let d = kind.degree_bounds();
            let li = kind.linearly_independent();
            assert_eq!(
                d.len(),
                li.len(),
                "{}: degree table and independence table differ in length",
                kind.name()
            );
            assert!(
                d.iter().all(|&deg| (1..=MAX_SUBRELATION_DEGREE).contains(&deg)),
                "{}: degree bound out of range",
                kind.name()
            );
            degrees.extend_from_slice(d);
            linearly_independent.extend_from_slice(li);
        }
        assert_eq!(degrees.len(), NUM_SUBRELATIONS);
        Self {
            degrees,
            linearly_independent,
        }
    }

    /// Which relation (and local subrelation index) a global index belongs to
    pub fn locate(&self, index: usize) -> Option<(RelationKind, usize)> {
        RelationKind::ALL.into_iter().find_map(|kind| {
            let range = kind.subrelation_range();
            range.contains(&index).then(|| (kind, index - range.start))
        })
    }
}

impl Default for SubrelationLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate every relation at one row into a fresh accumulator
pub fn accumulate_all(
    acc: &mut [Fr],
    row: &RowValues,
    params: &RelationParameters,
    scaling_factor: &Fr,
) {
    debug_assert_eq!(acc.len(), NUM_SUBRELATIONS);
    for kind in RelationKind::ALL {
        let range = kind.subrelation_range();
        kind.accumulate(&mut acc[range], row, params, scaling_factor);
    }
}

/// Evaluate all subrelations at one row
pub fn evaluate_subrelations(row: &RowValues, params: &RelationParameters, scaling_factor: &Fr) -> Vec<Fr> {
    let mut acc = vec![Fr::zero(); NUM_SUBRELATIONS];
    accumulate_all(&mut acc, row, params, scaling_factor);
    acc
}
