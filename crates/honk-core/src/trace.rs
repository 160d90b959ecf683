//! Column store for one circuit
//!
//! Holds the unshifted columns, each of length `2^log_size`. Derived columns
//! (lookup counts/tags, inverses, grand product) are written by the prover round that
//! owns them; everything else is fixed once the builder hands the trace over.

use crate::entities::{Entity, RowValues, NUM_UNSHIFTED_ENTITIES, SHIFTED, TO_BE_SHIFTED};
use crate::errors::KeyError;
use crate::field::fr_from_u64;
use crate::types::Fr;
use ark_ff::{One, Zero};

/// Smallest supported trace (one sumcheck round)
pub const MIN_LOG_CIRCUIT_SIZE: u32 = 1;

/// Hard cap on the trace size, independent of the commitment setup
pub const MAX_LOG_CIRCUIT_SIZE: u32 = 28;

#[derive(Clone, Debug)]
pub struct Trace {
    log_size: u32,
    columns: Vec<Vec<Fr>>,
}

impl Trace {
    /// Empty trace with canonical identity permutation and Lagrange columns.
    ///
    /// `id_k[i] = k·n + i` and `sigma_k = id_k` (no copy constraints yet).
    pub fn new(log_size: u32) -> Result<Self, KeyError> {
        if !(MIN_LOG_CIRCUIT_SIZE..=MAX_LOG_CIRCUIT_SIZE).contains(&log_size) {
            return Err(KeyError::InvalidCircuitSize);
        }
        let n = 1usize << log_size;
        let mut trace = Self {
            log_size,
            columns: vec![vec![Fr::zero(); n]; NUM_UNSHIFTED_ENTITIES],
        };

        let ids = [Entity::Id1, Entity::Id2, Entity::Id3, Entity::Id4];
        let sigmas = [Entity::Sigma1, Entity::Sigma2, Entity::Sigma3, Entity::Sigma4];
        for (k, (&id, &sigma)) in ids.iter().zip(sigmas.iter()).enumerate() {
            let column: Vec<Fr> = (0..n).map(|i| fr_from_u64((k * n + i) as u64)).collect();
            trace.columns[sigma.index()] = column.clone();
            trace.columns[id.index()] = column;
        }
        trace.columns[Entity::LagrangeFirst.index()][0] = Fr::one();
        trace.columns[Entity::LagrangeLast.index()][n - 1] = Fr::one();
        Ok(trace)
    }

    /// Build from builder-supplied named columns.
    ///
    /// Columns not supplied keep the defaults of [`Trace::new`]. Shifted names and the
    /// columns the prover derives (lookup counts and tags, inverses, `z_perm`) are
    /// rejected as unknown.
    pub fn from_named_columns<I>(log_size: u32, columns: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = (String, Vec<Fr>)>,
    {
        let mut trace = Self::new(log_size)?;
        for (name, values) in columns {
            let entity = Entity::from_name(&name)
                .filter(|e| !e.is_shifted() && !e.is_derived())
                .ok_or(KeyError::UnknownColumn(name))?;
            trace.set_column(entity, values)?;
        }
        Ok(trace)
    }

    #[inline]
    pub fn log_size(&self) -> u32 {
        self.log_size
    }

    #[inline]
    pub fn size(&self) -> usize {
        1 << self.log_size
    }

    /// Values of a stored column. Shifted entities resolve to their source column.
    #[inline]
    pub fn column(&self, entity: Entity) -> &[Fr] {
        &self.columns[entity.unshifted().index()]
    }

    pub fn set_column(&mut self, entity: Entity, values: Vec<Fr>) -> Result<(), KeyError> {
        if entity.is_shifted() {
            return Err(KeyError::UnknownColumn(entity.name().to_string()));
        }
        if values.len() != self.size() {
            return Err(KeyError::ColumnLength {
                column: entity.name(),
                expected: self.size(),
                actual: values.len(),
            });
        }
        self.columns[entity.index()] = values;
        Ok(())
    }

    #[inline]
    pub fn get(&self, entity: Entity, row: usize) -> Fr {
        self.columns[entity.index()][row]
    }

    #[inline]
    pub fn set(&mut self, entity: Entity, row: usize, value: Fr) {
        self.columns[entity.index()][row] = value;
    }

    /// Shifted copy of a column: `out[i] = col[i + 1]`, last entry zero
    pub fn shifted_column(&self, entity: Entity) -> Vec<Fr> {
        let col = self.column(entity);
        let mut out = Vec::with_capacity(col.len());
        out.extend_from_slice(&col[1..]);
        out.push(Fr::zero());
        out
    }

    /// Project row `i` across all entities
    pub fn row(&self, i: usize) -> RowValues {
        let n = self.size();
        let mut row = RowValues::zero();
        for entity in Entity::unshifted_entities() {
            row[entity] = self.columns[entity.index()][i];
        }
        if i + 1 < n {
            for (src, dst) in TO_BE_SHIFTED.iter().zip(SHIFTED.iter()) {
                row[*dst] = self.columns[src.index()][i + 1];
            }
        }
        row
    }

    /// All entity polynomials (unshifted then shifted), in [`Entity`] order
    pub fn full_polynomials(&self) -> Vec<Vec<Fr>> {
        let mut polys = self.columns.clone();
        for src in TO_BE_SHIFTED {
            polys.push(self.shifted_column(src));
        }
        polys
    }
}
