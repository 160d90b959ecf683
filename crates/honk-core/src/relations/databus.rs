//! Data bus lookup
//!
//! Two bus columns, `calldata` and `return_data`, are read by index through
//! log-derivative arguments. Column `c` holds its values with `databus_id` as the index;
//! a read row has `q_busread = 1` plus the column's selector set, the value in `w_l` and
//! the index in `w_r`:
//!
//! ```text
//! read  = w_l + w_r·β + γ
//! write = c + databus_id·β + γ
//! ```
//!
//! Each column contributes a row-local inverse check and a trace-sum check, in the
//! order calldata then return data.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::logderiv::{compute_inverses, inverse_exists, LogDerivTerms};
use crate::trace::Trace;
use crate::types::Fr;

pub struct DatabusLookupRelation;

/// A bus column and the entities its argument uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusColumn {
    Calldata,
    ReturnData,
}

impl BusColumn {
    pub const ALL: [BusColumn; 2] = [BusColumn::Calldata, BusColumn::ReturnData];

    /// Selector that, together with `q_busread`, marks a read of this column
    pub const fn selector(self) -> Entity {
        match self {
            BusColumn::Calldata => Entity::Ql,
            BusColumn::ReturnData => Entity::Qr,
        }
    }

    pub const fn values(self) -> Entity {
        match self {
            BusColumn::Calldata => Entity::Calldata,
            BusColumn::ReturnData => Entity::ReturnData,
        }
    }

    pub const fn read_counts(self) -> Entity {
        match self {
            BusColumn::Calldata => Entity::CalldataReadCounts,
            BusColumn::ReturnData => Entity::ReturnDataReadCounts,
        }
    }

    pub const fn inverses(self) -> Entity {
        match self {
            BusColumn::Calldata => Entity::CalldataInverses,
            BusColumn::ReturnData => Entity::ReturnDataInverses,
        }
    }

    /// Read/write terms of this column's argument at one row
    pub fn terms(self, row: &RowValues, params: &RelationParameters) -> LogDerivTerms {
        let read_selector = row[Entity::QBusread] * row[self.selector()];
        LogDerivTerms {
            inverse_exists: inverse_exists(&read_selector, &row[self.read_counts()]),
            read: row[Entity::Wl] + row[Entity::Wr] * params.beta + params.gamma,
            write: row[self.values()] + row[Entity::DatabusId] * params.beta + params.gamma,
        }
    }
}

impl Relation for DatabusLookupRelation {
    const NAME: &'static str = "Databus";
    const SUBRELATION_DEGREES: &'static [usize] = &[3, 4, 3, 4];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, false, true, false];

    fn accumulate(acc: &mut [Fr], row: &RowValues, params: &RelationParameters, scaling_factor: &Fr) {
        for (k, column) in BusColumn::ALL.into_iter().enumerate() {
            let terms = column.terms(row, params);
            let inverses = row[column.inverses()];
            let read_selector = row[Entity::QBusread] * row[column.selector()];

            acc[2 * k] += (terms.read * terms.write * inverses - terms.inverse_exists) * scaling_factor;
            acc[2 * k + 1] += read_selector * inverses * terms.write
                - row[column.read_counts()] * inverses * terms.read;
        }
    }
}

/// Inverse column of one bus column's argument
pub fn compute_bus_inverses(trace: &Trace, params: &RelationParameters, column: BusColumn) -> Vec<Fr> {
    compute_inverses(trace, |row| column.terms(row, params))
}
