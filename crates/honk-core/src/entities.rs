//! Named columns and the typed row view
//!
//! Every column the relation set reads is an [`Entity`]. Unshifted entities are stored in
//! the [`Trace`](crate::trace::Trace); shifted entities are the same columns read at
//! row `i + 1` (zero past the last row). A [`RowValues`] is one row projected across all
//! entities and is what relations see.

use crate::types::Fr;
use ark_ff::Zero;
use std::ops::{Index, IndexMut};

macro_rules! entities {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Column identifiers, in commitment/evaluation order
        #[repr(usize)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Entity {
            $($variant),*
        }

        impl Entity {
            /// All entities in index order
            pub const ALL: [Entity; NUM_ALL_ENTITIES] = [$(Entity::$variant),*];

            /// Column name as supplied by a circuit builder
            pub const fn name(self) -> &'static str {
                match self {
                    $(Entity::$variant => $name),*
                }
            }
        }
    };
}

entities! {
    // Precomputed selectors
    Qm => "q_m",
    Qc => "q_c",
    Ql => "q_l",
    Qr => "q_r",
    Qo => "q_o",
    Q4 => "q_4",
    QArith => "q_arith",
    QDeltaRange => "q_delta_range",
    QElliptic => "q_elliptic",
    QLookup => "q_lookup",
    QBusread => "q_busread",
    // Copy constraints
    Sigma1 => "sigma_1",
    Sigma2 => "sigma_2",
    Sigma3 => "sigma_3",
    Sigma4 => "sigma_4",
    Id1 => "id_1",
    Id2 => "id_2",
    Id3 => "id_3",
    Id4 => "id_4",
    // Lookup table
    Table1 => "table_1",
    Table2 => "table_2",
    Table3 => "table_3",
    Table4 => "table_4",
    LagrangeFirst => "lagrange_first",
    LagrangeLast => "lagrange_last",
    DatabusId => "databus_id",
    // Witness
    Wl => "w_l",
    Wr => "w_r",
    Wo => "w_o",
    W4 => "w_4",
    Calldata => "calldata",
    CalldataReadCounts => "calldata_read_counts",
    ReturnData => "return_data",
    ReturnDataReadCounts => "return_data_read_counts",
    LookupReadCounts => "lookup_read_counts",
    LookupReadTags => "lookup_read_tags",
    LookupInverses => "lookup_inverses",
    CalldataInverses => "calldata_inverses",
    ReturnDataInverses => "return_data_inverses",
    ZPerm => "z_perm",
    // Shifted
    WlShift => "w_l_shift",
    WrShift => "w_r_shift",
    WoShift => "w_o_shift",
    W4Shift => "w_4_shift",
    ZPermShift => "z_perm_shift",
}

/// Number of precomputed (verification key) columns
pub const NUM_PRECOMPUTED_ENTITIES: usize = 26;

/// Number of witness columns
pub const NUM_WITNESS_ENTITIES: usize = 14;

/// Number of stored columns
pub const NUM_UNSHIFTED_ENTITIES: usize = NUM_PRECOMPUTED_ENTITIES + NUM_WITNESS_ENTITIES;

/// Number of shifted views
pub const NUM_SHIFTED_ENTITIES: usize = 5;

/// Total entities seen by relations (and evaluations sent after sumcheck)
pub const NUM_ALL_ENTITIES: usize = NUM_UNSHIFTED_ENTITIES + NUM_SHIFTED_ENTITIES;

/// Columns with a shifted view, paired position-wise with [`SHIFTED`]
pub const TO_BE_SHIFTED: [Entity; NUM_SHIFTED_ENTITIES] = [
    Entity::Wl,
    Entity::Wr,
    Entity::Wo,
    Entity::W4,
    Entity::ZPerm,
];

/// Shifted views, paired position-wise with [`TO_BE_SHIFTED`]
pub const SHIFTED: [Entity; NUM_SHIFTED_ENTITIES] = [
    Entity::WlShift,
    Entity::WrShift,
    Entity::WoShift,
    Entity::W4Shift,
    Entity::ZPermShift,
];

/// Columns sent in the wire commitment round
pub const WIRE_ROUND: [Entity; 7] = [
    Entity::Wl,
    Entity::Wr,
    Entity::Wo,
    Entity::Calldata,
    Entity::CalldataReadCounts,
    Entity::ReturnData,
    Entity::ReturnDataReadCounts,
];

/// Columns sent in the derived-column round (after eta)
pub const DERIVED_ROUND: [Entity; 3] = [
    Entity::LookupReadCounts,
    Entity::LookupReadTags,
    Entity::W4,
];

/// Columns sent in the log-derivative round (after beta, gamma)
pub const INVERSE_ROUND: [Entity; 3] = [
    Entity::LookupInverses,
    Entity::CalldataInverses,
    Entity::ReturnDataInverses,
];

impl Entity {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up an entity by its builder-facing name
    pub fn from_name(name: &str) -> Option<Entity> {
        Entity::ALL.iter().copied().find(|e| e.name() == name)
    }

    pub const fn is_precomputed(self) -> bool {
        (self as usize) < NUM_PRECOMPUTED_ENTITIES
    }

    pub const fn is_shifted(self) -> bool {
        (self as usize) >= NUM_UNSHIFTED_ENTITIES
    }

    /// Witness columns the prover computes itself
    pub const fn is_derived(self) -> bool {
        matches!(
            self,
            Entity::LookupReadCounts
                | Entity::LookupReadTags
                | Entity::LookupInverses
                | Entity::CalldataInverses
                | Entity::ReturnDataInverses
                | Entity::ZPerm
        )
    }

    /// The stored column a shifted entity reads from
    pub fn unshifted(self) -> Entity {
        match SHIFTED.iter().position(|&s| s == self) {
            Some(i) => TO_BE_SHIFTED[i],
            None => self,
        }
    }

    /// Precomputed entities, in verification-key order
    pub fn precomputed() -> impl Iterator<Item = Entity> {
        Entity::ALL[..NUM_PRECOMPUTED_ENTITIES].iter().copied()
    }

    /// Stored entities, in opening order
    pub fn unshifted_entities() -> impl Iterator<Item = Entity> {
        Entity::ALL[..NUM_UNSHIFTED_ENTITIES].iter().copied()
    }
}

/// One row projected across every entity
#[derive(Clone, Debug, PartialEq)]
pub struct RowValues {
    values: [Fr; NUM_ALL_ENTITIES],
}

impl RowValues {
    pub fn zero() -> Self {
        Self {
            values: [Fr::zero(); NUM_ALL_ENTITIES],
        }
    }

    /// Build from a full evaluation vector (e.g. claimed sumcheck evaluations)
    pub fn from_slice(values: &[Fr]) -> Option<Self> {
        let values: [Fr; NUM_ALL_ENTITIES] = values.try_into().ok()?;
        Some(Self { values })
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [Fr] {
        &mut self.values
    }
}

impl Index<Entity> for RowValues {
    type Output = Fr;

    #[inline]
    fn index(&self, entity: Entity) -> &Fr {
        &self.values[entity as usize]
    }
}

impl IndexMut<Entity> for RowValues {
    #[inline]
    fn index_mut(&mut self, entity: Entity) -> &mut Fr {
        &mut self.values[entity as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_u64;

    #[test]
    fn test_entity_layout() {
        assert_eq!(Entity::ALL.len(), NUM_ALL_ENTITIES);
        for (i, e) in Entity::ALL.iter().enumerate() {
            assert_eq!(e.index(), i);
        }
        assert_eq!(Entity::DatabusId.index(), NUM_PRECOMPUTED_ENTITIES - 1);
        assert_eq!(Entity::ZPerm.index(), NUM_UNSHIFTED_ENTITIES - 1);
        assert!(Entity::WlShift.is_shifted());
        assert!(!Entity::ZPerm.is_shifted());
        assert!(Entity::Sigma4.is_precomputed());
        assert!(!Entity::Wl.is_precomputed());
    }

    #[test]
    fn test_names_round_trip_and_are_unique() {
        for e in Entity::ALL {
            assert_eq!(Entity::from_name(e.name()), Some(e));
        }
        assert_eq!(Entity::from_name("w_5"), None);
    }

    #[test]
    fn test_shift_pairs() {
        for (src, shifted) in TO_BE_SHIFTED.iter().zip(SHIFTED.iter()) {
            assert_eq!(shifted.unshifted(), *src);
            assert_eq!(format!("{}_shift", src.name()), shifted.name());
        }
        assert_eq!(Entity::Wl.unshifted(), Entity::Wl);
    }

    #[test]
    fn test_round_columns_cover_witness() {
        let mut committed: Vec<Entity> = WIRE_ROUND
            .iter()
            .chain(DERIVED_ROUND.iter())
            .chain(INVERSE_ROUND.iter())
            .copied()
            .collect();
        committed.push(Entity::ZPerm);
        committed.sort();
        let witness: Vec<Entity> = Entity::ALL[NUM_PRECOMPUTED_ENTITIES..NUM_UNSHIFTED_ENTITIES].to_vec();
        assert_eq!(committed, witness);
    }

    #[test]
    fn test_row_values_index() {
        let mut row = RowValues::zero();
        row[Entity::Wr] = fr_from_u64(7);
        assert_eq!(row[Entity::Wr], fr_from_u64(7));
        assert_eq!(row.as_slice()[Entity::Wr.index()], fr_from_u64(7));
        assert!(RowValues::from_slice(&[fr_from_u64(1); 3]).is_none());
    }
}
