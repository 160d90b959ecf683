//! Arithmetic gate
//!
//! `q_arith` selects the mode. At 1 the gate is the standard
//! `q_m·w_l·w_r + q_l·w_l + q_r·w_r + q_o·w_o + q_4·w_4 + q_c = 0`; at 2 it also adds
//! `w_4_shift`; at 3 the second subrelation ties `w_l + w_4 + q_m` to `w_l_shift` and
//! the multiplication term is dropped.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::types::Fr;
use ark_ff::{Field, One};

pub struct ArithmeticRelation;

/// `-1/2` in Fr
fn neg_half() -> Fr {
    // 2 is invertible in a prime field of odd order
    -Fr::from(2u64).inverse().unwrap_or_default()
}

impl Relation for ArithmeticRelation {
    const NAME: &'static str = "Arithmetic";
    const SUBRELATION_DEGREES: &'static [usize] = &[5, 4];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, true];

    fn accumulate(acc: &mut [Fr], row: &RowValues, _params: &RelationParameters, scaling_factor: &Fr) {
        let q_arith = row[Entity::QArith];
        let w_l = row[Entity::Wl];
        let w_r = row[Entity::Wr];
        let w_4 = row[Entity::W4];
        let three = Fr::from(3u64);
        let two = Fr::from(2u64);

        let mut accum = (q_arith - three) * row[Entity::Qm] * w_r * w_l * neg_half();
        accum += row[Entity::Ql] * w_l
            + row[Entity::Qr] * w_r
            + row[Entity::Qo] * row[Entity::Wo]
            + row[Entity::Q4] * w_4
            + row[Entity::Qc];
        accum += (q_arith - Fr::one()) * row[Entity::W4Shift];
        acc[0] += accum * q_arith * scaling_factor;

        let mut accum = w_l + w_4 - row[Entity::WlShift] + row[Entity::Qm];
        accum *= q_arith - two;
        accum *= q_arith - Fr::one();
        accum *= q_arith;
        acc[1] += accum * scaling_factor;
    }
}
