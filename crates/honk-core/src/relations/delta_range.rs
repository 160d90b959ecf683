//! Delta range constraint
//!
//! Consecutive wire values (`w_l, w_r, w_o, w_4, w_l_shift`) may only step by 0, 1, 2 or 3.
//! A sorted column padded this way proves every entry lies in a range.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::types::Fr;
use ark_ff::One;

pub struct DeltaRangeRelation;

/// `Δ(Δ - 1)(Δ - 2)(Δ - 3)`
#[inline]
fn step_check(delta: Fr) -> Fr {
    let one = Fr::one();
    let two = one + one;
    let three = two + one;
    delta * (delta - one) * (delta - two) * (delta - three)
}

impl Relation for DeltaRangeRelation {
    const NAME: &'static str = "DeltaRange";
    const SUBRELATION_DEGREES: &'static [usize] = &[5, 5, 5, 5];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, true, true, true];

    fn accumulate(acc: &mut [Fr], row: &RowValues, _params: &RelationParameters, scaling_factor: &Fr) {
        let chain = [
            row[Entity::Wl],
            row[Entity::Wr],
            row[Entity::Wo],
            row[Entity::W4],
            row[Entity::WlShift],
        ];
        let selector = row[Entity::QDeltaRange] * scaling_factor;
        for (k, out) in acc.iter_mut().enumerate().take(4) {
            *out += step_check(chain[k + 1] - chain[k]) * selector;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_u64;
    use ark_ff::Zero;

    fn row(values: [u64; 5]) -> RowValues {
        let mut row = RowValues::zero();
        row[Entity::QDeltaRange] = Fr::one();
        for (e, v) in [Entity::Wl, Entity::Wr, Entity::Wo, Entity::W4, Entity::WlShift]
            .iter()
            .zip(values)
        {
            row[*e] = fr_from_u64(v);
        }
        row
    }

    fn eval(row: &RowValues) -> [Fr; 4] {
        let mut acc = [Fr::zero(); 4];
        DeltaRangeRelation::accumulate(&mut acc, row, &RelationParameters::default(), &Fr::one());
        acc
    }

    #[test]
    fn test_allowed_steps() {
        assert_eq!(eval(&row([0, 0, 1, 3, 6])), [Fr::zero(); 4]);
    }

    #[test]
    fn test_step_of_four_fails_at_that_position() {
        let out = eval(&row([0, 1, 5, 6, 7]));
        assert!(out[0].is_zero());
        assert!(!out[1].is_zero());
        assert!(out[2].is_zero() && out[3].is_zero());
    }

    #[test]
    fn test_negative_step_fails() {
        let out = eval(&row([2, 1, 1, 1, 1]));
        assert!(!out[0].is_zero());
    }

    #[test]
    fn test_inactive_row() {
        let mut r = row([0, 9, 0, 9, 0]);
        r[Entity::QDeltaRange] = Fr::zero();
        assert_eq!(eval(&r), [Fr::zero(); 4]);
    }
}
