//! Elliptic curve gate over Grumpkin (`y² = x³ − 17`)
//!
//! Grumpkin's base field is BN254's scalar field, so point coordinates are plain wire
//! values. The gate spans two rows:
//!
//! - `(x1, y1) = (w_r, w_o)` on the gate row
//! - `(x2, y2) = (w_l_shift, w_4_shift)` and `(x3, y3) = (w_r_shift, w_o_shift)` on the next
//!
//! `q_l` is the sign applied to `y2` (1 for add, -1 for subtract) and `q_m` switches to
//! doubling `(x1, y1)`, in which case `(x2, y2)` is ignored.

use super::{Relation, RelationParameters};
use crate::entities::{Entity, RowValues};
use crate::field::fr_from_u64;
use crate::types::Fr;
use ark_ff::One;

pub struct EllipticRelation;

/// `-b` for Grumpkin
const CURVE_B_NEG: u64 = 17;

impl Relation for EllipticRelation {
    const NAME: &'static str = "Elliptic";
    const SUBRELATION_DEGREES: &'static [usize] = &[5, 5];
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[true, true];

    fn accumulate(acc: &mut [Fr], row: &RowValues, _params: &RelationParameters, scaling_factor: &Fr) {
        let x1 = row[Entity::Wr];
        let y1 = row[Entity::Wo];
        let x2 = row[Entity::WlShift];
        let y2 = row[Entity::W4Shift];
        let x3 = row[Entity::WrShift];
        let y3 = row[Entity::WoShift];
        let q_sign = row[Entity::Ql];
        let q_is_double = row[Entity::Qm];
        let q_elliptic = row[Entity::QElliptic];

        let delta_x = x2 - x1;
        let y1_sqr = y1 * y1;

        // Addition: (x3 + x2 + x1)(x2 - x1)^2 - (y2 - y1)^2 = 0
        let y2_sqr = y2 * y2;
        let y1y2 = y1 * y2 * q_sign;
        let x_add_identity = (x3 + x2 + x1) * delta_x * delta_x - y2_sqr - y1_sqr + y1y2 + y1y2;

        // (y1 + y3)(x2 - x1) + (x3 - x1)(y2 - y1) = 0
        let y_diff = y2 * q_sign - y1;
        let y_add_identity = (y1 + y3) * delta_x + (x3 - x1) * y_diff;

        // Doubling: (x3 + 2·x1)·4y1² - 9·x1⁴ = 0, with x1³ = y1² + 17
        let x_pow_4 = (y1_sqr + fr_from_u64(CURVE_B_NEG)) * x1;
        let y1_sqr_mul_4 = y1_sqr + y1_sqr + y1_sqr + y1_sqr;
        let x_double_identity = (x3 + x1 + x1) * y1_sqr_mul_4 - x_pow_4 * fr_from_u64(9);

        // 3x1²(x1 - x3) - 2y1(y1 + y3) = 0
        let x1_sqr_mul_3 = (x1 + x1 + x1) * x1;
        let y_double_identity = x1_sqr_mul_3 * (x1 - x3) - (y1 + y1) * (y1 + y3);

        let add_factor = (Fr::one() - q_is_double) * q_elliptic * scaling_factor;
        let double_factor = q_is_double * q_elliptic * scaling_factor;

        acc[0] += x_add_identity * add_factor + x_double_identity * double_factor;
        acc[1] += y_add_identity * add_factor + y_double_identity * double_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_i64;
    use ark_ff::{Field, PrimeField, Zero};

    /// Find a point on y² = x³ − 17 with x >= start
    fn point_from(start: u64) -> (Fr, Fr) {
        let mut x = start;
        loop {
            let xf = fr_from_u64(x);
            if let Some(y) = (xf * xf * xf - fr_from_u64(17)).sqrt() {
                return (xf, y);
            }
            x += 1;
        }
    }

    fn add(p: (Fr, Fr), q: (Fr, Fr)) -> (Fr, Fr) {
        let lambda = (q.1 - p.1) * (q.0 - p.0).inverse().unwrap();
        let x3 = lambda * lambda - p.0 - q.0;
        (x3, lambda * (p.0 - x3) - p.1)
    }

    fn double(p: (Fr, Fr)) -> (Fr, Fr) {
        let lambda = fr_from_u64(3) * p.0 * p.0 * (p.1 + p.1).inverse().unwrap();
        let x3 = lambda * lambda - p.0 - p.0;
        (x3, lambda * (p.0 - x3) - p.1)
    }

    fn gate_row(p1: (Fr, Fr), p2: (Fr, Fr), p3: (Fr, Fr), sign: Fr, is_double: bool) -> RowValues {
        let mut row = RowValues::zero();
        row[Entity::QElliptic] = Fr::one();
        row[Entity::Ql] = sign;
        row[Entity::Qm] = if is_double { Fr::one() } else { Fr::zero() };
        row[Entity::Wr] = p1.0;
        row[Entity::Wo] = p1.1;
        row[Entity::WlShift] = p2.0;
        row[Entity::W4Shift] = p2.1;
        row[Entity::WrShift] = p3.0;
        row[Entity::WoShift] = p3.1;
        row
    }

    fn eval(row: &RowValues) -> [Fr; 2] {
        let mut acc = [Fr::zero(); 2];
        EllipticRelation::accumulate(&mut acc, row, &RelationParameters::default(), &Fr::one());
        acc
    }

    #[test]
    fn test_addition() {
        let p = point_from(3);
        let q = point_from(p.0.into_bigint().0[0] + 1);
        let r = add(p, q);
        assert_eq!(eval(&gate_row(p, q, r, Fr::one(), false)), [Fr::zero(); 2]);

        let wrong = (r.0, r.1 + Fr::one());
        assert!(!eval(&gate_row(p, q, wrong, Fr::one(), false))[1].is_zero());
    }

    #[test]
    fn test_subtraction() {
        let p = point_from(3);
        let q = point_from(p.0.into_bigint().0[0] + 1);
        let r = add(p, (q.0, -q.1));
        assert_eq!(eval(&gate_row(p, q, r, fr_from_i64(-1), false)), [Fr::zero(); 2]);
    }

    #[test]
    fn test_doubling() {
        let p = point_from(3);
        let r = double(p);
        // The second point is ignored when doubling
        let junk = (fr_from_u64(123), fr_from_u64(456));
        assert_eq!(eval(&gate_row(p, junk, r, Fr::one(), true)), [Fr::zero(); 2]);

        let wrong = (r.0 + Fr::one(), r.1);
        assert!(!eval(&gate_row(p, junk, wrong, Fr::one(), true))[0].is_zero());
    }
}
