//! Debug utilities for challenge and round validation
//!
//! Enable with `--features debug`. Output goes through the `log` facade at debug level.

use crate::field::fr_to_bytes;
use crate::ops::g1_to_bytes;
use crate::types::{Fr, G1};

/// `0x`-prefixed big-endian hex of a scalar
pub fn fr_to_hex(fr: &Fr) -> String {
    format!("0x{}", hex::encode(fr_to_bytes(fr)))
}

/// Affine coordinates as a hex pair
pub fn g1_to_hex(g1: &G1) -> String {
    let bytes = g1_to_bytes(g1);
    format!(
        "(0x{}, 0x{})",
        hex::encode(&bytes[..32]),
        hex::encode(&bytes[32..])
    )
}

/// Log a named scalar at debug level
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dbg_fr {
    ($name:expr, $fr:expr) => {
        log::debug!("{} = {}", $name, $crate::debug::fr_to_hex($fr))
    };
}

/// Compiled out without the `debug` feature
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dbg_fr {
    ($name:expr, $fr:expr) => {};
}

/// Free-form debug line
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Log a named point at debug level
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! dbg_g1 {
    ($name:expr, $g1:expr) => {
        log::debug!("{} = {}", $name, $crate::debug::g1_to_hex($g1))
    };
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! dbg_g1 {
    ($name:expr, $g1:expr) => {};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::fr_from_u64;
    use ark_ec::AffineRepr;

    #[test]
    fn test_hex_formatting() {
        let s = fr_to_hex(&fr_from_u64(255));
        assert_eq!(s.len(), 66);
        assert!(s.ends_with("ff"));

        let g = g1_to_hex(&G1::generator());
        assert!(g.starts_with("(0x"));
        assert!(g.ends_with("02)"));
    }
}
