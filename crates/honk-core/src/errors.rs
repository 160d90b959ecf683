//! Error types for proving and verification
//!
//! Malformed input surfaces as one of these errors before any round runs. A proof that
//! parses but fails a check is not an error: verification returns `Ok(false)`.

use thiserror::Error;

/// Top-level proving error
#[derive(Debug, Error)]
pub enum ProveError {
    #[error("key: {0}")]
    Key(#[from] KeyError),

    #[error("commitment scheme: {0}")]
    Pcs(#[from] PcsError),
}

/// Top-level verification error
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("key: {0}")]
    Key(#[from] KeyError),

    #[error("proof: {0}")]
    Proof(#[from] ProofError),

    #[error("commitment scheme: {0}")]
    Pcs(#[from] PcsError),

    #[error("public inputs: {0}")]
    PublicInput(String),
}

/// Proving/verification key construction and parsing errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("verification key is {actual} bytes, expected {expected}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("circuit size must be a power of two with log size in 1..=28")]
    InvalidCircuitSize,

    #[error("Circuit too large: log size {log_size} exceeds maximum {max}")]
    CircuitTooLarge { log_size: u32, max: u32 },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {column} has {actual} rows, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Public inputs do not fit: offset {offset} + count {count} > circuit size {size}")]
    PublicInputsOutOfRange {
        offset: usize,
        count: usize,
        size: usize,
    },

    #[error("Public input {index} does not match w_l at row {row}")]
    PublicInputMismatch { index: usize, row: usize },

    #[error("{column} at row {row} is not 0 or 1: each bus entry backs at most one read")]
    BusReadCount { column: &'static str, row: usize },

    #[error("commitment is not a BN254 G1 point")]
    PointNotOnCurve,

    #[error("scalar is not a canonical field element")]
    InvalidScalar,
}

/// Proof parsing errors
#[derive(Debug, Error)]
pub enum ProofError {
    #[error("proof is {actual} bytes, expected {expected}")]
    InvalidSize { expected: usize, actual: usize },

    #[error("Proof truncated while reading {label}: needed {needed} bytes, {remaining} left")]
    Truncated {
        label: String,
        needed: usize,
        remaining: usize,
    },

    #[error("{0} trailing bytes after the last payload")]
    TrailingBytes(usize),

    #[error("proof commitment is not a BN254 G1 point")]
    InvalidG1Point,

    #[error("Invalid scalar")]
    InvalidScalar,
}

/// Commitment scheme errors
#[derive(Debug, Error)]
pub enum PcsError {
    #[error("Setup supports {available} generators, {requested} requested")]
    SetupTooSmall { available: usize, requested: usize },

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("Transcript produced a zero folding challenge")]
    ZeroChallenge,
}

/// Sumcheck verification failures
///
/// Only [`SumcheckError::Proof`] is malformed input; the other variants mean the proof
/// parsed but is not valid.
#[derive(Debug, Error)]
pub enum SumcheckError {
    #[error("Round {round}: S(0) + S(1) does not match the running target")]
    RoundSum { round: usize },

    #[error("Batched relation evaluation does not match the final target")]
    FinalRelation,

    #[error(transparent)]
    Proof(#[from] ProofError),
}
