//! Honk-style proving core
//!
//! Relation accumulation over a 45-column execution trace, log-derivative lookups,
//! a multilinear sumcheck and the seven-round prover/verifier built around a Keccak
//! Fiat-Shamir transcript. Commitments go through the [`CommitmentScheme`] trait; the
//! crate ships a Pedersen/IPA instance.
//!
//! # Example
//!
//! ```ignore
//! use honk_core::{prove, verify, HonkConfig, ProvingKey, Trace};
//!
//! let config = HonkConfig::default();
//! let scheme = config.commitment_scheme();
//!
//! let trace = Trace::from_named_columns(log_n, columns)?;
//! let key = ProvingKey::new(trace, public_inputs.clone(), offset)?;
//! let vk = key.verification_key(&scheme)?;
//!
//! let proof = prove(key, &scheme)?;
//! assert!(verify(&vk, &proof, &public_inputs, &scheme)?);
//! ```

pub mod config;
pub mod debug;
pub mod diagnostics;
pub mod entities;
pub mod errors;
pub mod field;
pub mod key;
pub mod logderiv;
pub mod ops;
pub mod pcs;
pub mod polynomial;
pub mod proof;
pub mod prover;
pub mod relations;
pub mod sumcheck;
pub mod trace;
pub mod transcript;
pub mod types;
pub mod univariate;
pub mod verifier;

pub use config::HonkConfig;
pub use diagnostics::{check_trace, RelationFailure};
pub use entities::{Entity, RowValues};
pub use errors::{KeyError, PcsError, ProofError, ProveError, SumcheckError, VerifyError};
pub use key::{ProvingKey, VerificationKey};
pub use pcs::{CommitmentScheme, OpeningClaim, OpeningWitness, PedersenIpa};
pub use proof::ProofLayout;
pub use prover::{prove, Prover};
pub use relations::{Relation, RelationKind, RelationParameters};
pub use trace::Trace;
pub use types::{Fr, G1};
pub use verifier::verify;
