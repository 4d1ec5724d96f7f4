//! Field, group and pairing abstractions used by the fflonk prover.
//!
//! Only the BLS12-381 instantiation is provided; the proving system is
//! generic over the traits in [`traits`].

#![allow(clippy::upper_case_acronyms)]

pub use ark_std::{borrow, fmt, iter, marker, ops, rand, One, UniformRand, Zero};

/// The BLS12-381 curve and its scalar field.
pub mod bls12_381;

/// Algebra errors.
pub mod errors;

/// Commonly used imports.
pub mod prelude;

/// Deterministic randomness for tests.
pub mod rand_helper;

/// Serde support for field and group elements.
pub mod serialization;

/// Scalar, domain, group and pairing traits.
pub mod traits;

/// Byte and hashing helpers.
pub mod utils;
