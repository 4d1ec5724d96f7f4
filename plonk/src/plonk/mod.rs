//! The fflonk PLONK implementation.

/// Module for the constraint system.
pub mod constraint_system;

/// Module for the evaluation domains.
pub mod domain;

/// Module for help functions.
pub(crate) mod helpers;

/// Module for indexer.
pub mod indexer;

/// Module for polynomials tagged with their representation.
pub mod polynomial;

/// Module for prover.
pub mod prover;

pub(crate) mod quotient;

/// Module for the prover task graph.
pub(crate) mod tasks;

/// Module for the circuit trace.
pub mod trace;

/// Module for transcript.
pub mod transcript;

/// Module for verifier.
pub mod verifier;
