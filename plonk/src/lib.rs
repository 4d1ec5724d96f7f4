//! A PLONK prover and verifier over entangled KZG commitments.
//!
//! Every polynomial of the proving system owns a slot in a folded
//! polynomial `P(X) = sum_i P_i(X^t)`, so that a whole batch is committed
//! with a single group element and opened with two.
//!
//! The prover runs as a graph of dependent stages, see [`plonk::prover`].

#![allow(clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate serde_derive;

pub mod errors;
pub mod plonk;
pub mod poly_commit;
