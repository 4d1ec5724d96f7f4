use crate::errors::Result;
use ark_std::fmt::Debug;
use fflonk_algebra::traits::Domain;
use serde::{Deserialize, Serialize};

/// The trait for serialization to bytes
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// The trait for homomorphic polynomial commitment or polynomial.
pub trait HomomorphicPolyComElem: ToBytes {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Get base (generator) of the group.
    fn get_base() -> Self;

    /// Get identity of the group.
    fn get_identity() -> Self;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply the underlying polynomial by a scalar.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply assign the underlying polynomial by a scalar.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

/// Polynomial commitment scheme with slot-aware ("entangled") commitments.
///
/// A polynomial committed at slot `id` with folding factor `t` uses the
/// key elements `key[i * t + id]`, so the sum of all slot commitments equals
/// the commitment of the interleaved polynomial `sum_j X^j p_j(X^t)`.
pub trait PolyComScheme: Sized + Clone + Send + Sync {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + Debug
        + PartialEq
        + Eq
        + Clone
        + Send
        + Sync
        + Serialize
        + for<'de> Deserialize<'de>;

    /// Number of G1 elements in the commitment key.
    fn key_len(&self) -> usize;

    /// Commit to a coefficient vector against the full key.
    fn commit(&self, coefs: &[Self::Field]) -> Result<Self::Commitment> {
        self.commit_entangled(coefs, 1, 0)
    }

    /// Commit to a coefficient vector against the sub-key of `slot`.
    fn commit_entangled(
        &self,
        coefs: &[Self::Field],
        t: usize,
        slot: usize,
    ) -> Result<Self::Commitment>;

    /// Commit to `b(X) * (X^n - 1)` at `slot` without building the shifted polynomial.
    fn commit_blinding_factor(
        &self,
        blinding: &[Self::Field],
        n: usize,
        t: usize,
        slot: usize,
    ) -> Result<Self::Commitment>;

    /// Check `e(folded + point * witness, [1]) == e(witness, [s])`.
    fn check_opening(
        &self,
        folded: &Self::Commitment,
        witness: &Self::Commitment,
        point: &Self::Field,
    ) -> Result<()>;

    /// Keep only what a verifier needs.
    fn shrink_to_verifier_only(&self) -> Self;
}
