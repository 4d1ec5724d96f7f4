use crate::errors::Result;
use fflonk_algebra::traits::Domain;

pub mod sparse;

/// Default constraint system.
pub use sparse::SparseCS;

/// Variable index
pub type VarIndex = usize;
/// Constraint index
pub type CsIndex = usize;

/// One row of the sparse relation
/// `ql*a + qr*b + qm*a*b + qo*c + qk (+ qcp_i * pi_i) = 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gate<F> {
    /// Variables wired into `a`, `b` and `c`.
    pub wires: [VarIndex; 3],
    pub ql: F,
    pub qr: F,
    pub qm: F,
    pub qo: F,
    pub qk: F,
    /// Set when this row carries a value committed by commitment `i`,
    /// so that `qcp_i` is one on it.
    pub committed_by: Option<usize>,
}

/// A batch of committed wires and the row that receives the commitment value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentInfo {
    /// Constraint indices whose `a` wire is committed.
    pub committed: Vec<CsIndex>,
    /// Constraint index whose `a` wire receives the commitment value.
    pub commitment_index: CsIndex,
}

/// Wire values of a solved circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<F> {
    /// Value of every variable.
    pub values: Vec<F>,
    /// `a` wire of every constraint.
    pub l: Vec<F>,
    /// `b` wire of every constraint.
    pub r: Vec<F>,
    /// `c` wire of every constraint.
    pub o: Vec<F>,
}

/// Produces the value of commitment `index` while the circuit is being solved.
pub trait CommitmentHint<F> {
    /// `committed_values[k]` is the value of the `a` wire on row
    /// `committed[k]` of the matching [`CommitmentInfo`].
    fn commit(&mut self, index: usize, committed_values: &[F]) -> Result<F>;
}

/// Trait for PLONK constraint systems.
///
/// Variables `0..num_public()` are the public inputs, followed by the
/// `num_secret()` secret inputs, followed by internal variables.
pub trait ConstraintSystem: Sync {
    type Field: Domain;

    /// Number of public inputs.
    fn num_public(&self) -> usize;

    /// Number of secret inputs.
    fn num_secret(&self) -> usize;

    /// Return number of variables in the constraint system.
    fn num_vars(&self) -> usize;

    /// Return the number of constraints in the system.
    fn num_constraints(&self) -> usize {
        self.gates().len()
    }

    /// All rows, in order.
    fn gates(&self) -> &[Gate<Self::Field>];

    /// Commitments declared by the circuit, in order.
    fn commitment_info(&self) -> &[CommitmentInfo];

    /// Compute every wire value from `witness = public || secret`.
    fn solve(
        &self,
        witness: &[Self::Field],
        hint: &mut dyn CommitmentHint<Self::Field>,
    ) -> Result<Solution<Self::Field>>;
}
