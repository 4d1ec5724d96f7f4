use ark_std::{error, fmt, string::String};
use fflonk_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlonkError {
    /// Algebra error
    Algebra(AlgebraError),
    /// Error with message
    Message(String),
    /// The witness does not have the length the circuit expects.
    InvalidWitnessShape {
        /// Expected length.
        expected: usize,
        /// Provided length.
        got: usize,
    },
    /// The gate at this row is violated by the witness.
    UnsatisfiedConstraint(usize),
    /// The commitment key has fewer elements than the circuit needs.
    UndersizedSRS {
        /// Required number of G1 elements.
        needed: usize,
        /// Available number of G1 elements.
        available: usize,
    },
    /// The circuit has fewer than two rows.
    DegenerateCircuit(usize),
    /// A polynomial was handed over in an unexpected basis or layout.
    InvalidPolynomialForm,
    /// Another stage failed first, or the caller cancelled.
    Cancelled,
    /// Group not found.
    GroupNotFound(usize),
    /// Polynomial commitment error.
    CommitmentError,
    /// Error occurred when verify.
    VerificationError,
    /// Division by zero.
    DivisionByZero,
    /// The polynomial is not divisible by the opening vanishing polynomial.
    PCSProveEvalError,
    /// The degree of the polynomial is higher than the maximum degree supported.
    DegreeError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            Message(e) => f.write_str(e),
            InvalidWitnessShape { expected, got } => {
                write!(f, "Witness has {} entries, expected {}.", got, expected)
            }
            UnsatisfiedConstraint(row) => write!(f, "Constraint {} is not satisfied.", row),
            UndersizedSRS { needed, available } => write!(
                f,
                "SRS holds {} elements but {} are needed.",
                available, needed
            ),
            DegenerateCircuit(n) => write!(f, "Circuit with {} rows is too small.", n),
            InvalidPolynomialForm => f.write_str("Polynomial in unexpected form."),
            Cancelled => f.write_str("Proving cancelled."),
            GroupNotFound(n) => write!(f, "No multiplicative subgroup of size {}.", n),
            CommitmentError => f.write_str("Commitment error."),
            VerificationError => f.write_str("Verification error."),
            DivisionByZero => f.write_str("Division by zero."),
            PCSProveEvalError => f.write_str("Polynomial does not vanish on the opening set."),
            DegreeError => f.write_str(
                "The degree of the polynomial is higher than the maximum degree supported.",
            ),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}
