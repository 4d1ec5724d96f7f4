//! A sparse-R1CS builder: every row has the shape
//! `ql*a + qr*b + qm*a*b + qo*c + qk = 0`, optionally extended with a
//! committed-value term.
//!
//! Variables are laid out as public inputs, then secret inputs, then the
//! internal variables created by the gate helpers. Solving walks the rows in
//! insertion order: a row whose `c` wire is still unknown and has `qo != 0`
//! defines it, every other row is checked.

use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::{
    CommitmentHint, CommitmentInfo, ConstraintSystem, CsIndex, Gate, Solution, VarIndex,
};
use fflonk_algebra::prelude::*;

/// Sparse constraint system over `F`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseCS<F> {
    num_public: usize,
    num_secret: usize,
    num_vars: usize,
    gates: Vec<Gate<F>>,
    commitments: Vec<CommitmentInfo>,
}

impl<F: Domain> SparseCS<F> {
    /// Create a system with the given numbers of public and secret inputs.
    pub fn new(num_public: usize, num_secret: usize) -> Self {
        Self {
            num_public,
            num_secret,
            num_vars: num_public + num_secret,
            gates: vec![],
            commitments: vec![],
        }
    }

    /// Variable of the `i`-th public input.
    pub fn public_input(&self, i: usize) -> VarIndex {
        assert!(i < self.num_public, "public input index out of bound");
        i
    }

    /// Variable of the `i`-th secret input.
    pub fn secret_input(&self, i: usize) -> VarIndex {
        assert!(i < self.num_secret, "secret input index out of bound");
        self.num_public + i
    }

    fn new_internal_var(&mut self) -> VarIndex {
        self.num_vars += 1;
        self.num_vars - 1
    }

    /// Append a raw row. Returns its constraint index.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_gate(
        &mut self,
        wires: [VarIndex; 3],
        ql: F,
        qr: F,
        qm: F,
        qo: F,
        qk: F,
    ) -> CsIndex {
        assert!(
            wires.iter().all(|&w| w < self.num_vars),
            "wire index out of bound"
        );
        self.gates.push(Gate {
            wires,
            ql,
            qr,
            qm,
            qo,
            qk,
            committed_by: None,
        });
        self.gates.len() - 1
    }

    /// `ca * a + cb * b + k`, as a new variable.
    pub fn linear_combine(&mut self, a: VarIndex, b: VarIndex, ca: F, cb: F, k: F) -> VarIndex {
        let c = self.new_internal_var();
        self.insert_gate([a, b, c], ca, cb, F::zero(), F::one().neg(), k);
        c
    }

    /// `a + b`, as a new variable.
    pub fn add(&mut self, a: VarIndex, b: VarIndex) -> VarIndex {
        self.linear_combine(a, b, F::one(), F::one(), F::zero())
    }

    /// `a - b`, as a new variable.
    pub fn sub(&mut self, a: VarIndex, b: VarIndex) -> VarIndex {
        self.linear_combine(a, b, F::one(), F::one().neg(), F::zero())
    }

    /// `a * b`, as a new variable.
    pub fn mul(&mut self, a: VarIndex, b: VarIndex) -> VarIndex {
        let c = self.new_internal_var();
        self.insert_gate(
            [a, b, c],
            F::zero(),
            F::zero(),
            F::one(),
            F::one().neg(),
            F::zero(),
        );
        c
    }

    /// Enforce `a * b = c` on existing variables.
    pub fn assert_mul(&mut self, a: VarIndex, b: VarIndex, c: VarIndex) -> CsIndex {
        self.insert_gate(
            [a, b, c],
            F::zero(),
            F::zero(),
            F::one(),
            F::one().neg(),
            F::zero(),
        )
    }

    /// Enforce `a = b`.
    pub fn assert_equal(&mut self, a: VarIndex, b: VarIndex) -> CsIndex {
        self.insert_gate(
            [a, b, a],
            F::one(),
            F::one().neg(),
            F::zero(),
            F::zero(),
            F::zero(),
        )
    }

    /// Enforce `a = constant`.
    pub fn assert_constant(&mut self, a: VarIndex, constant: F) -> CsIndex {
        self.insert_gate(
            [a, a, a],
            F::one(),
            F::zero(),
            F::zero(),
            F::zero(),
            constant.neg(),
        )
    }

    /// Commit to `vars`. The returned variable holds a field element derived
    /// from the commitment, known only once the committed values are fixed.
    pub fn commit(&mut self, vars: &[VarIndex]) -> VarIndex {
        assert!(!vars.is_empty(), "nothing to commit");
        let index = self.commitments.len();
        let mut committed = Vec::with_capacity(vars.len());
        for v in vars {
            let row = self.insert_gate(
                [*v, *v, *v],
                F::one().neg(),
                F::zero(),
                F::zero(),
                F::zero(),
                F::zero(),
            );
            self.gates[row].committed_by = Some(index);
            committed.push(row);
        }
        let out = self.new_internal_var();
        let commitment_index = self.insert_gate(
            [out, out, out],
            F::one().neg(),
            F::zero(),
            F::zero(),
            F::zero(),
            F::zero(),
        );
        self.commitments.push(CommitmentInfo {
            committed,
            commitment_index,
        });
        out
    }
}

impl<F: Domain> ConstraintSystem for SparseCS<F> {
    type Field = F;

    fn num_public(&self) -> usize {
        self.num_public
    }

    fn num_secret(&self) -> usize {
        self.num_secret
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    fn commitment_info(&self) -> &[CommitmentInfo] {
        &self.commitments
    }

    fn solve(&self, witness: &[F], hint: &mut dyn CommitmentHint<F>) -> Result<Solution<F>> {
        let expected = self.num_public + self.num_secret;
        if witness.len() != expected {
            return Err(PlonkError::InvalidWitnessShape {
                expected,
                got: witness.len(),
            });
        }
        let mut values: Vec<Option<F>> = vec![None; self.num_vars];
        for (v, w) in values.iter_mut().zip(witness) {
            *v = Some(*w);
        }
        let commitment_rows: Vec<(CsIndex, usize)> = self
            .commitments
            .iter()
            .enumerate()
            .map(|(i, info)| (info.commitment_index, i))
            .collect();

        let mut l = Vec::with_capacity(self.gates.len());
        let mut r = Vec::with_capacity(self.gates.len());
        let mut o = Vec::with_capacity(self.gates.len());
        for (row, gate) in self.gates.iter().enumerate() {
            let [wa, wb, wc] = gate.wires;
            if let Some((_, i)) = commitment_rows.iter().find(|(c, _)| *c == row) {
                let committed = self.commitments[*i]
                    .committed
                    .iter()
                    .map(|k| values[self.gates[*k].wires[0]].ok_or(PlonkError::UnsatisfiedConstraint(*k)))
                    .collect::<Result<Vec<F>>>()?;
                values[wa] = Some(hint.commit(*i, &committed)?);
            }
            let a = values[wa].ok_or(PlonkError::UnsatisfiedConstraint(row))?;
            let b = values[wb].ok_or(PlonkError::UnsatisfiedConstraint(row))?;
            let partial = gate.ql * a + gate.qr * b + gate.qm * a * b + gate.qk;
            let c = match values[wc] {
                Some(c) => {
                    // committed rows and commitment rows are completed by the prover
                    let pending = gate.committed_by.is_some()
                        || commitment_rows.iter().any(|(c, _)| *c == row);
                    if !pending && partial + gate.qo * c != F::zero() {
                        return Err(PlonkError::UnsatisfiedConstraint(row));
                    }
                    c
                }
                None if !gate.qo.is_zero() => {
                    let c = partial.neg() * gate.qo.inv()?;
                    values[wc] = Some(c);
                    c
                }
                None => return Err(PlonkError::UnsatisfiedConstraint(row)),
            };
            l.push(a);
            r.push(b);
            o.push(c);
        }
        let values = values
            .into_iter()
            .map(|v| v.unwrap_or_else(F::zero))
            .collect();
        Ok(Solution { values, l, r, o })
    }
}
