//! Arithmetization of a constraint system into selector and permutation
//! polynomials over the small domain.
//!
//! Rows `0..num_public` are placeholders binding the `a` wire to a public
//! input (`ql = -1`, `qk` completed by the prover). Gate `j` lands on row
//! `num_public + j`. The remaining rows are padding with zero selectors.

use crate::errors::Result;
use crate::plonk::{
    constraint_system::{ConstraintSystem, VarIndex},
    domain::FftDomain,
    polynomial::{Form, Polynomial},
};
use fflonk_algebra::prelude::*;

/// Selector and permutation polynomials of a circuit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace<F> {
    pub ql: Polynomial<F>,
    pub qr: Polynomial<F>,
    pub qm: Polynomial<F>,
    pub qo: Polynomial<F>,
    /// Constant selector, zero on the rows the prover completes.
    pub qk: Polynomial<F>,
    /// One selector per custom-gate commitment.
    pub qcp: Vec<Polynomial<F>>,
    pub s1: Polynomial<F>,
    pub s2: Polynomial<F>,
    pub s3: Polynomial<F>,
    /// `permutation[p]` is the previous position of the cycle `p` belongs to,
    /// over the flattened columns `a || b || c`.
    pub permutation: Vec<usize>,
}

/// Variable held at every position of the flattened columns `a || b || c`.
pub fn wire_layout<CS: ConstraintSystem>(cs: &CS, n: usize) -> Vec<VarIndex> {
    let nb_public = cs.num_public();
    let mut lro = vec![0; 3 * n];
    for i in 0..nb_public {
        lro[i] = i;
    }
    for (j, gate) in cs.gates().iter().enumerate() {
        for (col, w) in gate.wires.iter().enumerate() {
            lro[col * n + nb_public + j] = *w;
        }
    }
    lro
}

/// Link every position to the last position seen holding the same variable,
/// then close each cycle by pointing its first position to its last one.
pub fn compute_permutation(lro: &[VarIndex], num_vars: usize) -> Vec<usize> {
    let mut last_seen: Vec<Option<usize>> = vec![None; num_vars];
    let mut perm: Vec<Option<usize>> = vec![None; lro.len()];
    for (i, v) in lro.iter().enumerate() {
        if let Some(prev) = last_seen[*v] {
            perm[i] = Some(prev);
        }
        last_seen[*v] = Some(i);
    }
    perm.iter()
        .zip(lro)
        .enumerate()
        .map(|(i, (p, v))| p.or(last_seen[*v]).unwrap_or(i))
        .collect()
}

/// Map each permuted position to its support element `u^col * g^row`.
pub fn encode_perm_to_group<F: Domain>(perm: &[usize], domain: &FftDomain<F>) -> Vec<F> {
    let n = domain.cardinality;
    let shifts = [
        F::one(),
        domain.coset_shift,
        domain.coset_shift.square(),
    ];
    perm.iter()
        .map(|p| shifts[p / n].mul(&domain.element(p % n)))
        .collect()
}

impl<F: Domain> Trace<F> {
    /// Arithmetize `cs` over `domain`. Everything comes out in Lagrange form.
    pub fn new<CS: ConstraintSystem<Field = F>>(cs: &CS, domain: &FftDomain<F>) -> Self {
        let n = domain.cardinality;
        let nb_public = cs.num_public();
        let nb_qcp = cs.commitment_info().len();
        let mut ql = vec![F::zero(); n];
        let mut qr = vec![F::zero(); n];
        let mut qm = vec![F::zero(); n];
        let mut qo = vec![F::zero(); n];
        let mut qk = vec![F::zero(); n];
        let mut qcp = vec![vec![F::zero(); n]; nb_qcp];

        for q in ql.iter_mut().take(nb_public) {
            *q = F::one().neg();
        }
        for (j, gate) in cs.gates().iter().enumerate() {
            let row = nb_public + j;
            ql[row] = gate.ql;
            qr[row] = gate.qr;
            qm[row] = gate.qm;
            qo[row] = gate.qo;
            qk[row] = gate.qk;
            if let Some(i) = gate.committed_by {
                qcp[i][row] = F::one();
            }
        }

        let permutation = compute_permutation(&wire_layout(cs, n), cs.num_vars().max(1));
        let mut sigma = encode_perm_to_group(&permutation, domain);
        let s3 = sigma.split_off(2 * n);
        let s2 = sigma.split_off(n);

        let lagrange = |v: Vec<F>| Polynomial::new(v, Form::LAGRANGE);
        Self {
            ql: lagrange(ql),
            qr: lagrange(qr),
            qm: lagrange(qm),
            qo: lagrange(qo),
            qk: lagrange(qk),
            qcp: qcp.into_iter().map(lagrange).collect(),
            s1: lagrange(sigma),
            s2: lagrange(s2),
            s3: lagrange(s3),
            permutation,
        }
    }

    /// Convert every polynomial to canonical form.
    pub fn into_canonical(self, domain: &FftDomain<F>) -> Result<Self> {
        Ok(Self {
            ql: self.ql.into_canonical(domain)?,
            qr: self.qr.into_canonical(domain)?,
            qm: self.qm.into_canonical(domain)?,
            qo: self.qo.into_canonical(domain)?,
            qk: self.qk.into_canonical(domain)?,
            qcp: self
                .qcp
                .into_iter()
                .map(|q| q.into_canonical(domain))
                .collect::<Result<_>>()?,
            s1: self.s1.into_canonical(domain)?,
            s2: self.s2.into_canonical(domain)?,
            s3: self.s3.into_canonical(domain)?,
            permutation: self.permutation,
        })
    }

    /// The setup polynomials in slot order `ql qr qm qo qk s1 s2 s3 qcp..`.
    pub fn setup_polys(&self) -> Vec<&[F]> {
        let mut polys = vec![
            self.ql.coefs(),
            self.qr.coefs(),
            self.qm.coefs(),
            self.qo.coefs(),
            self.qk.coefs(),
            self.s1.coefs(),
            self.s2.coefs(),
            self.s3.coefs(),
        ];
        polys.extend(self.qcp.iter().map(|q| q.coefs()));
        polys
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plonk::constraint_system::SparseCS;
    use fflonk_algebra::bls12_381::BLSScalar;

    #[test]
    fn permutation_cycles() {
        // variables: 0 at {0, 3}, 1 at {1, 4, 5}, 2 at {2}
        let lro = [0, 1, 2, 0, 1, 1];
        let perm = compute_permutation(&lro, 3);
        assert_eq!(perm, vec![3, 5, 2, 0, 1, 4]);
    }

    #[test]
    fn trace_layout() {
        let mut cs = SparseCS::<BLSScalar>::new(1, 1);
        let y = cs.public_input(0);
        let x = cs.secret_input(0);
        cs.assert_mul(x, x, y);
        let d = FftDomain::<BLSScalar>::new(2).unwrap();
        let trace = Trace::new(&cs, &d);

        let minus_one = BLSScalar::one().neg();
        assert_eq!(trace.ql.coefs(), &[minus_one, BLSScalar::zero()]);
        assert_eq!(trace.qm.coefs(), &[BLSScalar::zero(), BLSScalar::one()]);
        assert_eq!(trace.qo.coefs(), &[BLSScalar::zero(), minus_one]);
        assert!(trace.qcp.is_empty());

        // a = [y, x], b = [y, x], c = [y, y]
        assert_eq!(wire_layout(&cs, 2), vec![0, 1, 0, 1, 0, 0]);
        assert_eq!(trace.permutation, vec![5, 3, 0, 1, 2, 4]);

        let u = d.coset_shift;
        let g = d.generator;
        assert_eq!(trace.s1.coefs(), &[u.square().mul(&g), u.mul(&g)]);
        assert_eq!(trace.s2.coefs(), &[BLSScalar::one(), g]);
        assert_eq!(trace.s3.coefs(), &[u, u.square()]);
        assert_eq!(trace.setup_polys().len(), 8);

        let canonical = trace.clone().into_canonical(&d).unwrap();
        assert_eq!(canonical.ql.form(), Form::CANONICAL);
        assert_eq!(canonical.permutation, trace.permutation);
    }
}
