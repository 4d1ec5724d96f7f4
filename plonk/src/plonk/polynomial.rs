//! Vectors of field elements tagged with the basis and the ordering they are
//! expressed in. Conversions consume the value and hand back a new tag, so a
//! stale form cannot be read by mistake.

use crate::errors::{PlonkError, Result};
use crate::plonk::domain::FftDomain;
use fflonk_algebra::prelude::*;

/// What the entries of a [`Polynomial`] are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Basis {
    /// Monomial coefficients.
    Canonical,
    /// Evaluations on the subgroup.
    Lagrange,
    /// Evaluations on the shifted subgroup `u<g>`.
    LagrangeCoset,
}

/// Order of the entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Index `i` holds entry `i`.
    Regular,
    /// Index `i` holds entry `bitrev(i)`.
    BitReversed,
}

/// Basis and layout of a [`Polynomial`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Form {
    pub basis: Basis,
    pub layout: Layout,
}

impl Form {
    pub const CANONICAL: Form = Form {
        basis: Basis::Canonical,
        layout: Layout::Regular,
    };
    pub const LAGRANGE: Form = Form {
        basis: Basis::Lagrange,
        layout: Layout::Regular,
    };
    pub const LAGRANGE_COSET: Form = Form {
        basis: Basis::LagrangeCoset,
        layout: Layout::Regular,
    };
}

/// A polynomial together with its representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<F> {
    coefs: Vec<F>,
    form: Form,
}

/// Permute `v` by bit-reversing the indices. `v.len()` must be a power of two.
pub fn bit_reverse<T>(v: &mut [T]) {
    let log = v.len().trailing_zeros();
    for i in 0..v.len() {
        let j = bit_reverse_index(i, log);
        if i < j {
            v.swap(i, j);
        }
    }
}

impl<F: Domain> Polynomial<F> {
    pub fn new(coefs: Vec<F>, form: Form) -> Self {
        Self { coefs, form }
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn coefs(&self) -> &[F] {
        &self.coefs
    }

    pub fn into_coefs(self) -> Vec<F> {
        self.coefs
    }

    pub fn len(&self) -> usize {
        self.coefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefs.is_empty()
    }

    /// Borrow the entries, failing unless they are in `form`.
    pub fn expect_form(&self, form: Form) -> Result<&[F]> {
        if self.form != form {
            return Err(PlonkError::InvalidPolynomialForm);
        }
        Ok(&self.coefs)
    }

    pub fn into_regular(mut self) -> Self {
        if self.form.layout == Layout::BitReversed {
            bit_reverse(&mut self.coefs);
            self.form.layout = Layout::Regular;
        }
        self
    }

    pub fn into_bit_reversed(mut self) -> Self {
        if self.form.layout == Layout::Regular {
            bit_reverse(&mut self.coefs);
            self.form.layout = Layout::BitReversed;
        }
        self
    }

    /// Interpolate into monomial coefficients, regular layout.
    pub fn into_canonical(self, domain: &FftDomain<F>) -> Result<Self> {
        let basis = self.form.basis;
        let p = self.into_regular();
        match basis {
            Basis::Canonical => Ok(p),
            Basis::Lagrange => Ok(Self::new(domain.ifft(&p.coefs)?, Form::CANONICAL)),
            Basis::LagrangeCoset => {
                let mut coefs = domain.ifft(&p.coefs)?;
                let shift_inv = domain.coset_shift.inv()?;
                let mut acc = F::one();
                for c in coefs.iter_mut() {
                    c.mul_assign(&acc);
                    acc.mul_assign(&shift_inv);
                }
                Ok(Self::new(coefs, Form::CANONICAL))
            }
        }
    }

    /// Evaluate on the subgroup, regular layout.
    pub fn into_lagrange(self, domain: &FftDomain<F>) -> Result<Self> {
        match self.form.basis {
            Basis::Lagrange => Ok(self.into_regular()),
            Basis::Canonical => {
                let p = self.into_regular();
                Ok(Self::new(domain.fft(&p.coefs)?, Form::LAGRANGE))
            }
            Basis::LagrangeCoset => Err(PlonkError::InvalidPolynomialForm),
        }
    }

    /// Evaluate on the coset `u<g>`, regular layout.
    pub fn into_lagrange_coset(self, domain: &FftDomain<F>) -> Result<Self> {
        match self.form.basis {
            Basis::LagrangeCoset => Ok(self.into_regular()),
            Basis::Canonical => {
                let mut coefs = self.into_regular().coefs;
                let mut acc = F::one();
                for c in coefs.iter_mut() {
                    c.mul_assign(&acc);
                    acc.mul_assign(&domain.coset_shift);
                }
                Ok(Self::new(domain.fft(&coefs)?, Form::LAGRANGE_COSET))
            }
            Basis::Lagrange => Err(PlonkError::InvalidPolynomialForm),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::poly_commit::field_polynomial::eval_coefs;
    use fflonk_algebra::bls12_381::BLSScalar;

    fn random_coefs(n: usize) -> Vec<BLSScalar> {
        let mut prng = test_rng();
        (0..n).map(|_| BLSScalar::random(&mut prng)).collect()
    }

    #[test]
    fn bit_reversal_is_an_involution() {
        let mut v: Vec<usize> = (0..8).collect();
        bit_reverse(&mut v);
        assert_eq!(v, vec![0, 4, 2, 6, 1, 5, 3, 7]);
        bit_reverse(&mut v);
        assert_eq!(v, (0..8).collect::<Vec<_>>());

        let p = Polynomial::new(random_coefs(8), Form::LAGRANGE);
        let q = p.clone().into_bit_reversed();
        assert_eq!(q.form().layout, Layout::BitReversed);
        assert_ne!(q.coefs(), p.coefs());
        assert_eq!(q.into_regular(), p);
    }

    #[test]
    fn conversions() {
        let d = FftDomain::<BLSScalar>::new(8).unwrap();
        let coefs = random_coefs(8);
        let p = Polynomial::new(coefs.clone(), Form::CANONICAL);

        let lagrange = p.clone().into_lagrange(&d).unwrap();
        assert_eq!(lagrange.form(), Form::LAGRANGE);
        assert_eq!(lagrange.coefs()[3], eval_coefs(&coefs, &d.element(3)));
        assert_eq!(lagrange.clone().into_canonical(&d).unwrap(), p);

        let coset = p.clone().into_lagrange_coset(&d).unwrap();
        let x = d.coset_shift.mul(&d.element(5));
        assert_eq!(coset.coefs()[5], eval_coefs(&coefs, &x));
        let back = coset.clone().into_bit_reversed().into_canonical(&d).unwrap();
        assert_eq!(back, p);

        assert_eq!(
            coset.clone().into_lagrange(&d).unwrap_err(),
            PlonkError::InvalidPolynomialForm
        );
        assert_eq!(
            lagrange.into_lagrange_coset(&d).unwrap_err(),
            PlonkError::InvalidPolynomialForm
        );
        assert!(coset.expect_form(Form::CANONICAL).is_err());
        assert!(p.expect_form(Form::CANONICAL).is_ok());
    }
}
