use crate::errors::{PlonkError, Result};
use fflonk_algebra::prelude::*;
use num_bigint::BigUint;
use num_integer::Integer;

/// Field polynomial in coefficient form, trailing zero coefficients trimmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial, lowest degree first.
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use fflonk_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use fflonk_algebra::bls12_381::BLSScalar;
    /// use fflonk_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BLSScalar>::zero();
    /// let zero = BLSScalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BLSScalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficients are trimmed.
    /// # Example
    /// ```
    /// use fflonk_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use fflonk_algebra::bls12_381::BLSScalar;
    /// use fflonk_algebra::{Zero, One, ops::*};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one.add(&one);
    /// let five = two.add(&two).add(&one);
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..degree + 1).map(|_| F::random(prng)).collect();
        Self::from_coefs(coefs)
    }

    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(F::zero());
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate a polynomial on a point.
    pub fn eval(&self, point: &F) -> F {
        eval_coefs(&self.coefs, point)
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        if self.coefs.len() < other.coefs.len() {
            self.coefs.resize(other.coefs.len(), F::zero());
        }
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self.
    pub fn sub_assign(&mut self, other: &Self) {
        if self.coefs.len() < other.coefs.len() {
            self.coefs.resize(other.coefs.len(), F::zero());
        }
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        self.trim_coefs();
    }

    /// Multiply self by a scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar);
        }
        self.trim_coefs();
    }

    /// Add `coef * X^order` to self.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order].add_assign(coef);
        self.trim_coefs();
    }

    /// Divide by `X^t - c`, failing when the remainder is not zero.
    ///
    /// ```
    /// use fflonk_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use fflonk_algebra::bls12_381::BLSScalar;
    /// use fflonk_algebra::{One, ops::*};
    /// let one = BLSScalar::one();
    /// let two = one.add(&one);
    /// // X^3 - 2X^2 + X - 2 = (X^2 + 1)(X - 2)
    /// let poly = FpPolynomial::from_coefs(vec![two.neg(), one, two.neg(), one]);
    /// let q = poly.exact_div_by_xt_minus_c(1, &two).unwrap();
    /// assert_eq!(q, FpPolynomial::from_coefs(vec![one, BLSScalar::from(0u32), one]));
    /// assert!(poly.exact_div_by_xt_minus_c(1, &one).is_err());
    /// ```
    pub fn exact_div_by_xt_minus_c(&self, t: usize, c: &F) -> Result<Self> {
        let (quotient, remainder) = div_by_xt_minus_c(&self.coefs, t, c);
        if remainder.iter().any(|r| !r.is_zero()) {
            return Err(PlonkError::PCSProveEvalError);
        }
        Ok(Self::from_coefs(quotient))
    }
}

/// Horner evaluation of a coefficient slice.
pub fn eval_coefs<F: Scalar>(coefs: &[F], point: &F) -> F {
    coefs
        .iter()
        .rev()
        .fold(F::zero(), |acc, coef| acc.mul(point).add(coef))
}

/// Divide `a` by `X^t - c`, returning quotient and remainder (length `t`).
pub fn div_by_xt_minus_c<F: Scalar>(a: &[F], t: usize, c: &F) -> (Vec<F>, Vec<F>) {
    if a.len() <= t {
        return (vec![F::zero()], a.to_vec());
    }
    let m = a.len();
    let mut quotient = vec![F::zero(); m - t];
    // a_k = q_{k-t} - c * q_k
    for k in (t..m).rev() {
        let carry = if k < m - t {
            quotient[k].mul(c)
        } else {
            F::zero()
        };
        quotient[k - t] = a[k].add(&carry);
    }
    let remainder = (0..t)
        .map(|k| {
            let carry = if k < m - t {
                quotient[k].mul(c)
            } else {
                F::zero()
            };
            a[k].add(&carry)
        })
        .collect();
    (quotient, remainder)
}

/// Compute the primitive n-th root of unity, if one exists.
pub fn primitive_nth_root_of_unity<F: Scalar>(num_points: usize) -> Option<F> {
    let q_minus_one = F::get_field_size_biguint() - BigUint::from(1u32);
    let (exp, r) = q_minus_one.div_rem(&BigUint::from(num_points));
    if !r.is_zero() {
        None
    } else {
        let g = F::multiplicative_generator();
        Some(g.pow(&exp.to_u64_digits()))
    }
}

/// Return the smallest divisor of `|F| - 1` that is at least `min`.
///
/// Folding `t` polynomials together needs a primitive `t`-th root of unity.
pub fn smallest_root_order_at_least<F: Scalar>(min: usize) -> usize {
    let q_minus_one = F::get_field_size_biguint() - BigUint::from(1u32);
    let mut t = min.max(1);
    while !(&q_minus_one % BigUint::from(t)).is_zero() {
        t += 1;
    }
    t
}

#[cfg(test)]
mod test {
    use super::*;
    use fflonk_algebra::bls12_381::BLSScalar;

    #[test]
    fn arithmetic() {
        let one = BLSScalar::one();
        let two = one.add(&one);
        let mut p = FpPolynomial::from_coefs(vec![one, two, one]);
        let q = FpPolynomial::from_coefs(vec![one, two, one]);
        p.sub_assign(&q);
        assert!(p.is_zero());

        p.add_coef_assign(&two, 4);
        assert_eq!(p.degree(), 4);
        p.mul_scalar_assign(&two.inv().unwrap());
        assert_eq!(p.eval(&two), BLSScalar::from(16u32));

        let mut zero = FpPolynomial::<BLSScalar>::zero();
        zero.add_assign(&q);
        assert_eq!(zero, q);
    }

    #[test]
    fn division_by_xt_minus_c() {
        let mut prng = test_rng();
        let t = 5;
        let c = BLSScalar::random(&mut prng);
        let q = FpPolynomial::<BLSScalar>::random(&mut prng, 12);

        // a = q * (X^t - c)
        let mut a = vec![BLSScalar::zero(); q.coefs.len() + t];
        for (i, qi) in q.coefs.iter().enumerate() {
            a[i + t].add_assign(qi);
            a[i].sub_assign(&qi.mul(&c));
        }
        let a = FpPolynomial::from_coefs(a);
        assert_eq!(a.exact_div_by_xt_minus_c(t, &c).unwrap(), q);

        let mut b = a.clone();
        b.add_coef_assign(&BLSScalar::one(), 0);
        assert!(b.exact_div_by_xt_minus_c(t, &c).is_err());

        let (quo, rem) = div_by_xt_minus_c(&b.coefs, t, &c);
        assert_eq!(FpPolynomial::from_coefs(quo), q);
        assert_eq!(
            FpPolynomial::from_coefs(rem),
            FpPolynomial::from_coefs(vec![BLSScalar::one()])
        );
    }

    #[test]
    fn roots_of_unity() {
        for n in [2usize, 3, 16, 19] {
            let w: BLSScalar = primitive_nth_root_of_unity(n).unwrap();
            assert_eq!(w.pow(&[n as u64]), BLSScalar::one());
            for k in 1..n {
                assert_ne!(w.pow(&[k as u64]), BLSScalar::one());
            }
        }
        assert!(primitive_nth_root_of_unity::<BLSScalar>(5).is_none());
    }

    #[test]
    fn folding_factor_divides_field_order() {
        assert_eq!(smallest_root_order_at_least::<BLSScalar>(15), 16);
        assert_eq!(smallest_root_order_at_least::<BLSScalar>(16), 16);
        assert_eq!(smallest_root_order_at_least::<BLSScalar>(17), 19);
        assert_eq!(smallest_root_order_at_least::<BLSScalar>(1), 1);
    }
}
