use crate::errors::{PlonkError, Result};
use crate::plonk::domain::FftDomain;
use crate::poly_commit::{
    field_polynomial::{eval_coefs, FpPolynomial},
    pcs::ToBytes,
};
use fflonk_algebra::prelude::*;
use sha2::{Digest, Sha512};

/// Slot of every polynomial in the folded commitment.
///
/// The setup polynomials come first, then the prover polynomials, then the
/// custom-gate witness polynomials. Slots past the last one are empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slots {
    /// Number of custom-gate commitments.
    pub nb_qcp: usize,
}

impl Slots {
    pub const QL: usize = 0;
    pub const QR: usize = 1;
    pub const QM: usize = 2;
    pub const QO: usize = 3;
    pub const QK: usize = 4;
    pub const S1: usize = 5;
    pub const S2: usize = 6;
    pub const S3: usize = 7;
    /// Number of setup polynomials without custom gates.
    pub const NUM_SETUP: usize = 8;
    /// Number of prover polynomials without custom gates.
    pub const NUM_PROVER: usize = 7;

    pub fn new(nb_qcp: usize) -> Self {
        Self { nb_qcp }
    }

    pub fn qcp(&self, i: usize) -> usize {
        Self::NUM_SETUP + i
    }

    pub fn l(&self) -> usize {
        Self::NUM_SETUP + self.nb_qcp
    }

    pub fn r(&self) -> usize {
        self.l() + 1
    }

    pub fn o(&self) -> usize {
        self.l() + 2
    }

    pub fn z(&self) -> usize {
        self.l() + 3
    }

    /// Chunk `k` of the quotient, `k < 3`.
    pub fn h(&self, k: usize) -> usize {
        self.l() + 4 + k
    }

    /// Witness polynomial of custom-gate commitment `i`.
    pub fn bsb22(&self, i: usize) -> usize {
        Self::NUM_SETUP + Self::NUM_PROVER + self.nb_qcp + i
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        Self::NUM_SETUP + Self::NUM_PROVER + 2 * self.nb_qcp
    }
}

/// The challenges entering the constraint identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlonkChallenges<F> {
    pub gamma: F,
    pub beta: F,
    pub alpha: F,
}

/// Values of every polynomial entering the constraint identity at one point.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PointEvals<F> {
    pub l: F,
    pub r: F,
    pub o: F,
    pub z: F,
    /// `Z(omega * x)`.
    pub z_shifted: F,
    pub ql: F,
    pub qr: F,
    pub qm: F,
    pub qo: F,
    /// Completed constant selector.
    pub qk: F,
    pub s1: F,
    pub s2: F,
    pub s3: F,
    /// `sum_i qcp_i * pi_i`.
    pub custom: F,
}

/// `gate + alpha * ordering + alpha^2 * boundary` at `x`, where `l1` is the
/// first Lagrange polynomial at `x` and `shifts = (u, u^2)`.
pub(crate) fn constraint_numerator<F: Scalar>(
    e: &PointEvals<F>,
    x: &F,
    l1: &F,
    shifts: &(F, F),
    ch: &PlonkChallenges<F>,
) -> F {
    let gate = e.ql * e.l + e.qr * e.r + e.qm * e.l * e.r + e.qo * e.o + e.qk + e.custom;

    let bx = ch.beta * *x;
    let identity = (e.l + bx + ch.gamma)
        * (e.r + bx * shifts.0 + ch.gamma)
        * (e.o + bx * shifts.1 + ch.gamma)
        * e.z_shifted;
    let sigma = (e.l + ch.beta * e.s1 + ch.gamma)
        * (e.r + ch.beta * e.s2 + ch.gamma)
        * (e.o + ch.beta * e.s3 + ch.gamma)
        * e.z;
    let ordering = identity - sigma;

    let boundary = *l1 * (e.z - F::one());

    (boundary * ch.alpha + ordering) * ch.alpha + gate
}

/// Invert every element with a single field inversion.
pub(crate) fn batch_inverse<F: Scalar>(v: &[F]) -> Result<Vec<F>> {
    let mut prefix = Vec::with_capacity(v.len());
    let mut acc = F::one();
    for x in v {
        if x.is_zero() {
            return Err(PlonkError::DivisionByZero);
        }
        prefix.push(acc);
        acc.mul_assign(x);
    }
    let mut inv = acc.inv()?;
    let mut res = vec![F::zero(); v.len()];
    for i in (0..v.len()).rev() {
        res[i] = inv * prefix[i];
        inv.mul_assign(&v[i]);
    }
    Ok(res)
}

/// `L_i(x) = g^i (x^n - 1) / (n (x - g^i))` for every `i` in `indices`.
pub(crate) fn lagrange_evals<F: Domain>(
    domain: &FftDomain<F>,
    indices: &[usize],
    x: &F,
) -> Result<Vec<F>> {
    let vanishing = x.pow(&[domain.cardinality as u64]) - F::one();
    let denominators: Vec<F> = indices
        .iter()
        .map(|i| (*x - domain.element(*i)) * F::from(domain.cardinality as u64))
        .collect();
    Ok(batch_inverse(&denominators)?
        .iter()
        .zip(indices)
        .map(|(d, i)| domain.element(*i) * vanishing * *d)
        .collect())
}

/// Random blinding polynomial of the given degree, zero for `None`.
pub(crate) fn blinding_poly<F: Scalar, R: CryptoRng + RngCore>(
    prng: &mut R,
    degree: Option<usize>,
) -> FpPolynomial<F> {
    match degree {
        Some(d) => FpPolynomial::from_coefs((0..=d).map(|_| F::random(prng)).collect()),
        None => FpPolynomial::zero(),
    }
}

/// Coefficients of `p(X) + b(X)(X^n - 1)`.
pub(crate) fn blind<F: Scalar>(p: &[F], b: &FpPolynomial<F>, n: usize) -> Vec<F> {
    let mut res = p.to_vec();
    if b.is_zero() {
        return res;
    }
    let b = b.get_coefs_ref();
    res.resize(p.len().max(n + b.len()), F::zero());
    for (i, c) in b.iter().enumerate() {
        res[i].sub_assign(c);
        res[n + i].add_assign(c);
    }
    res
}

/// `p(x) + b(x)(x^n - 1)` without building the blinded polynomial.
#[cfg(test)]
pub(crate) fn eval_blinded<F: Scalar>(p: &[F], b: &FpPolynomial<F>, n: usize, x: &F) -> F {
    eval_coefs(p, x) + b.eval(x) * (x.pow(&[n as u64]) - F::one())
}

/// Lagrange values of the grand product
/// `Z[i+1] = Z[i] * prod (v + beta * sigma + gamma) / prod (v + beta * id + gamma)`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_z<F: Domain>(
    l: &[F],
    r: &[F],
    o: &[F],
    s1: &[F],
    s2: &[F],
    s3: &[F],
    beta: &F,
    gamma: &F,
    domain: &FftDomain<F>,
) -> Result<Vec<F>> {
    let n = domain.cardinality;
    let u = domain.coset_shift;
    let u2 = u.square();
    let mut num = Vec::with_capacity(n);
    let mut den = Vec::with_capacity(n);
    for i in 0..n {
        let bx = *beta * domain.element(i);
        num.push(
            (l[i] + *beta * s1[i] + *gamma)
                * (r[i] + *beta * s2[i] + *gamma)
                * (o[i] + *beta * s3[i] + *gamma),
        );
        den.push((l[i] + bx + *gamma) * (r[i] + bx * u + *gamma) * (o[i] + bx * u2 + *gamma));
    }
    let den_inv = batch_inverse(&den)?;
    let mut z = Vec::with_capacity(n);
    z.push(F::one());
    for i in 0..n - 1 {
        z.push(z[i] * num[i] * den_inv[i]);
    }
    Ok(z)
}

/// Field element bound to a custom-gate commitment.
pub(crate) fn hash_commitment_to_field<F: Scalar, C: ToBytes>(commitment: &C) -> F {
    let hasher = Sha512::new()
        .chain_update(b"BSB22-Plonk")
        .chain_update(commitment.to_bytes());
    F::from_hash(hasher)
}

#[cfg(test)]
mod test {
    use super::*;
    use fflonk_algebra::bls12_381::BLSScalar;

    #[test]
    fn slot_layout() {
        let slots = Slots::new(1);
        assert_eq!(slots.qcp(0), 8);
        assert_eq!((slots.l(), slots.r(), slots.o(), slots.z()), (9, 10, 11, 12));
        assert_eq!((slots.h(0), slots.h(2)), (13, 15));
        assert_eq!(slots.bsb22(0), 16);
        assert_eq!(slots.count(), 17);
        assert_eq!(Slots::new(0).count(), 15);

        let slots = Slots::new(2);
        assert_eq!((slots.qcp(0), slots.qcp(1)), (8, 9));
        assert_eq!((slots.l(), slots.z(), slots.h(2)), (10, 13, 17));
        assert_eq!((slots.bsb22(0), slots.bsb22(1)), (17, 18));
        assert_eq!(slots.count(), 19);
    }

    #[test]
    fn inverses() {
        let mut prng = test_rng();
        let v: Vec<BLSScalar> = (0..9).map(|_| BLSScalar::random(&mut prng)).collect();
        let inv = batch_inverse(&v).unwrap();
        for (a, b) in v.iter().zip(inv.iter()) {
            assert_eq!(a.mul(b), BLSScalar::one());
        }
        assert!(batch_inverse::<BLSScalar>(&[]).unwrap().is_empty());
        assert_eq!(
            batch_inverse(&[BLSScalar::one(), BLSScalar::zero()]).unwrap_err(),
            PlonkError::DivisionByZero
        );
    }

    #[test]
    fn lagrange_basis() {
        let mut prng = test_rng();
        let d = FftDomain::<BLSScalar>::new(8).unwrap();
        let x = BLSScalar::random(&mut prng);
        let evals = lagrange_evals(&d, &(0..8).collect::<Vec<_>>(), &x).unwrap();
        // the Lagrange basis sums to one
        assert_eq!(evals.iter().sum::<BLSScalar>(), BLSScalar::one());

        let values: Vec<BLSScalar> = (0..8).map(|_| BLSScalar::random(&mut prng)).collect();
        let coefs = d.ifft(&values).unwrap();
        let direct = eval_coefs(&coefs, &x);
        let interpolated: BLSScalar = values.iter().zip(evals.iter()).map(|(v, l)| *v * *l).sum();
        assert_eq!(direct, interpolated);
    }

    #[test]
    fn blinding_is_transparent_on_the_domain() {
        let mut prng = test_rng();
        let n = 8;
        let d = FftDomain::<BLSScalar>::new(n).unwrap();
        let p: Vec<BLSScalar> = (0..n).map(|_| BLSScalar::random(&mut prng)).collect();
        for degree in [None, Some(0), Some(1), Some(2)] {
            let b = blinding_poly(&mut prng, degree);
            let blinded = blind(&p, &b, n);
            for i in 0..n {
                let x = d.element(i);
                assert_eq!(eval_coefs(&blinded, &x), eval_coefs(&p, &x));
                assert_eq!(eval_blinded(&p, &b, n, &x), eval_coefs(&p, &x));
            }
            let x = BLSScalar::random(&mut prng);
            assert_eq!(eval_coefs(&blinded, &x), eval_blinded(&p, &b, n, &x));
            if degree.is_some() {
                assert_ne!(eval_coefs(&blinded, &x), eval_coefs(&p, &x));
            }
        }
    }

    #[test]
    fn blinding_wider_than_domain() {
        let mut prng = test_rng();
        let n = 2;
        let d = FftDomain::<BLSScalar>::new(n).unwrap();
        for len in [1, 2, 3] {
            let p: Vec<BLSScalar> = (0..len).map(|_| BLSScalar::random(&mut prng)).collect();
            let b = blinding_poly(&mut prng, Some(2));
            let blinded = blind(&p, &b, n);
            assert_eq!(blinded.len(), n + 3);
            for i in 0..n {
                let x = d.element(i);
                assert_eq!(eval_coefs(&blinded, &x), eval_coefs(&p, &x));
            }
            let x = BLSScalar::random(&mut prng);
            let expected = eval_coefs(&p, &x) + b.eval(&x) * (x.square() - BLSScalar::one());
            assert_eq!(eval_coefs(&blinded, &x), expected);
        }
    }

    #[test]
    fn commitment_hash_is_deterministic() {
        struct Bytes(Vec<u8>);
        impl ToBytes for Bytes {
            fn to_bytes(&self) -> Vec<u8> {
                self.0.clone()
            }
        }
        let a: BLSScalar = hash_commitment_to_field(&Bytes(vec![1, 2, 3]));
        let b: BLSScalar = hash_commitment_to_field(&Bytes(vec![1, 2, 3]));
        let c: BLSScalar = hash_commitment_to_field(&Bytes(vec![1, 2, 4]));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
