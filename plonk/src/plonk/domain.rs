use crate::errors::{PlonkError, Result};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use fflonk_algebra::prelude::*;

/// A multiplicative subgroup of power-of-two order with cached twiddles.
#[derive(Clone, Debug)]
pub struct FftDomain<F: Domain> {
    inner: Radix2EvaluationDomain<F::Field>,
    /// Number of elements.
    pub cardinality: usize,
    /// `log2(cardinality)`.
    pub log_cardinality: u32,
    /// Generator of the subgroup.
    pub generator: F,
    /// Inverse of the generator.
    pub generator_inv: F,
    /// `1 / cardinality`.
    pub cardinality_inv: F,
    /// Shift of the multiplicative cosets `u<g>`, `u^2<g>`, and of the
    /// evaluation coset of the quotient.
    pub coset_shift: F,
    twiddles: Vec<F>,
}

impl<F: Domain> FftDomain<F> {
    /// Build the subgroup of order `size`, which has to be a power of two.
    pub fn new(size: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(PlonkError::GroupNotFound(size));
        }
        let inner = Radix2EvaluationDomain::<F::Field>::new(size)
            .filter(|d| d.size() == size)
            .ok_or(PlonkError::GroupNotFound(size))?;
        let generator = F::from_field(inner.group_gen());
        let mut twiddles = Vec::with_capacity(size);
        let mut w = F::one();
        for _ in 0..size {
            twiddles.push(w);
            w.mul_assign(&generator);
        }
        Ok(Self {
            cardinality: size,
            log_cardinality: size.trailing_zeros(),
            generator,
            generator_inv: F::from_field(inner.group_gen_inv()),
            cardinality_inv: F::from_field(inner.size_inv()),
            coset_shift: F::multiplicative_generator(),
            twiddles,
            inner,
        })
    }

    /// `generator^i`.
    pub fn element(&self, i: usize) -> F {
        self.twiddles[i % self.cardinality]
    }

    /// All elements in order `1, g, g^2, ..`.
    pub fn twiddles(&self) -> &[F] {
        &self.twiddles
    }

    /// Evaluate coefficients on the subgroup, regular order.
    pub fn fft(&self, coefs: &[F]) -> Result<Vec<F>> {
        if coefs.len() > self.cardinality {
            return Err(PlonkError::DegreeError);
        }
        let mut v: Vec<F::Field> = coefs.iter().map(|c| c.get_field()).collect();
        self.inner.fft_in_place(&mut v);
        Ok(v.into_iter().map(F::from_field).collect())
    }

    /// Interpolate regular-order evaluations into coefficients.
    pub fn ifft(&self, evals: &[F]) -> Result<Vec<F>> {
        if evals.len() != self.cardinality {
            return Err(PlonkError::InvalidPolynomialForm);
        }
        let mut v: Vec<F::Field> = evals.iter().map(|c| c.get_field()).collect();
        self.inner.ifft_in_place(&mut v);
        Ok(v.into_iter().map(F::from_field).collect())
    }
}

/// The two domains a proof works over.
#[derive(Clone, Debug)]
pub struct Domains<F: Domain> {
    /// Sized to the trace.
    pub small: FftDomain<F>,
    /// Holds the quotient numerator, `rho` times the small domain.
    pub large: FftDomain<F>,
    /// `|large| / |small|`.
    pub rho: usize,
}

impl<F: Domain> Domains<F> {
    /// Domains for a trace of `size_system = constraints + public inputs` rows.
    pub fn new(size_system: usize) -> Result<Self> {
        let n = size_system.next_power_of_two();
        if size_system < 2 {
            return Err(PlonkError::DegenerateCircuit(size_system));
        }
        let blowup = if size_system < 6 { 8 } else { 4 };
        let big = (blowup * size_system).next_power_of_two();
        let small = FftDomain::new(n)?;
        let large = FftDomain::new(big)?;
        Ok(Self {
            rho: big / n,
            small,
            large,
        })
    }
}
