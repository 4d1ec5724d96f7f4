//! The quotient `H = (gate + alpha * ordering + alpha^2 * boundary) / (X^n - 1)`.
//!
//! The numerator has degree close to `4n`, so it is evaluated on the large
//! domain, shifted by `u` and split into `rho` cosets `c_i<g>` of the small
//! domain with `c_i = u * w^i` (`w` generating the large domain). Coset `i`
//! is obtained with small FFTs of the inputs scaled by powers of `c_i`; its
//! `k`-th value lands at position `bitrev(rho * k + i)` of the large buffer,
//! which is then interpolated in one go.

use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::{Domains, FftDomain},
    helpers::{batch_inverse, constraint_numerator, PlonkChallenges, PointEvals},
    polynomial::{Basis, Form, Layout, Polynomial},
};
use crate::poly_commit::field_polynomial::{eval_coefs, FpPolynomial};
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer};
use fflonk_algebra::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything the numerator depends on, in canonical form.
///
/// `l, r, o, z` are the unblinded polynomials of degree below `n`; their
/// blinding polynomials are listed separately.
pub(crate) struct QuotientInputs<'a, F> {
    pub ql: &'a [F],
    pub qr: &'a [F],
    pub qm: &'a [F],
    pub qo: &'a [F],
    /// Completed constant selector.
    pub qk: &'a [F],
    pub s1: &'a [F],
    pub s2: &'a [F],
    pub s3: &'a [F],
    pub qcp: Vec<&'a [F]>,
    /// Custom-gate witness polynomials, same order as `qcp`.
    pub pi2: Vec<&'a [F]>,
    pub l: &'a [F],
    pub r: &'a [F],
    pub o: &'a [F],
    pub z: &'a [F],
    pub bl: &'a FpPolynomial<F>,
    pub br: &'a FpPolynomial<F>,
    pub bo: &'a FpPolynomial<F>,
    pub bz: &'a FpPolynomial<F>,
}

/// Multiply coefficient `j` of `coefs` by `factor * c^j`.
pub(crate) fn scale_coefs<F: Scalar>(coefs: &mut [F], c: &F, factor: &F) {
    let mut acc = *factor;
    for x in coefs.iter_mut() {
        x.mul_assign(&acc);
        acc.mul_assign(c);
    }
}

/// Values of `p(c * g^k)` for every `k`.
fn coset_evals<F: Domain>(p: &[F], c: &F, domain: &FftDomain<F>) -> Result<Vec<F>> {
    let mut scaled = p.to_vec();
    scale_coefs(&mut scaled, c, &F::one());
    domain.fft(&scaled)
}

/// Values of the numerator on the large domain, shifted, in bit-reversed order.
pub(crate) fn evaluate_numerator<F: Domain>(
    inputs: &QuotientInputs<F>,
    challenges: &PlonkChallenges<F>,
    domains: &Domains<F>,
) -> Result<Vec<F>> {
    let small = &domains.small;
    let large = &domains.large;
    let n = small.cardinality;
    let rho = domains.rho;
    let shift = small.coset_shift;
    let shifts = (shift, shift.square());
    let n_field = F::from(n as u64);

    let mut polys = vec![
        inputs.ql, inputs.qr, inputs.qm, inputs.qo, inputs.qk, inputs.s1, inputs.s2, inputs.s3,
        inputs.l, inputs.r, inputs.o, inputs.z,
    ];
    polys.extend(inputs.qcp.iter());
    polys.extend(inputs.pi2.iter());
    let nb_qcp = inputs.qcp.len();

    // scratch blinding polynomials, scaled and restored on every coset
    let mut blinding: Vec<Vec<F>> = [inputs.bl, inputs.br, inputs.bo, inputs.bz]
        .iter()
        .map(|b| b.get_coefs_ref().to_vec())
        .collect();

    let mut cres = vec![F::zero(); large.cardinality];
    for i in 0..rho {
        let c = shift.mul(&large.element(i));
        let vanishing = c.pow(&[n as u64]) - F::one();
        let c_inv = c.inv()?;
        let vanishing_inv = vanishing.inv()?;

        let evals = cfg_iter!(polys)
            .map(|p| coset_evals(p, &c, small))
            .collect::<Result<Vec<Vec<F>>>>()?;

        // (c^n - 1) * b(c * g^k)
        for b in blinding.iter_mut() {
            scale_coefs(b, &c, &vanishing);
        }
        let blinding_evals: Vec<Vec<F>> = blinding
            .iter()
            .map(|b| small.twiddles().iter().map(|w| eval_coefs(b, w)).collect())
            .collect();
        for b in blinding.iter_mut() {
            scale_coefs(b, &c_inv, &vanishing_inv);
        }

        let denominators: Vec<F> = small
            .twiddles()
            .iter()
            .map(|w| (c * *w - F::one()) * n_field)
            .collect();
        let l1: Vec<F> = batch_inverse(&denominators)?
            .into_iter()
            .map(|d| d * vanishing)
            .collect();

        let values: Vec<F> = cfg_into_iter!(0..n)
            .map(|k| {
                let next = (k + 1) % n;
                let custom = (0..nb_qcp)
                    .map(|j| evals[12 + j][k] * evals[12 + nb_qcp + j][k])
                    .sum();
                let e = PointEvals {
                    ql: evals[0][k],
                    qr: evals[1][k],
                    qm: evals[2][k],
                    qo: evals[3][k],
                    qk: evals[4][k],
                    s1: evals[5][k],
                    s2: evals[6][k],
                    s3: evals[7][k],
                    l: evals[8][k] + blinding_evals[0][k],
                    r: evals[9][k] + blinding_evals[1][k],
                    o: evals[10][k] + blinding_evals[2][k],
                    z: evals[11][k] + blinding_evals[3][k],
                    z_shifted: evals[11][next] + blinding_evals[3][next],
                    custom,
                };
                let x = c * small.element(k);
                constraint_numerator(&e, &x, &l1[k], &shifts, challenges)
            })
            .collect();

        for (k, v) in values.into_iter().enumerate() {
            cres[bit_reverse_index(rho * k + i, large.log_cardinality)] = v;
        }
    }
    Ok(cres)
}

/// Divide bit-reversed numerator values by `X^n - 1` and interpolate.
///
/// Returns the `3(n + 2)` coefficients of the quotient.
pub(crate) fn divide_by_vanishing<F: Domain>(
    mut cres: Vec<F>,
    domains: &Domains<F>,
) -> Result<Vec<F>> {
    let small = &domains.small;
    let large = &domains.large;
    let n = small.cardinality;
    let rho = domains.rho;

    // (u w^m)^n only depends on m mod rho
    let vanishing: Vec<F> = (0..rho)
        .map(|i| {
            small
                .coset_shift
                .mul(&large.element(i))
                .pow(&[n as u64])
                - F::one()
        })
        .collect();
    let vanishing_inv = batch_inverse(&vanishing)?;
    for (pos, v) in cres.iter_mut().enumerate() {
        let m = bit_reverse_index(pos, large.log_cardinality);
        v.mul_assign(&vanishing_inv[m % rho]);
    }

    let form = Form {
        basis: Basis::LagrangeCoset,
        layout: Layout::BitReversed,
    };
    let mut h = Polynomial::new(cres, form).into_canonical(large)?.into_coefs();
    let len = 3 * (n + 2);
    if h.iter().skip(len).any(|c| !c.is_zero()) {
        return Err(PlonkError::DegreeError);
    }
    h.resize(len, F::zero());
    Ok(h)
}

/// Compute the quotient polynomial.
pub(crate) fn compute_quotient<F: Domain>(
    inputs: &QuotientInputs<F>,
    challenges: &PlonkChallenges<F>,
    domains: &Domains<F>,
) -> Result<Vec<F>> {
    let quotient_time = start_timer!(|| "compute quotient");
    let cres = evaluate_numerator(inputs, challenges, domains)?;
    let h = divide_by_vanishing(cres, domains)?;
    end_timer!(quotient_time);
    Ok(h)
}

/// Split `H` into `H1 + X^{n+2} H2 + X^{2(n+2)} H3`.
pub(crate) fn split_quotient<F: Scalar>(h: &[F], n: usize) -> [Vec<F>; 3] {
    let chunk = n + 2;
    let part = |k: usize| -> Vec<F> {
        let mut v: Vec<F> = h.iter().skip(k * chunk).take(chunk).copied().collect();
        v.resize(chunk, F::zero());
        v
    };
    [part(0), part(1), part(2)]
}
