//! Folded ("entangled") polynomials and their batch opening.
//!
//! Polynomials `p_0, .., p_{t-1}` are folded into
//! `F(X) = sum_j X^j p_j(X^t)`. Opening `F` at the `t` roots of
//! `X^t - x^t` reveals every `p_j(x^t)` at once. Several folded polynomials,
//! each with its own point, are opened together with a single pair of group
//! elements.

use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::{div_by_xt_minus_c, eval_coefs, smallest_root_order_at_least, FpPolynomial},
    pcs::{HomomorphicPolyComElem, PolyComScheme},
    transcript::PolyComTranscript,
};
use ark_std::{end_timer, start_timer};
use fflonk_algebra::prelude::*;
use merlin::Transcript;

/// Batch opening proof of folded polynomials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FflonkOpeningProof<C, F> {
    /// `claimed_values[i][j]` is polynomial `j` of set `i` evaluated at `points[i]^t_i`.
    pub claimed_values: Vec<Vec<F>>,
    /// Commitment to `sum_i gamma^i (F_i - r_i) / (X^t_i - x_i^t_i)`.
    pub w: C,
    /// Commitment to the linearised quotient by `X - z`.
    pub w_prime: C,
}

/// Type alias for the opening proof of a given scheme.
pub type FflonkOpening<PCS> =
    FflonkOpeningProof<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Interleave `polys` so that coefficient `i` of polynomial `j` lands at `i * t + j`.
///
/// Missing polynomials (when `polys.len() < t`) are zero.
pub fn fold<F: Scalar>(polys: &[&[F]], t: usize) -> Vec<F> {
    let max_len = polys.iter().map(|p| p.len()).max().unwrap_or(0);
    let mut folded = vec![F::zero(); max_len * t];
    for (j, p) in polys.iter().enumerate() {
        for (i, c) in p.iter().enumerate() {
            folded[i * t + j] = *c;
        }
    }
    folded
}

/// Folding factor used for a set of `num_polys` polynomials.
pub fn folding_factor<F: Scalar>(num_polys: usize) -> usize {
    smallest_root_order_at_least::<F>(num_polys)
}

fn init_batch_opening_transcript<C, F>(
    transcript: &mut Transcript,
    digests: &[C],
    points: &[F],
    claimed_values: &[Vec<F>],
) where
    C: crate::poly_commit::pcs::ToBytes,
    F: Scalar,
{
    transcript.append_message(b"Domain Separator", b"Fflonk batch opening");
    for digest in digests {
        transcript.append_commitment(digest);
    }
    for point in points {
        transcript.append_field_elem(point);
    }
    for values in claimed_values {
        transcript.append_u64(b"set size", values.len() as u64);
        for v in values {
            transcript.append_field_elem(v);
        }
    }
}

/// `Z_{T \ S_i}(z)` for every `i`, together with `Z_T(z)`.
fn vanishing_evals<F: Scalar>(z: &F, folding: &[usize], xis: &[F]) -> (Vec<F>, F) {
    let per_set: Vec<F> = folding
        .iter()
        .zip(xis)
        .map(|(t, xi)| z.pow(&[*t as u64]).sub(xi))
        .collect();
    let all = per_set.iter().fold(F::one(), |acc, v| acc.mul(v));
    let others = (0..per_set.len())
        .map(|i| {
            per_set
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != i)
                .fold(F::one(), |acc, (_, v)| acc.mul(v))
        })
        .collect();
    (others, all)
}

/// Open every set of polynomials at its point.
///
/// `sets[i]` lists the polynomials (coefficient form) folded into `digests[i]`,
/// in slot order. The caller is responsible for `digests[i]` being the
/// commitment of `fold(sets[i], folding_factor(sets[i].len()))`.
pub fn batch_open<PCS: PolyComScheme>(
    pcs: &PCS,
    transcript: &mut Transcript,
    sets: &[Vec<&[PCS::Field]>],
    digests: &[PCS::Commitment],
    points: &[PCS::Field],
) -> Result<FflonkOpening<PCS>> {
    if sets.len() != digests.len() || sets.len() != points.len() || sets.is_empty() {
        return Err(PlonkError::Message(format!(
            "batch opening over {} sets, {} digests, {} points",
            sets.len(),
            digests.len(),
            points.len()
        )));
    }
    let open_time = start_timer!(|| "fflonk batch opening");

    let folding: Vec<usize> = sets
        .iter()
        .map(|s| folding_factor::<PCS::Field>(s.len()))
        .collect();
    let folded: Vec<Vec<PCS::Field>> = sets
        .iter()
        .zip(folding.iter())
        .map(|(s, t)| fold(s, *t))
        .collect();
    let xis: Vec<PCS::Field> = points
        .iter()
        .zip(folding.iter())
        .map(|(x, t)| x.pow(&[*t as u64]))
        .collect();
    let claimed_values: Vec<Vec<PCS::Field>> = sets
        .iter()
        .zip(xis.iter())
        .map(|(s, xi)| s.iter().map(|p| eval_coefs(p, xi)).collect())
        .collect();

    init_batch_opening_transcript(transcript, digests, points, &claimed_values);
    let gamma: PCS::Field = transcript.get_challenge_field_elem(b"fflonk gamma");

    // W = sum_i gamma^i (F_i - r_i) / (X^t_i - xi_i)
    let mut w = FpPolynomial::zero();
    let mut gamma_i = PCS::Field::one();
    for ((f, values), (t, xi)) in folded
        .iter()
        .zip(claimed_values.iter())
        .zip(folding.iter().zip(xis.iter()))
    {
        let mut f_minus_r = f.clone();
        if f_minus_r.len() < values.len() {
            f_minus_r.resize(values.len(), PCS::Field::zero());
        }
        for (c, v) in f_minus_r.iter_mut().zip(values.iter()) {
            c.sub_assign(v);
        }
        let (quotient, remainder) = div_by_xt_minus_c(&f_minus_r, *t, xi);
        if remainder.iter().any(|r| !r.is_zero()) {
            return Err(PlonkError::PCSProveEvalError);
        }
        let mut quotient = FpPolynomial::from_coefs(quotient);
        quotient.mul_scalar_assign(&gamma_i);
        w.add_assign(&quotient);
        gamma_i.mul_assign(&gamma);
    }
    let w_com = pcs.commit(w.get_coefs_ref())?;
    transcript.append_commitment(&w_com);
    let z: PCS::Field = transcript.get_challenge_field_elem(b"fflonk z");

    // L = sum_i gamma^i Z_{T\S_i}(z) (F_i - r_i(z)) - Z_T(z) W
    let (others, all) = vanishing_evals(&z, &folding, &xis);
    let mut l = w.clone();
    l.mul_scalar_assign(&all.neg());
    let mut gamma_i = PCS::Field::one();
    for ((f, values), other) in folded.iter().zip(claimed_values.iter()).zip(others.iter()) {
        let r_at_z = eval_coefs(values, &z);
        let mut term = FpPolynomial::from_coefs(f.clone());
        term.add_coef_assign(&r_at_z.neg(), 0);
        term.mul_scalar_assign(&gamma_i.mul(other));
        l.add_assign(&term);
        gamma_i.mul_assign(&gamma);
    }
    let w_prime = l.exact_div_by_xt_minus_c(1, &z)?;
    let w_prime_com = pcs.commit(w_prime.get_coefs_ref())?;

    end_timer!(open_time);
    Ok(FflonkOpeningProof {
        claimed_values,
        w: w_com,
        w_prime: w_prime_com,
    })
}

/// Verify a batch opening produced by [`batch_open`].
pub fn batch_verify<PCS: PolyComScheme>(
    pcs: &PCS,
    transcript: &mut Transcript,
    digests: &[PCS::Commitment],
    points: &[PCS::Field],
    proof: &FflonkOpening<PCS>,
) -> Result<()> {
    if proof.claimed_values.len() != digests.len()
        || digests.len() != points.len()
        || digests.is_empty()
    {
        return Err(PlonkError::VerificationError);
    }
    let folding: Vec<usize> = proof
        .claimed_values
        .iter()
        .map(|v| folding_factor::<PCS::Field>(v.len()))
        .collect();
    let xis: Vec<PCS::Field> = points
        .iter()
        .zip(folding.iter())
        .map(|(x, t)| x.pow(&[*t as u64]))
        .collect();

    init_batch_opening_transcript(transcript, digests, points, &proof.claimed_values);
    let gamma: PCS::Field = transcript.get_challenge_field_elem(b"fflonk gamma");
    transcript.append_commitment(&proof.w);
    let z: PCS::Field = transcript.get_challenge_field_elem(b"fflonk z");

    let (others, all) = vanishing_evals(&z, &folding, &xis);
    let mut folded = proof.w.mul(&all.neg());
    let mut value_sum = PCS::Field::zero();
    let mut gamma_i = PCS::Field::one();
    for ((digest, values), other) in digests
        .iter()
        .zip(proof.claimed_values.iter())
        .zip(others.iter())
    {
        let scalar = gamma_i.mul(other);
        folded.add_assign(&digest.mul(&scalar));
        value_sum.add_assign(&eval_coefs(values, &z).mul(&scalar));
        gamma_i.mul_assign(&gamma);
    }
    folded.sub_assign(&pcs.commit(&[value_sum])?);

    pcs.check_opening(&folded, &proof.w_prime, &z)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::poly_commit::kzg_poly_com::KZGCommitmentSchemeBLS;
    use fflonk_algebra::bls12_381::BLSScalar;
    use rand_chacha::ChaChaRng;

    fn random_polys(prng: &mut ChaChaRng, count: usize, len: usize) -> Vec<Vec<BLSScalar>> {
        (0..count)
            .map(|_| (0..len).map(|_| BLSScalar::random(prng)).collect())
            .collect()
    }

    #[test]
    fn folded_polynomial_evaluates_constituents() {
        let mut prng = ChaChaRng::from_seed([7u8; 32]);
        let polys = random_polys(&mut prng, 3, 4);
        let refs: Vec<&[BLSScalar]> = polys.iter().map(|p| p.as_slice()).collect();
        let t = folding_factor::<BLSScalar>(refs.len());
        assert_eq!(t, 3);
        let folded = fold(&refs, t);

        let x = BLSScalar::random(&mut prng);
        let xi = x.pow(&[t as u64]);
        // F(x) = sum_j x^j p_j(x^t)
        let mut expected = BLSScalar::zero();
        let mut x_j = BLSScalar::one();
        for p in &polys {
            expected.add_assign(&x_j.mul(&eval_coefs(p, &xi)));
            x_j.mul_assign(&x);
        }
        assert_eq!(eval_coefs(&folded, &x), expected);
    }

    fn open_two_sets(seed: u8) -> (KZGCommitmentSchemeBLS, Vec<KZGCommitment>, Vec<BLSScalar>, FflonkOpening<KZGCommitmentSchemeBLS>) {
        let mut prng = ChaChaRng::from_seed([seed; 32]);
        let set_0 = random_polys(&mut prng, 5, 6);
        let set_1 = random_polys(&mut prng, 1, 9);
        let t_0 = folding_factor::<BLSScalar>(set_0.len());
        let pcs = KZGCommitmentSchemeBLS::new(t_0 * 6, &mut prng);

        let refs_0: Vec<&[BLSScalar]> = set_0.iter().map(|p| p.as_slice()).collect();
        let refs_1: Vec<&[BLSScalar]> = set_1.iter().map(|p| p.as_slice()).collect();
        let digests = vec![
            pcs.commit(&fold(&refs_0, t_0)).unwrap(),
            pcs.commit(&set_1[0]).unwrap(),
        ];
        let points = vec![BLSScalar::random(&mut prng), BLSScalar::random(&mut prng)];

        let mut transcript = Transcript::new(b"test");
        let proof = batch_open(
            &pcs,
            &mut transcript,
            &[refs_0, refs_1],
            &digests,
            &points,
        )
        .unwrap();
        assert_eq!(proof.claimed_values[0].len(), 5);
        assert_eq!(
            proof.claimed_values[1][0],
            eval_coefs(&set_1[0], &points[1])
        );
        (pcs, digests, points, proof)
    }

    type KZGCommitment = <KZGCommitmentSchemeBLS as PolyComScheme>::Commitment;

    #[test]
    fn batch_open_and_verify() {
        let (pcs, digests, points, proof) = open_two_sets(8);
        let verifier = pcs.shrink_to_verifier_only();
        let mut transcript = Transcript::new(b"test");
        assert!(batch_verify(&verifier, &mut transcript, &digests, &points, &proof).is_ok());

        // The transcript has to be replayed from the same state.
        let mut transcript = Transcript::new(b"other");
        assert!(batch_verify(&verifier, &mut transcript, &digests, &points, &proof).is_err());
    }

    #[test]
    fn tampered_openings_are_rejected() {
        let (pcs, digests, points, proof) = open_two_sets(9);

        let mut bad = proof.clone();
        bad.claimed_values[0][2].add_assign(&BLSScalar::one());
        let mut transcript = Transcript::new(b"test");
        assert!(batch_verify(&pcs, &mut transcript, &digests, &points, &bad).is_err());

        let mut bad_digests = digests.clone();
        bad_digests[1] = bad_digests[1].add(&KZGCommitment::get_base());
        let mut transcript = Transcript::new(b"test");
        assert!(batch_verify(&pcs, &mut transcript, &bad_digests, &points, &proof).is_err());

        let mut bad_points = points.clone();
        bad_points.swap(0, 1);
        let mut transcript = Transcript::new(b"test");
        assert!(batch_verify(&pcs, &mut transcript, &digests, &bad_points, &proof).is_err());

        let mut bad = proof;
        bad.claimed_values.pop();
        let mut transcript = Transcript::new(b"test");
        assert_eq!(
            batch_verify(&pcs, &mut transcript, &digests, &points, &bad),
            Err(PlonkError::VerificationError)
        );
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let mut prng = ChaChaRng::from_seed([10u8; 32]);
        let pcs = KZGCommitmentSchemeBLS::new(16, &mut prng);
        let p = random_polys(&mut prng, 1, 4);
        let digest = pcs.commit(&p[0]).unwrap();
        let mut transcript = Transcript::new(b"test");
        let res = batch_open(
            &pcs,
            &mut transcript,
            &[vec![p[0].as_slice()]],
            &[digest.clone(), digest],
            &[BLSScalar::one()],
        );
        assert!(res.is_err());
    }
}
