use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::FftDomain,
    helpers::{
        constraint_numerator, hash_commitment_to_field, lagrange_evals, PlonkChallenges,
        PointEvals, Slots,
    },
    indexer::{PlonkPf, VerifyingKey},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_zeta,
        transcript_get_plonk_challenges_gamma_beta, transcript_init_plonk,
    },
};
use crate::poly_commit::{
    fflonk::batch_verify,
    pcs::{HomomorphicPolyComElem, PolyComScheme},
};
use ark_std::{end_timer, start_timer};
use fflonk_algebra::prelude::*;
use merlin::Transcript;

/// Verify a proof against the public inputs.
///
/// The transcript must be in the same state as the one given to the prover.
pub fn verifier<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerifyingKey<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    if public_inputs.len() != vk.nb_public {
        return Err(PlonkError::InvalidWitnessShape {
            expected: vk.nb_public,
            got: public_inputs.len(),
        });
    }
    let nb_qcp = vk.commitment_constraint_indexes.len();
    let slots = Slots::new(nb_qcp);
    let opening = &proof.batch_opening;
    if proof.bsb22_commitments.len() != nb_qcp
        || opening.claimed_values.len() != 2
        || opening.claimed_values[0].len() != vk.t
        || opening.claimed_values[1].len() != 1
        || slots.count() > vk.t
    {
        return Err(PlonkError::VerificationError);
    }
    let verifier_timer = start_timer!(|| "fflonk verifier");
    let n = vk.size;

    // Step 1: replay the transcript.
    transcript_init_plonk(transcript, vk, public_inputs);
    let (gamma, beta) =
        transcript_get_plonk_challenges_gamma_beta(transcript, &proof.lro_entangled, n);
    let alpha = transcript_get_plonk_challenge_alpha(
        transcript,
        &proof.bsb22_commitments,
        &proof.z_entangled,
        n,
    );
    let zeta: PCS::Field =
        transcript_get_plonk_challenge_zeta(transcript, &proof.h_entangled, n * vk.t);
    let challenges = PlonkChallenges { gamma, beta, alpha };

    // Step 2: the constant selector completed with the public part at xi = zeta^t.
    let domain = FftDomain::<PCS::Field>::new(n)?;
    let xi = zeta.pow(&[vk.t as u64]);
    let values: Vec<PCS::Field> = proof
        .bsb22_commitments
        .iter()
        .map(hash_commitment_to_field)
        .collect();
    let mut rows: Vec<usize> = (0..vk.nb_public).collect();
    rows.extend(
        vk.commitment_constraint_indexes
            .iter()
            .map(|i| vk.nb_public + i),
    );
    rows.push(0);
    let lagrange = lagrange_evals(&domain, &rows, &xi)?;
    let pi: PCS::Field = public_inputs
        .iter()
        .chain(values.iter())
        .zip(lagrange.iter())
        .map(|(v, l)| *v * *l)
        .sum();
    let l1 = lagrange[lagrange.len() - 1];

    // Step 3: the constraint identity at xi.
    let claimed = &opening.claimed_values[0];
    let custom: PCS::Field = (0..nb_qcp)
        .map(|i| claimed[slots.qcp(i)] * claimed[slots.bsb22(i)])
        .sum();
    let e = PointEvals {
        l: claimed[slots.l()],
        r: claimed[slots.r()],
        o: claimed[slots.o()],
        z: claimed[slots.z()],
        z_shifted: opening.claimed_values[1][0],
        ql: claimed[Slots::QL],
        qr: claimed[Slots::QR],
        qm: claimed[Slots::QM],
        qo: claimed[Slots::QO],
        qk: claimed[Slots::QK] + pi,
        s1: claimed[Slots::S1],
        s2: claimed[Slots::S2],
        s3: claimed[Slots::S3],
        custom,
    };
    let shifts = (vk.coset_shift, vk.coset_shift.square());
    let numerator = constraint_numerator(&e, &xi, &l1, &shifts, &challenges);

    let xi_chunk = xi.pow(&[(n + 2) as u64]);
    let h = claimed[slots.h(0)]
        + xi_chunk * claimed[slots.h(1)]
        + xi_chunk.square() * claimed[slots.h(2)];
    let vanishing = xi.pow(&[n as u64]) - PCS::Field::one();
    if numerator != h * vanishing {
        return Err(PlonkError::VerificationError);
    }
    if claimed.iter().skip(slots.count()).any(|v| !v.is_zero()) {
        return Err(PlonkError::VerificationError);
    }

    // Step 4: the batch opening of both digests.
    let mut digest = vk.qpublic.clone();
    digest.add_assign(&proof.lro_entangled);
    digest.add_assign(&proof.z_entangled);
    digest.add_assign(&proof.h_entangled);
    for c in proof.bsb22_commitments.iter() {
        digest.add_assign(c);
    }
    let shifted = vk.generator.mul(&xi);
    let res = batch_verify(
        &vk.pcs,
        transcript,
        &[digest, proof.z.clone()],
        &[zeta, shifted],
        opening,
    );
    end_timer!(verifier_timer);
    res
}
