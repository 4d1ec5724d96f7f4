use crate::plonk::indexer::VerifyingKey;
use crate::poly_commit::{
    pcs::{PolyComScheme, ToBytes},
    transcript::PolyComTranscript,
};
use fflonk_algebra::prelude::*;
use merlin::Transcript;
use rand_chacha::ChaChaRng;

/// Initialize the transcript of a proof with the verifying key and the
/// public inputs.
pub(crate) fn transcript_init_plonk<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerifyingKey<PCS>,
    public_inputs: &[PCS::Field],
) {
    transcript.append_message(b"New Domain", b"fflonk PLONK");

    transcript.append_u64(b"CS size", vk.size as u64);
    transcript.append_u64(b"public inputs", vk.nb_public as u64);
    transcript.append_u64(b"folding factor", vk.t as u64);
    transcript.append_field_elem(&vk.generator);
    transcript.append_field_elem(&vk.coset_shift);
    transcript.append_commitment(&vk.qpublic);
    for index in vk.commitment_constraint_indexes.iter() {
        transcript.append_u64(b"commitment index", *index as u64);
    }

    for value in public_inputs.iter() {
        transcript.append_field_elem(value);
    }
}

/// Return the challenge result, rejecting `group_order`-th roots of unity.
pub(crate) fn transcript_get_challenge_field_elem<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
    label: &'static [u8],
) -> F {
    let mut buff = [0u8; 32];
    transcript.challenge_bytes(label, &mut buff);
    let mut prng = ChaChaRng::from_seed(buff);
    loop {
        let elem = F::random(&mut prng);
        if elem.pow(&[group_order as u64]) != F::one() {
            return elem;
        }
    }
}

/// Bind the entangled `L, R, O` commitment, then derive gamma and beta.
pub(crate) fn transcript_get_plonk_challenges_gamma_beta<C: ToBytes, F: Scalar>(
    transcript: &mut Transcript,
    lro_entangled: &C,
    group_order: usize,
) -> (F, F) {
    transcript.append_commitment(lro_entangled);
    let gamma = transcript_get_challenge_field_elem(transcript, group_order, b"gamma");
    let beta = transcript_get_challenge_field_elem(transcript, group_order, b"beta");
    (gamma, beta)
}

/// Bind the custom-gate commitments and the entangled `Z`, then derive alpha.
pub(crate) fn transcript_get_plonk_challenge_alpha<C: ToBytes, F: Scalar>(
    transcript: &mut Transcript,
    bsb22: &[C],
    z_entangled: &C,
    group_order: usize,
) -> F {
    for c in bsb22 {
        transcript.append_commitment(c);
    }
    transcript.append_commitment(z_entangled);
    transcript_get_challenge_field_elem(transcript, group_order, b"alpha")
}

/// Bind the entangled quotient, then derive zeta.
///
/// `group_order` is `n * t`, so that `zeta^t` stays off the small domain.
pub(crate) fn transcript_get_plonk_challenge_zeta<C: ToBytes, F: Scalar>(
    transcript: &mut Transcript,
    h_entangled: &C,
    group_order: usize,
) -> F {
    transcript.append_commitment(h_entangled);
    transcript_get_challenge_field_elem(transcript, group_order, b"zeta")
}

#[cfg(test)]
mod test {
    use super::*;
    use fflonk_algebra::bls12_381::BLSScalar;

    #[test]
    fn challenges_follow_bindings() {
        let mut t1 = Transcript::new(b"test");
        let mut t2 = Transcript::new(b"test");
        let a: BLSScalar = transcript_get_challenge_field_elem(&mut t1, 4, b"gamma");
        let b: BLSScalar = transcript_get_challenge_field_elem(&mut t2, 4, b"gamma");
        assert_eq!(a, b);
        assert_ne!(a.pow(&[4]), BLSScalar::one());

        t1.append_field_elem(&a);
        t2.append_field_elem(&a.add(&BLSScalar::one()));
        let a: BLSScalar = transcript_get_challenge_field_elem(&mut t1, 4, b"beta");
        let b: BLSScalar = transcript_get_challenge_field_elem(&mut t2, 4, b"beta");
        assert_ne!(a, b);
    }
}
