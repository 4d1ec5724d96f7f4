use fflonk_algebra::{bls12_381::BLSScalar, prelude::*};
use fflonk_plonk::errors::PlonkError;
use fflonk_plonk::plonk::{
    constraint_system::{CommitmentHint, ConstraintSystem, SparseCS, VarIndex},
    indexer::{required_key_len, setup, PlonkPf, ProvingKey, VerifyingKey},
    prover::{prover, BlindingOrders, CancellationToken, ProverOptions},
    trace::wire_layout,
    verifier::verifier,
};
use fflonk_plonk::poly_commit::{
    fflonk::folding_factor,
    kzg_poly_com::{KZGCommitment, KZGCommitmentSchemeBLS},
    pcs::{HomomorphicPolyComElem, PolyComScheme},
};
use merlin::Transcript;
use rand_chacha::ChaChaRng;

type F = BLSScalar;
type PCS = KZGCommitmentSchemeBLS;
type Result<T> = core::result::Result<T, PlonkError>;

fn num(x: u64) -> F {
    F::from(x)
}

/// `out = (a + b)^2 * a + c`. Each commitment multiplies its output into a
/// term that cancels: the first one commits `a` and `c`, the second one `b`.
fn sample_circuit(commits: usize) -> SparseCS<F> {
    let mut cs = SparseCS::new(1, 3);
    let out = cs.public_input(0);
    let (a, b, c) = (cs.secret_input(0), cs.secret_input(1), cs.secret_input(2));
    let s = cs.add(a, b);
    let sq = cs.mul(s, s);
    let prod = cs.mul(sq, a);
    let committed: [&[VarIndex]; 2] = [&[a, c], &[b]];
    let mut res = prod;
    for vars in committed.iter().take(commits) {
        let v = cs.commit(vars);
        let w = cs.mul(v, prod);
        let zero = cs.sub(w, w);
        res = cs.add(zero, res);
    }
    let res = cs.add(res, c);
    cs.assert_equal(res, out);
    cs
}

/// Witness `(out, a, b, c)` satisfying [`sample_circuit`].
fn sample_witness(a: u64, b: u64, c: u64) -> Vec<F> {
    let out = (a + b) * (a + b) * a + c;
    vec![num(out), num(a), num(b), num(c)]
}

fn prove(
    prng: &mut ChaChaRng,
    cs: &SparseCS<F>,
    pk: &ProvingKey<PCS>,
    witness: &[F],
    options: &ProverOptions,
) -> Result<PlonkPf<PCS>> {
    prover(
        prng,
        &mut Transcript::new(b"fflonk tests"),
        cs,
        pk,
        witness,
        options,
    )
}

fn verify(
    vk: &VerifyingKey<PCS>,
    public: &[F],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    verifier(&mut Transcript::new(b"fflonk tests"), vk, public, proof)
}

#[test]
fn test_round_trip() {
    let mut prng = ChaChaRng::from_seed([1u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    assert_eq!(vk.t, 16);

    let witness = sample_witness(3, 4, 5);
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    assert!(proof.bsb22_commitments.is_empty());
    assert_eq!(proof.batch_opening.claimed_values[0].len(), 16);
    assert_eq!(proof.batch_opening.claimed_values[1].len(), 1);
    verify(&vk, &witness[..1], &proof).unwrap();

    // a second proof of the same statement is fresh
    let again = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    assert_ne!(proof.lro_entangled, again.lro_entangled);
    verify(&vk, &witness[..1], &again).unwrap();
}

#[test]
fn test_round_trip_with_commitment() {
    let mut prng = ChaChaRng::from_seed([2u8; 32]);
    let cs = sample_circuit(1);
    assert_eq!(cs.commitment_info().len(), 1);
    let t = folding_factor::<F>(17);
    assert_eq!(t, 19);
    let pcs = PCS::new(required_key_len(16, t), &mut prng);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    assert_eq!(vk.t, t);
    assert_eq!(vk.commitment_constraint_indexes.len(), 1);

    let witness = sample_witness(2, 7, 11);
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    assert_eq!(proof.bsb22_commitments.len(), 1);
    verify(&vk, &witness[..1], &proof).unwrap();

    let mut forged = proof.clone();
    forged.bsb22_commitments[0] = KZGCommitment::get_base();
    assert!(verify(&vk, &witness[..1], &forged).is_err());
}

#[test]
fn test_round_trip_with_two_commitments() {
    let mut prng = ChaChaRng::from_seed([13u8; 32]);
    let cs = sample_circuit(2);
    assert_eq!(cs.commitment_info().len(), 2);
    let t = folding_factor::<F>(19);
    assert_eq!(t, 19);
    let pcs = PCS::new(required_key_len(32, t), &mut prng);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    assert_eq!((vk.size, vk.t), (32, t));
    assert_eq!(vk.commitment_constraint_indexes.len(), 2);

    let witness = sample_witness(4, 1, 9);
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    assert_eq!(proof.bsb22_commitments.len(), 2);
    assert_ne!(proof.bsb22_commitments[0], proof.bsb22_commitments[1]);
    verify(&vk, &witness[..1], &proof).unwrap();

    // every slot up to the second custom-gate witness is occupied
    assert_eq!(proof.batch_opening.claimed_values[0].len(), 19);

    let mut swapped = proof.clone();
    swapped.bsb22_commitments.swap(0, 1);
    assert!(verify(&vk, &witness[..1], &swapped).is_err());

    let mut forged = proof.clone();
    forged.bsb22_commitments[1] = KZGCommitment::get_base();
    assert!(verify(&vk, &witness[..1], &forged).is_err());

    let mut tampered = proof;
    tampered.batch_opening.claimed_values[0][18] += &F::one();
    assert!(verify(&vk, &witness[..1], &tampered).is_err());
}

#[test]
fn test_publics_only_circuit() {
    let mut prng = ChaChaRng::from_seed([14u8; 32]);
    let pcs = PCS::new(required_key_len(2, 16) - 1, &mut prng);
    let cs = SparseCS::<F>::new(2, 0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    assert_eq!(vk.size, 2);

    let publics = [num(4), num(9)];
    let proof = prove(&mut prng, &cs, &pk, &publics, &ProverOptions::default()).unwrap();
    verify(&vk, &publics, &proof).unwrap();
    assert!(verify(&vk, &[num(9), num(4)], &proof).is_err());
}

#[test]
fn test_smallest_circuit() {
    let mut prng = ChaChaRng::from_seed([3u8; 32]);
    let pcs = PCS::new(required_key_len(2, 16) - 1, &mut prng);
    let mut cs = SparseCS::<F>::new(1, 1);
    let y = cs.public_input(0);
    let x = cs.secret_input(0);
    cs.assert_mul(x, x, y);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    assert_eq!(vk.size, 2);

    let witness = [num(9), num(3)];
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    verify(&vk, &witness[..1], &proof).unwrap();

    assert_eq!(
        verify(&vk, &[num(10)], &proof).unwrap_err(),
        PlonkError::VerificationError
    );

    let mut tampered = proof.clone();
    tampered.batch_opening.claimed_values[0][0] += &F::one();
    assert!(verify(&vk, &witness[..1], &tampered).is_err());

    let mut tampered = proof.clone();
    std::mem::swap(&mut tampered.z, &mut tampered.z_entangled);
    assert!(verify(&vk, &witness[..1], &tampered).is_err());

    let mut tampered = proof.clone();
    tampered.batch_opening.claimed_values[0].pop();
    assert!(verify(&vk, &witness[..1], &tampered).is_err());
}

#[test]
fn test_corrupted_bytes_are_rejected() {
    let mut prng = ChaChaRng::from_seed([4u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    let witness = sample_witness(1, 1, 1);
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();
    let bytes = bincode::serialize(&proof).unwrap();

    for pos in [0, 10, 60, bytes.len() / 2, bytes.len() - 1] {
        let mut corrupted = bytes.clone();
        corrupted[pos] ^= 0x04;
        let rejected = match bincode::deserialize::<PlonkPf<PCS>>(&corrupted) {
            Ok(p) => verify(&vk, &witness[..1], &p).is_err(),
            Err(_) => true,
        };
        assert!(rejected, "flipping byte {} was accepted", pos);
    }
}

#[test]
fn test_proof_serialization() {
    let mut prng = ChaChaRng::from_seed([5u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    let witness = sample_witness(6, 0, 2);
    let proof = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap();

    let bytes = bincode::serialize(&proof).unwrap();
    let decoded: PlonkPf<PCS> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, proof);
    verify(&vk, &witness[..1], &decoded).unwrap();

    let json = serde_json::to_string(&proof).unwrap();
    let decoded: PlonkPf<PCS> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, proof);
}

#[test]
fn test_unsatisfied_witness() {
    let mut prng = ChaChaRng::from_seed([6u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, _) = setup(&cs, &pcs).unwrap();
    let mut witness = sample_witness(3, 4, 5);
    witness[0] += &F::one();
    let err = prove(&mut prng, &cs, &pk, &witness, &ProverOptions::default()).unwrap_err();
    assert_eq!(err, PlonkError::UnsatisfiedConstraint(cs.num_constraints() - 1));
}

#[test]
fn test_witness_shape() {
    let mut prng = ChaChaRng::from_seed([7u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, _) = setup(&cs, &pcs).unwrap();
    let witness = sample_witness(3, 4, 5);
    let err = prove(&mut prng, &cs, &pk, &witness[..3], &ProverOptions::default()).unwrap_err();
    assert_eq!(
        err,
        PlonkError::InvalidWitnessShape {
            expected: 4,
            got: 3
        }
    );
}

#[test]
fn test_setup_errors() {
    let mut prng = ChaChaRng::from_seed([8u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let mut cs = SparseCS::<F>::new(0, 1);
    let x = cs.secret_input(0);
    cs.assert_constant(x, num(1));
    assert_eq!(
        setup(&cs, &pcs).unwrap_err(),
        PlonkError::DegenerateCircuit(1)
    );

    let cs = sample_circuit(0);
    let n = 8;
    let small = PCS::new(required_key_len(n, 16) - 2, &mut prng);
    assert_eq!(
        setup(&cs, &small).unwrap_err(),
        PlonkError::UndersizedSRS {
            needed: required_key_len(n, 16),
            available: required_key_len(n, 16) - 1,
        }
    );
}

struct NoCommitment;

impl CommitmentHint<F> for NoCommitment {
    fn commit(&mut self, index: usize, _: &[F]) -> Result<F> {
        Err(PlonkError::Message(format!("unexpected commitment {}", index)))
    }
}

#[test]
fn test_permutation_links_equal_values() {
    let mut prng = ChaChaRng::from_seed([9u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    let witness = sample_witness(5, 6, 7);
    let sol = cs.solve(&witness, &mut NoCommitment).unwrap();

    let lro: Vec<VarIndex> = wire_layout(&cs, vk.size);
    let perm = &pk.trace.permutation;
    assert_eq!(perm.len(), 3 * vk.size);

    let mut seen = vec![false; perm.len()];
    for (p, q) in perm.iter().enumerate() {
        assert!(!seen[*q]);
        seen[*q] = true;
        assert_eq!(lro[p], lro[*q]);
        assert_eq!(sol.values[lro[p]], sol.values[lro[*q]]);
    }
}

#[test]
fn test_cancelled_before_start() {
    let mut prng = ChaChaRng::from_seed([10u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, _) = setup(&cs, &pcs).unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let options = ProverOptions {
        cancellation: Some(token),
        ..Default::default()
    };
    let err = prove(&mut prng, &cs, &pk, &sample_witness(1, 2, 3), &options).unwrap_err();
    assert_eq!(err, PlonkError::Cancelled);
}

#[test]
fn test_unblinded_round_trip() {
    let mut prng = ChaChaRng::from_seed([11u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();
    let witness = sample_witness(8, 9, 10);
    let options = ProverOptions {
        blinding: BlindingOrders::NONE,
        ..Default::default()
    };
    let proof = prove(&mut prng, &cs, &pk, &witness, &options).unwrap();
    verify(&vk, &witness[..1], &proof).unwrap();

    let partial = ProverOptions {
        blinding: BlindingOrders {
            z: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let proof = prove(&mut prng, &cs, &pk, &witness, &partial).unwrap();
    verify(&vk, &witness[..1], &proof).unwrap();
}

#[test]
fn test_folded_commitment_is_sum_of_slots() {
    let mut prng = ChaChaRng::from_seed([12u8; 32]);
    let pcs = PCS::new(300, &mut prng);
    let cs = sample_circuit(0);
    let (pk, vk) = setup(&cs, &pcs).unwrap();

    let polys = pk.trace.setup_polys();
    let mut sum: <PCS as PolyComScheme>::Commitment = KZGCommitment::get_identity();
    for (slot, p) in polys.iter().enumerate() {
        sum.add_assign(&pcs.commit_entangled(p, vk.t, slot).unwrap());
    }
    assert_eq!(sum, vk.qpublic);
}
