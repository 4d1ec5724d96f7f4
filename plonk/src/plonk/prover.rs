use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{CommitmentHint, CommitmentInfo, ConstraintSystem, Solution},
    domain::{Domains, FftDomain},
    helpers::{
        blind, blinding_poly, build_z, hash_commitment_to_field, PlonkChallenges, Slots,
    },
    indexer::{PlonkPf, PlonkProof, ProvingKey},
    quotient::{compute_quotient, split_quotient, QuotientInputs},
    tasks::{Stage, TaskGraph},
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_zeta,
        transcript_get_plonk_challenges_gamma_beta, transcript_init_plonk,
    },
};
use crate::poly_commit::{
    fflonk::{batch_open, FflonkOpening},
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme},
};
use ark_std::{cfg_iter, end_timer, start_timer};
use fflonk_algebra::prelude::*;
use merlin::Transcript;
use parking_lot::Mutex;
use rand_chacha::ChaChaRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::OnceLock;
use std::thread;

pub use crate::plonk::tasks::CancellationToken;

/// Degrees of the blinding polynomials, `None` for no blinding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindingOrders {
    pub l: Option<usize>,
    pub r: Option<usize>,
    pub o: Option<usize>,
    pub z: Option<usize>,
}

impl Default for BlindingOrders {
    fn default() -> Self {
        Self {
            l: Some(1),
            r: Some(1),
            o: Some(1),
            z: Some(2),
        }
    }
}

impl BlindingOrders {
    /// No blinding at all. The proof is then not zero-knowledge.
    pub const NONE: BlindingOrders = BlindingOrders {
        l: None,
        r: None,
        o: None,
        z: None,
    };

    fn check(&self) -> Result<()> {
        let max = Self::default();
        let fits = |order: Option<usize>, bound: Option<usize>| order <= bound;
        if fits(self.l, max.l) && fits(self.r, max.r) && fits(self.o, max.o) && fits(self.z, max.z)
        {
            Ok(())
        } else {
            Err(PlonkError::Message(format!(
                "blinding orders {:?} exceed {:?}",
                self, max
            )))
        }
    }
}

/// Runtime options of the prover.
#[derive(Clone, Debug, Default)]
pub struct ProverOptions {
    pub blinding: BlindingOrders,
    /// Abort the proof when this token is cancelled.
    pub cancellation: Option<CancellationToken>,
}

/// Lagrange values of `L, R, O` over the small domain.
///
/// Placeholder rows hold the public inputs on `L`; every unused position
/// holds the value of variable 0, which the trace wires there.
pub(crate) fn lro_lagrange<F: Scalar>(sol: &Solution<F>, public: &[F], n: usize) -> [Vec<F>; 3] {
    let nb_public = public.len();
    let filler = sol.values.first().copied().unwrap_or_else(F::zero);
    let column = |wires: &[F], head: &[F]| -> Vec<F> {
        let mut v = vec![filler; n];
        v[..nb_public].copy_from_slice(head);
        v[nb_public..nb_public + wires.len()].copy_from_slice(wires);
        v
    };
    let fill = vec![filler; nb_public];
    [
        column(&sol.l, public),
        column(&sol.r, &fill),
        column(&sol.o, &fill),
    ]
}

/// Write the public inputs and the custom-gate commitment values into the
/// Lagrange values of the constant selector.
pub(crate) fn complete_qk<F: Scalar>(
    qk_lagrange: &[F],
    public: &[F],
    commitment_values: &[F],
    infos: &[CommitmentInfo],
) -> Vec<F> {
    let nb_public = public.len();
    let mut qk = qk_lagrange.to_vec();
    qk[..nb_public].copy_from_slice(public);
    for (info, v) in infos.iter().zip(commitment_values) {
        qk[nb_public + info.commitment_index] = *v;
    }
    qk
}

/// Witness polynomial of one custom-gate commitment.
struct Bsb22Witness<F, C> {
    /// Canonical coefficients.
    pi2: Vec<F>,
    commitment: C,
    value: F,
}

/// Commits the committed wires of the circuit while it is being solved.
struct Bsb22Hint<'a, PCS: PolyComScheme> {
    pcs: &'a PCS,
    domain: &'a FftDomain<PCS::Field>,
    slots: Slots,
    t: usize,
    nb_public: usize,
    nb_constraints: usize,
    infos: &'a [CommitmentInfo],
    prng: ChaChaRng,
    witnesses: Vec<Bsb22Witness<PCS::Field, PCS::Commitment>>,
}

impl<PCS: PolyComScheme> CommitmentHint<PCS::Field> for Bsb22Hint<'_, PCS> {
    fn commit(&mut self, index: usize, committed_values: &[PCS::Field]) -> Result<PCS::Field> {
        let info = self
            .infos
            .get(index)
            .ok_or_else(|| PlonkError::Message(format!("unknown commitment {}", index)))?;
        let mut pi = vec![PCS::Field::zero(); self.domain.cardinality];
        for (row, v) in info.committed.iter().zip(committed_values) {
            pi[self.nb_public + row] = *v;
        }
        pi[self.nb_public + info.commitment_index] = PCS::Field::random(&mut self.prng);
        let last = self.nb_constraints - 1;
        if !info.committed.contains(&last) {
            pi[self.nb_public + last] = PCS::Field::random(&mut self.prng);
        }
        let pi2 = self.domain.ifft(&pi)?;
        let commitment = self
            .pcs
            .commit_entangled(&pi2, self.t, self.slots.bsb22(index))?;
        let value = hash_commitment_to_field(&commitment);
        self.witnesses.push(Bsb22Witness {
            pi2,
            commitment,
            value,
        });
        Ok(value)
    }
}

struct Solved<F, C> {
    l: Vec<F>,
    r: Vec<F>,
    o: Vec<F>,
    bsb22: Vec<Bsb22Witness<F, C>>,
}

struct Blinding<F> {
    l: FpPolynomial<F>,
    r: FpPolynomial<F>,
    o: FpPolynomial<F>,
    z: FpPolynomial<F>,
}

struct CommittedLro<F, C> {
    l: Vec<F>,
    r: Vec<F>,
    o: Vec<F>,
    entangled: C,
}

struct CommittedZ<F, C> {
    z: Vec<F>,
    commitment: C,
    entangled: C,
}

struct Quotient<F, C> {
    h: [Vec<F>; 3],
    entangled: C,
}

/// State of one proof. Each slot is written by exactly one stage.
struct Instance<'a, PCS: PolyComScheme, CS> {
    cs: &'a CS,
    pk: &'a ProvingKey<PCS>,
    witness: &'a [PCS::Field],
    domains: Domains<PCS::Field>,
    slots: Slots,
    blinding_orders: BlindingOrders,
    transcript: Mutex<&'a mut Transcript>,

    solved: OnceLock<Solved<PCS::Field, PCS::Commitment>>,
    blinding: OnceLock<Blinding<PCS::Field>>,
    lro: OnceLock<CommittedLro<PCS::Field, PCS::Commitment>>,
    qk: OnceLock<Vec<PCS::Field>>,
    gamma_beta: OnceLock<(PCS::Field, PCS::Field)>,
    z: OnceLock<CommittedZ<PCS::Field, PCS::Commitment>>,
    quotient: OnceLock<Quotient<PCS::Field, PCS::Commitment>>,
    zeta: OnceLock<PCS::Field>,
    opening: OnceLock<FflonkOpening<PCS>>,
}

fn read<T>(slot: &OnceLock<T>) -> Result<&T> {
    slot.get()
        .ok_or_else(|| PlonkError::Message("stage output read before it was written".into()))
}

fn publish<T>(slot: &OnceLock<T>, value: T) -> Result<()> {
    slot.set(value)
        .map_err(|_| PlonkError::Message("stage output written twice".into()))
}

/// `commit(p) + commit(b (X^n - 1))` at `slot`.
fn commit_blinded<PCS: PolyComScheme>(
    pcs: &PCS,
    p: &[PCS::Field],
    b: &FpPolynomial<PCS::Field>,
    n: usize,
    t: usize,
    slot: usize,
) -> Result<PCS::Commitment> {
    let mut c = pcs.commit_entangled(p, t, slot)?;
    c.add_assign(&pcs.commit_blinding_factor(b.get_coefs_ref(), n, t, slot)?);
    Ok(c)
}

impl<'a, PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>> Instance<'a, PCS, CS> {
    fn n(&self) -> usize {
        self.domains.small.cardinality
    }

    fn t(&self) -> usize {
        self.pk.vk.t
    }

    fn public(&self) -> &[PCS::Field] {
        &self.witness[..self.cs.num_public()]
    }

    fn solve(&self, seed: [u8; 32]) -> Result<()> {
        let mut hint = Bsb22Hint {
            pcs: &self.pk.pcs,
            domain: &self.domains.small,
            slots: self.slots,
            t: self.t(),
            nb_public: self.cs.num_public(),
            nb_constraints: self.cs.num_constraints(),
            infos: self.cs.commitment_info(),
            prng: ChaChaRng::from_seed(seed),
            witnesses: vec![],
        };
        let sol = self.cs.solve(self.witness, &mut hint)?;
        let [l, r, o] = lro_lagrange(&sol, self.public(), self.n());
        publish(
            &self.solved,
            Solved {
                l,
                r,
                o,
                bsb22: hint.witnesses,
            },
        )
    }

    fn init_blinding(&self, seed: [u8; 32]) -> Result<()> {
        let mut prng = ChaChaRng::from_seed(seed);
        let orders = self.blinding_orders;
        publish(
            &self.blinding,
            Blinding {
                l: blinding_poly(&mut prng, orders.l),
                r: blinding_poly(&mut prng, orders.r),
                o: blinding_poly(&mut prng, orders.o),
                z: blinding_poly(&mut prng, orders.z),
            },
        )
    }

    fn commit_lro(&self) -> Result<()> {
        let solved = read(&self.solved)?;
        let blinding = read(&self.blinding)?;
        let small = &self.domains.small;
        let (n, t) = (self.n(), self.t());

        let columns = vec![
            (&solved.l, &blinding.l, self.slots.l()),
            (&solved.r, &blinding.r, self.slots.r()),
            (&solved.o, &blinding.o, self.slots.o()),
        ];
        let committed = cfg_iter!(columns)
            .map(|(evals, b, slot)| -> Result<(Vec<PCS::Field>, PCS::Commitment)> {
                let coefs = small.ifft(evals)?;
                let c = commit_blinded(&self.pk.pcs, &coefs, b, n, t, *slot)?;
                Ok((coefs, c))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut entangled = PCS::Commitment::get_identity();
        let mut coefs = Vec::with_capacity(3);
        for (p, c) in committed {
            entangled.add_assign(&c);
            coefs.push(p);
        }
        let o = coefs.pop().ok_or(PlonkError::CommitmentError)?;
        let r = coefs.pop().ok_or(PlonkError::CommitmentError)?;
        let l = coefs.pop().ok_or(PlonkError::CommitmentError)?;
        publish(&self.lro, CommittedLro { l, r, o, entangled })
    }

    fn complete_qk(&self) -> Result<()> {
        let solved = read(&self.solved)?;
        let values: Vec<PCS::Field> = solved.bsb22.iter().map(|w| w.value).collect();
        let qk = complete_qk(
            &self.pk.qk_lagrange,
            self.public(),
            &values,
            self.cs.commitment_info(),
        );
        publish(&self.qk, self.domains.small.ifft(&qk)?)
    }

    fn derive_gamma_beta(&self) -> Result<()> {
        let lro = read(&self.lro)?;
        let mut transcript = self.transcript.lock();
        let challenges =
            transcript_get_plonk_challenges_gamma_beta(&mut **transcript, &lro.entangled, self.n());
        publish(&self.gamma_beta, challenges)
    }

    fn build_z(&self) -> Result<()> {
        let solved = read(&self.solved)?;
        let blinding = read(&self.blinding)?;
        let (gamma, beta) = read(&self.gamma_beta)?;
        let small = &self.domains.small;
        let (n, t) = (self.n(), self.t());
        let trace = &self.pk.trace;

        let s1 = trace.s1.clone().into_lagrange(small)?;
        let s2 = trace.s2.clone().into_lagrange(small)?;
        let s3 = trace.s3.clone().into_lagrange(small)?;
        let z = build_z(
            &solved.l,
            &solved.r,
            &solved.o,
            s1.coefs(),
            s2.coefs(),
            s3.coefs(),
            beta,
            gamma,
            small,
        )?;
        let z = small.ifft(&z)?;
        let commitment = commit_blinded(&self.pk.pcs, &z, &blinding.z, n, 1, 0)?;
        let entangled = commit_blinded(&self.pk.pcs, &z, &blinding.z, n, t, self.slots.z())?;
        publish(
            &self.z,
            CommittedZ {
                z,
                commitment,
                entangled,
            },
        )
    }

    fn compute_quotient(&self) -> Result<()> {
        let solved = read(&self.solved)?;
        let blinding = read(&self.blinding)?;
        let lro = read(&self.lro)?;
        let qk = read(&self.qk)?;
        let (gamma, beta) = read(&self.gamma_beta)?;
        let z = read(&self.z)?;
        let n = self.n();

        let bsb22: Vec<PCS::Commitment> =
            solved.bsb22.iter().map(|w| w.commitment.clone()).collect();
        let alpha = {
            let mut transcript = self.transcript.lock();
            transcript_get_plonk_challenge_alpha(&mut **transcript, &bsb22, &z.entangled, n)
        };

        let trace = &self.pk.trace;
        let inputs = QuotientInputs {
            ql: trace.ql.coefs(),
            qr: trace.qr.coefs(),
            qm: trace.qm.coefs(),
            qo: trace.qo.coefs(),
            qk,
            s1: trace.s1.coefs(),
            s2: trace.s2.coefs(),
            s3: trace.s3.coefs(),
            qcp: trace.qcp.iter().map(|q| q.coefs()).collect(),
            pi2: solved.bsb22.iter().map(|w| w.pi2.as_slice()).collect(),
            l: &lro.l,
            r: &lro.r,
            o: &lro.o,
            z: &z.z,
            bl: &blinding.l,
            br: &blinding.r,
            bo: &blinding.o,
            bz: &blinding.z,
        };
        let challenges = PlonkChallenges {
            gamma: *gamma,
            beta: *beta,
            alpha,
        };
        let h = compute_quotient(&inputs, &challenges, &self.domains)?;
        let h = split_quotient(&h, n);

        let chunks: Vec<(usize, &Vec<PCS::Field>)> = h.iter().enumerate().collect();
        let commitments = cfg_iter!(chunks)
            .map(|(k, chunk)| {
                self.pk
                    .pcs
                    .commit_entangled(chunk, self.t(), self.slots.h(*k))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut entangled = PCS::Commitment::get_identity();
        for c in commitments.iter() {
            entangled.add_assign(c);
        }
        publish(
            &self.quotient,
            Quotient {
                h,
                entangled,
            },
        )
    }

    fn derive_zeta(&self) -> Result<()> {
        let quotient = read(&self.quotient)?;
        let mut transcript = self.transcript.lock();
        let zeta = transcript_get_plonk_challenge_zeta(
            &mut **transcript,
            &quotient.entangled,
            self.n() * self.t(),
        );
        publish(&self.zeta, zeta)
    }

    fn batch_open(&self) -> Result<()> {
        let solved = read(&self.solved)?;
        let blinding = read(&self.blinding)?;
        let lro = read(&self.lro)?;
        let z = read(&self.z)?;
        let quotient = read(&self.quotient)?;
        let zeta = read(&self.zeta)?;
        let (n, t) = (self.n(), self.t());

        let l = blind(&lro.l, &blinding.l, n);
        let r = blind(&lro.r, &blinding.r, n);
        let o = blind(&lro.o, &blinding.o, n);
        let z_blinded = blind(&z.z, &blinding.z, n);

        // slot order, see `Slots`
        let mut set0 = self.pk.trace.setup_polys();
        set0.extend([l.as_slice(), r.as_slice(), o.as_slice(), z_blinded.as_slice()]);
        set0.extend(quotient.h.iter().map(|h| h.as_slice()));
        set0.extend(solved.bsb22.iter().map(|w| w.pi2.as_slice()));
        if set0.len() > t {
            return Err(PlonkError::Message(format!(
                "{} polynomials do not fit a folding factor of {}",
                set0.len(),
                t
            )));
        }
        set0.resize(t, &[]);
        let set1 = vec![z_blinded.as_slice()];

        let mut digest = self.pk.vk.qpublic.clone();
        digest.add_assign(&lro.entangled);
        digest.add_assign(&z.entangled);
        digest.add_assign(&quotient.entangled);
        for w in solved.bsb22.iter() {
            digest.add_assign(&w.commitment);
        }
        let shifted = self.domains.small.generator.mul(&zeta.pow(&[t as u64]));

        let mut transcript = self.transcript.lock();
        let opening = batch_open(
            &self.pk.pcs,
            &mut **transcript,
            &[set0, set1],
            &[digest, z.commitment.clone()],
            &[*zeta, shifted],
        )?;
        publish(&self.opening, opening)
    }

    fn into_proof(self) -> Result<PlonkPf<PCS>> {
        let missing = || PlonkError::Message("proof is incomplete".into());
        let solved = self.solved.into_inner().ok_or_else(missing)?;
        let lro = self.lro.into_inner().ok_or_else(missing)?;
        let z = self.z.into_inner().ok_or_else(missing)?;
        let quotient = self.quotient.into_inner().ok_or_else(missing)?;
        let batch_opening = self.opening.into_inner().ok_or_else(missing)?;
        Ok(PlonkProof {
            lro_entangled: lro.entangled,
            z: z.commitment,
            z_entangled: z.entangled,
            h_entangled: quotient.entangled,
            bsb22_commitments: solved.bsb22.into_iter().map(|w| w.commitment).collect(),
            batch_opening,
        })
    }
}

/// PLONK Prover: it produces a proof that `witness = public || secret`
/// satisfies the constraint system `cs`.
///
/// The proof is computed by concurrent stages that only wait on the stages
/// whose output they read. The verifier must use a transcript in the same
/// state as the one handed to the prover.
/// # Example
/// ```
/// use fflonk_plonk::plonk::{
///     constraint_system::SparseCS,
///     indexer::setup,
///     prover::{prover, ProverOptions},
///     verifier::verifier,
/// };
/// use fflonk_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBLS;
/// use merlin::Transcript;
/// use rand_chacha::ChaChaRng;
/// use fflonk_algebra::{prelude::*, bls12_381::BLSScalar};
///
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
/// let pcs = KZGCommitmentSchemeBLS::new(100, &mut prng);
///
/// // x * x == y, with y public
/// let mut cs = SparseCS::<BLSScalar>::new(1, 1);
/// let y = cs.public_input(0);
/// let x = cs.secret_input(0);
/// cs.assert_mul(x, x, y);
///
/// let (pk, vk) = setup(&cs, &pcs).unwrap();
/// let witness = [BLSScalar::from(4u32), BLSScalar::from(2u32)];
/// let proof = {
///     let mut transcript = Transcript::new(b"Test");
///     prover(&mut prng, &mut transcript, &cs, &pk, &witness, &ProverOptions::default()).unwrap()
/// };
///
/// let mut transcript = Transcript::new(b"Test");
/// assert!(verifier(&mut transcript, &vk, &witness[..1], &proof).is_ok());
/// ```
pub fn prover<R, PCS, CS>(
    prng: &mut R,
    transcript: &mut Transcript,
    cs: &CS,
    pk: &ProvingKey<PCS>,
    witness: &[PCS::Field],
    options: &ProverOptions,
) -> Result<PlonkPf<PCS>>
where
    R: CryptoRng + RngCore,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
{
    options.blinding.check()?;
    let expected = cs.num_public() + cs.num_secret();
    if witness.len() != expected {
        return Err(PlonkError::InvalidWitnessShape {
            expected,
            got: witness.len(),
        });
    }
    let domains = Domains::new(cs.num_constraints() + cs.num_public())?;
    let vk = &pk.vk;
    if domains.small.cardinality != vk.size
        || cs.num_public() != vk.nb_public
        || cs.commitment_info().len() != vk.commitment_constraint_indexes.len()
    {
        return Err(PlonkError::Message(
            "the proving key was not generated for this circuit".into(),
        ));
    }

    let prover_timer = start_timer!(|| "fflonk prover");
    transcript_init_plonk(transcript, vk, &witness[..cs.num_public()]);

    let mut solve_seed = [0u8; 32];
    let mut blinding_seed = [0u8; 32];
    prng.fill_bytes(&mut solve_seed);
    prng.fill_bytes(&mut blinding_seed);

    let instance = Instance {
        cs,
        pk,
        witness,
        slots: Slots::new(cs.commitment_info().len()),
        domains,
        blinding_orders: options.blinding,
        transcript: Mutex::new(transcript),
        solved: OnceLock::new(),
        blinding: OnceLock::new(),
        lro: OnceLock::new(),
        qk: OnceLock::new(),
        gamma_beta: OnceLock::new(),
        z: OnceLock::new(),
        quotient: OnceLock::new(),
        zeta: OnceLock::new(),
        opening: OnceLock::new(),
    };
    let graph = TaskGraph::new(options.cancellation.clone());

    thread::scope(|s| {
        let (inst, graph) = (&instance, &graph);
        s.spawn(move || graph.run(Stage::Solve, &[], || inst.solve(solve_seed)));
        s.spawn(move || {
            graph.run(Stage::InitBlinding, &[], || inst.init_blinding(blinding_seed))
        });
        s.spawn(move || {
            graph.run(
                Stage::CommitLro,
                &[Stage::Solve, Stage::InitBlinding],
                || inst.commit_lro(),
            )
        });
        s.spawn(move || graph.run(Stage::CompleteQk, &[Stage::CommitLro], || inst.complete_qk()));
        s.spawn(move || {
            graph.run(Stage::DeriveGammaBeta, &[Stage::CommitLro], || {
                inst.derive_gamma_beta()
            })
        });
        s.spawn(move || {
            graph.run(
                Stage::BuildZ,
                &[Stage::DeriveGammaBeta, Stage::InitBlinding],
                || inst.build_z(),
            )
        });
        s.spawn(move || {
            graph.run(
                Stage::ComputeQuotient,
                &[Stage::BuildZ, Stage::CompleteQk],
                || inst.compute_quotient(),
            )
        });
        s.spawn(move || {
            graph.run(Stage::DeriveZeta, &[Stage::ComputeQuotient], || {
                inst.derive_zeta()
            })
        });
        s.spawn(move || {
            graph.run(
                Stage::BatchOpen,
                &[Stage::CommitLro, Stage::DeriveZeta],
                || inst.batch_open(),
            )
        });
    });
    graph.finish()?;
    let proof = instance.into_proof();
    end_timer!(prover_timer);
    proof
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plonk::constraint_system::SparseCS;
    use fflonk_algebra::bls12_381::BLSScalar;

    #[test]
    fn lro_layout() {
        let sol = Solution {
            values: vec![BLSScalar::from(9u32), BLSScalar::from(3u32)],
            l: vec![BLSScalar::from(3u32)],
            r: vec![BLSScalar::from(3u32)],
            o: vec![BLSScalar::from(9u32)],
        };
        let nine = BLSScalar::from(9u32);
        let three = BLSScalar::from(3u32);
        let [l, r, o] = lro_lagrange(&sol, &[nine], 4);
        assert_eq!(l, vec![nine, three, nine, nine]);
        assert_eq!(r, vec![nine, three, nine, nine]);
        assert_eq!(o, vec![nine, nine, nine, nine]);
    }

    #[test]
    fn qk_completion() {
        let mut cs = SparseCS::<BLSScalar>::new(2, 1);
        let x = cs.secret_input(0);
        cs.commit(&[x]);
        let info = cs.commitment_info();
        let qk = complete_qk(
            &[BLSScalar::zero(); 8],
            &[BLSScalar::from(5u32), BLSScalar::from(6u32)],
            &[BLSScalar::from(7u32)],
            info,
        );
        assert_eq!(qk[0], BLSScalar::from(5u32));
        assert_eq!(qk[1], BLSScalar::from(6u32));
        assert_eq!(qk[2], BLSScalar::zero());
        assert_eq!(qk[3], BLSScalar::from(7u32));
    }

    #[test]
    fn blinding_orders_are_bounded() {
        assert!(BlindingOrders::default().check().is_ok());
        assert!(BlindingOrders::NONE.check().is_ok());
        let too_large = BlindingOrders {
            z: Some(3),
            ..Default::default()
        };
        assert!(matches!(too_large.check(), Err(PlonkError::Message(_))));
    }
}
