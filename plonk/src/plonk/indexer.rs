use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::ConstraintSystem,
    domain::Domains,
    helpers::Slots,
    trace::Trace,
};
use crate::poly_commit::{
    fflonk::{fold, folding_factor, FflonkOpeningProof},
    pcs::PolyComScheme,
};
use ark_std::{end_timer, start_timer};
use fflonk_algebra::prelude::*;

/// The data structure of a Plonk proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlonkProof<C, F> {
    /// Entangled commitment of the blinded `L, R, O`.
    pub lro_entangled: C,
    /// Plain commitment of the blinded `Z`, opened at `omega * zeta^t`.
    pub z: C,
    /// Entangled commitment of the blinded `Z`.
    pub z_entangled: C,
    /// Entangled commitment of `H1, H2, H3`.
    pub h_entangled: C,
    /// Commitments of the custom-gate witness polynomials.
    pub bsb22_commitments: Vec<C>,
    /// Opening of both folded digests.
    pub batch_opening: FflonkOpeningProof<C, F>,
}

/// The type of the Plonk proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> =
    PlonkProof<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Plonk verifier parameters.
#[derive(Debug, Clone)]
pub struct VerifyingKey<PCS: PolyComScheme> {
    /// Size of the small domain.
    pub size: usize,
    /// `1 / size`.
    pub size_inv: PCS::Field,
    /// Generator of the small domain.
    pub generator: PCS::Field,
    /// Number of public inputs.
    pub nb_public: usize,
    /// Shift of the cosets `u<g>`, `u^2<g>`.
    pub coset_shift: PCS::Field,
    /// Folding factor.
    pub t: usize,
    /// Constraint index receiving each custom-gate commitment value.
    pub commitment_constraint_indexes: Vec<usize>,
    /// Folded commitment of the setup polynomials.
    pub qpublic: PCS::Commitment,
    /// Verifier-only commitment parameters.
    pub pcs: PCS,
}

/// Plonk prover parameters.
#[derive(Debug, Clone)]
pub struct ProvingKey<PCS: PolyComScheme> {
    /// The full commitment key.
    pub pcs: PCS,
    /// Setup polynomials in canonical form.
    pub trace: Trace<PCS::Field>,
    /// Lagrange values of the incomplete constant selector.
    pub qk_lagrange: Vec<PCS::Field>,
    /// The Plonk verifier parameters.
    pub vk: VerifyingKey<PCS>,
}

/// Number of commitment key elements a circuit of small-domain size `n`
/// needs with folding factor `t`.
pub fn required_key_len(n: usize, t: usize) -> usize {
    t * (n + 3)
}

/// Arithmetize `cs`, commit to its folded setup polynomials and derive the
/// proving and verifying keys.
pub fn setup<PCS: PolyComScheme, CS: ConstraintSystem<Field = PCS::Field>>(
    cs: &CS,
    pcs: &PCS,
) -> Result<(ProvingKey<PCS>, VerifyingKey<PCS>)> {
    let setup_time = start_timer!(|| "fflonk setup");

    // Step 1: check the sizes before any work.
    let domains = Domains::<PCS::Field>::new(cs.num_constraints() + cs.num_public())?;
    let n = domains.small.cardinality;
    let nb_qcp = cs.commitment_info().len();
    let t = folding_factor::<PCS::Field>(Slots::new(nb_qcp).count());
    let needed = required_key_len(n, t);
    if pcs.key_len() < needed {
        return Err(PlonkError::UndersizedSRS {
            needed,
            available: pcs.key_len(),
        });
    }

    // Step 2: arithmetize the circuit.
    let trace_time = start_timer!(|| "build trace");
    let trace = Trace::new(cs, &domains.small);
    let qk_lagrange = trace.qk.coefs().to_vec();
    let trace = trace.into_canonical(&domains.small)?;
    end_timer!(trace_time);

    // Step 3: commit to the folded setup polynomials.
    let commit_time = start_timer!(|| "commit setup polynomials");
    let qpublic = pcs.commit(&fold(&trace.setup_polys(), t))?;
    end_timer!(commit_time);

    let vk = VerifyingKey {
        size: n,
        size_inv: domains.small.cardinality_inv,
        generator: domains.small.generator,
        nb_public: cs.num_public(),
        coset_shift: domains.small.coset_shift,
        t,
        commitment_constraint_indexes: cs
            .commitment_info()
            .iter()
            .map(|info| info.commitment_index)
            .collect(),
        qpublic,
        pcs: pcs.shrink_to_verifier_only(),
    };
    let pk = ProvingKey {
        pcs: pcs.clone(),
        trace,
        qk_lagrange,
        vk: vk.clone(),
    };
    end_timer!(setup_time);
    Ok((pk, vk))
}
