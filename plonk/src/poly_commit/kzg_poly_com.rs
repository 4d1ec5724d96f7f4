use crate::errors::{PlonkError, Result};
use crate::poly_commit::pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes};
use fflonk_algebra::{
    bls12_381::{BLSPairingEngine, BLSScalar, BLSG1},
    prelude::*,
};

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G> ToBytes for KZGCommitment<G>
where
    G: Group,
{
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }
}

impl HomomorphicPolyComElem for KZGCommitment<BLSG1> {
    type Scalar = BLSScalar;

    fn get_base() -> Self {
        KZGCommitment(BLSG1::get_base())
    }

    fn get_identity() -> Self {
        KZGCommitment(BLSG1::get_identity())
    }

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &BLSScalar) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &BLSScalar) {
        self.0.mul_assign(exp)
    }
}

/// KZG commitment scheme about `PairingEngine`.
///
/// `public_parameter_group_1` is `[1], [s], [s^2], ...` in G1 and
/// `public_parameter_group_2` is `[1], [s]` in G2.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// public parameter about G1.
    pub public_parameter_group_1: Vec<P::G1>,
    /// public parameter about G1.
    pub public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance of a KZG polynomial commitment scheme.
    /// `max_degree` - max degree of the polynomial,
    /// `prng` - pseudo-random generator.
    ///
    /// The trapdoor is sampled and dropped here; this is a test-grade SRS.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let s = P::ScalarField::random(prng);

        let mut public_parameter_group_1: Vec<P::G1> = Vec::with_capacity(max_degree + 1);
        let mut elem_g1 = P::G1::get_base();
        for _ in 0..=max_degree {
            public_parameter_group_1.push(elem_g1);
            elem_g1 = elem_g1.mul(&s);
        }

        let elem_g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![elem_g2, elem_g2.mul(&s)];

        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2,
        }
    }

    /// Serialize the parameters to unchecked bytes.
    pub fn to_unchecked_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        let len_1 = self.public_parameter_group_1.len() as u32;
        let len_2 = self.public_parameter_group_2.len() as u32;
        bytes.extend(len_1.to_le_bytes());
        bytes.extend(len_2.to_le_bytes());

        for i in &self.public_parameter_group_1 {
            bytes.extend(i.to_unchecked_bytes());
        }
        for i in &self.public_parameter_group_2 {
            bytes.extend(i.to_unchecked_bytes());
        }
        bytes
    }

    /// Deserialize the parameters from unchecked bytes.
    pub fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(AlgebraError::DeserializationError.into());
        }
        let mut len_1_bytes = [0u8; 4];
        let mut len_2_bytes = [0u8; 4];
        len_1_bytes.copy_from_slice(&bytes[0..4]);
        len_2_bytes.copy_from_slice(&bytes[4..8]);
        let len_1 = u32::from_le_bytes(len_1_bytes) as usize;
        let len_2 = u32::from_le_bytes(len_2_bytes) as usize;
        let n_1 = P::G1::UNCOMPRESSED_LEN;
        let n_2 = P::G2::UNCOMPRESSED_LEN;
        if bytes.len() != 8 + n_1 * len_1 + n_2 * len_2 {
            return Err(AlgebraError::DeserializationError.into());
        }

        let bytes_1 = &bytes[8..8 + n_1 * len_1];
        let bytes_2 = &bytes[8 + n_1 * len_1..];
        let p1 = bytes_1
            .chunks(n_1)
            .map(P::G1::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let p2 = bytes_2
            .chunks(n_2)
            .map(P::G2::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            public_parameter_group_1: p1,
            public_parameter_group_2: p2,
        })
    }

    fn sub_key(&self, len: usize, t: usize, slot: usize, shift: usize) -> Result<Vec<&P::G1>> {
        if len == 0 {
            return Ok(vec![]);
        }
        let last = (shift + len - 1) * t + slot;
        if slot >= t || last >= self.public_parameter_group_1.len() {
            return Err(PlonkError::DegreeError);
        }
        Ok((shift..shift + len)
            .map(|i| &self.public_parameter_group_1[i * t + slot])
            .collect())
    }
}

/// KZG commitment scheme over the BLS12-381 curve
pub type KZGCommitmentSchemeBLS = KZGCommitmentScheme<BLSPairingEngine>;

impl PolyComScheme for KZGCommitmentSchemeBLS {
    type Field = BLSScalar;
    type Commitment = KZGCommitment<BLSG1>;

    fn key_len(&self) -> usize {
        self.public_parameter_group_1.len()
    }

    fn commit_entangled(&self, coefs: &[BLSScalar], t: usize, slot: usize) -> Result<Self::Commitment> {
        let bases = self.sub_key(coefs.len(), t, slot, 0)?;
        let scalars: Vec<&BLSScalar> = coefs.iter().collect();
        Ok(KZGCommitment(BLSG1::multi_exp(&scalars, &bases)))
    }

    fn commit_blinding_factor(
        &self,
        blinding: &[BLSScalar],
        n: usize,
        t: usize,
        slot: usize,
    ) -> Result<Self::Commitment> {
        let scalars: Vec<&BLSScalar> = blinding.iter().collect();
        let hi = BLSG1::multi_exp(&scalars, &self.sub_key(blinding.len(), t, slot, n)?);
        let lo = BLSG1::multi_exp(&scalars, &self.sub_key(blinding.len(), t, slot, 0)?);
        Ok(KZGCommitment(hi.sub(&lo)))
    }

    fn check_opening(
        &self,
        folded: &Self::Commitment,
        witness: &Self::Commitment,
        point: &BLSScalar,
    ) -> Result<()> {
        if self.public_parameter_group_2.len() < 2 {
            return Err(PlonkError::CommitmentError);
        }
        let lhs = folded.0.add(&witness.0.mul(point));
        let g2 = self.public_parameter_group_2[0];
        let s_g2 = self.public_parameter_group_2[1];
        let res = BLSPairingEngine::product_of_pairings(&[lhs, witness.0.neg()], &[g2, s_g2]);
        if res == <BLSPairingEngine as Pairing>::Gt::get_identity() {
            Ok(())
        } else {
            Err(PlonkError::VerificationError)
        }
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: self.public_parameter_group_1.iter().take(1).copied().collect(),
            public_parameter_group_2: self.public_parameter_group_2.clone(),
        }
    }
}
