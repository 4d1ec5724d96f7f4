use crate::prelude::*;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use digest::generic_array::typenum::U64;
use digest::Digest;
use rand_chacha::ChaCha20Rng;

const BASE64_PADDING_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const BASE64_ENGINE: GeneralPurpose = GeneralPurpose::new(&URL_SAFE, BASE64_PADDING_CONFIG);

/// Convert an 8 byte array (little-endian) into a u64
pub fn u8_le_slice_to_u64(slice: &[u8]) -> u64 {
    let mut a = [0u8; 8];
    a.copy_from_slice(slice);
    u64::from_le_bytes(a)
}

/// Convert the input into the base64 encoding
pub fn b64enc<T: ?Sized + AsRef<[u8]>>(input: &T) -> String {
    BASE64_ENGINE.encode(input)
}

/// Reconstruct from the base64 encoding
pub fn b64dec<T: ?Sized + AsRef<[u8]>>(input: &T) -> Result<Vec<u8>> {
    BASE64_ENGINE
        .decode(input)
        .map_err(|_| AlgebraError::DeserializationError)
}

/// Derive a ChaCha20Rng PRNG from a digest from a hash function
pub fn derive_prng_from_hash<D>(hash: D) -> ChaCha20Rng
where
    D: Digest<OutputSize = U64> + Default,
{
    const SEED_SIZE: usize = 32;
    let mut seed: [u8; SEED_SIZE] = [0; SEED_SIZE];
    let result = hash.finalize();
    seed.copy_from_slice(&result[0..SEED_SIZE]);
    ChaCha20Rng::from_seed(seed)
}

/// Reverse the lowest `log_size` bits of `index`.
pub fn bit_reverse_index(index: usize, log_size: u32) -> usize {
    if log_size == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS - log_size)
}

#[cfg(test)]
mod test {
    use super::*;
    use sha2::Sha512;

    #[test]
    fn base64_round_trip() {
        let bytes = [0u8, 1, 2, 250, 251, 252, 253, 254, 255];
        let encoded = b64enc(&bytes);
        assert_eq!(b64dec(&encoded).unwrap(), bytes.to_vec());
        assert!(b64dec("@@").is_err());
    }

    #[test]
    fn prng_from_hash_is_deterministic() {
        let mut a = derive_prng_from_hash(Sha512::new_with_prefix(b"seed"));
        let mut b = derive_prng_from_hash(Sha512::new_with_prefix(b"seed"));
        let mut c = derive_prng_from_hash(Sha512::new_with_prefix(b"other"));
        let x = a.next_u64();
        assert_eq!(x, b.next_u64());
        assert_ne!(x, c.next_u64());
    }

    #[test]
    fn bit_reversal() {
        assert_eq!(bit_reverse_index(0, 0), 0);
        assert_eq!(bit_reverse_index(1, 1), 1);
        assert_eq!(bit_reverse_index(1, 3), 4);
        assert_eq!(bit_reverse_index(6, 3), 3);
        for i in 0..16 {
            assert_eq!(bit_reverse_index(bit_reverse_index(i, 4), 4), i);
        }
    }

    #[test]
    fn u64_from_le_slice() {
        let array = [0xA2_u8, 0x98, 0xE4, 0x22, 0x73, 0xC6, 0x01, 0xFA];
        assert_eq!(u8_le_slice_to_u64(&array), 0xFA01C67322E498A2);
    }
}
