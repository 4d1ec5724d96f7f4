use crate::bls12_381::{BLSGt, BLSScalar, BLSG1, BLSG2};
use crate::prelude::*;
use serde::de::{SeqAccess, Visitor};

/// Byte encoding shared by every element that goes through serde.
pub trait FromToBytes: Sized {
    /// Convert to bytes.
    fn to_bytes_for_serde(&self) -> Vec<u8>;
    /// Reconstruct from bytes.
    fn from_bytes_for_serde(bytes: &[u8]) -> core::result::Result<Self, AlgebraError>;
}

/// Accepts raw bytes, byte sequences, or base64 strings.
pub struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut Formatter) -> core::fmt::Result {
        formatter.write_str("a byte-encoded algebraic object")
    }

    fn visit_seq<V>(self, mut seq: V) -> core::result::Result<Vec<u8>, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut vec: Vec<u8> = vec![];
        while let Some(x) = seq.next_element()? {
            vec.push(x);
        }
        Ok(vec)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E> {
        Ok(v.to_vec())
    }

    fn visit_str<E>(self, v: &str) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        b64dec(v).map_err(serde::de::Error::custom)
    }
}

/// Implement serde through [`FromToBytes`]: base64 for human-readable
/// formats, raw bytes otherwise.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let bytes = $crate::serialization::FromToBytes::to_bytes_for_serde(self);
                if serializer.is_human_readable() {
                    serializer.serialize_str(&$crate::utils::b64enc(&bytes))
                } else {
                    serializer.serialize_bytes(&bytes)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str($crate::serialization::BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes($crate::serialization::BytesVisitor)?
                };
                <$t as $crate::serialization::FromToBytes>::from_bytes_for_serde(&bytes)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

macro_rules! to_from_bytes_scalar {
    ($t:ident) => {
        impl FromToBytes for $t {
            fn to_bytes_for_serde(&self) -> Vec<u8> {
                self.to_bytes()
            }
            fn from_bytes_for_serde(bytes: &[u8]) -> Result<$t> {
                if bytes.len() != $t::bytes_len() {
                    return Err(AlgebraError::DeserializationError);
                }
                $t::from_bytes(bytes)
            }
        }
    };
}

macro_rules! to_from_bytes_group {
    ($g:ident) => {
        impl FromToBytes for $g {
            fn to_bytes_for_serde(&self) -> Vec<u8> {
                self.to_compressed_bytes()
            }
            fn from_bytes_for_serde(bytes: &[u8]) -> Result<$g> {
                $g::from_compressed_bytes(bytes)
            }
        }
    };
}

to_from_bytes_scalar!(BLSScalar);
to_from_bytes_group!(BLSG1);
to_from_bytes_group!(BLSG2);
to_from_bytes_group!(BLSGt);

serialize_deserialize!(BLSScalar);
serialize_deserialize!(BLSG1);
serialize_deserialize!(BLSG2);
serialize_deserialize!(BLSGt);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json_uses_base64_strings() {
        let mut prng = test_rng();
        let s = BLSScalar::random(&mut prng);
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.starts_with('"'));
        let back: BLSScalar = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);

        let g = BLSG1::random(&mut prng);
        let back: BLSG1 = serde_json::from_str(&serde_json::to_string(&g).unwrap()).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let mut prng = test_rng();
        let g = BLSG2::random(&mut prng);
        let bytes = g.to_compressed_bytes();
        assert!(BLSG2::from_bytes_for_serde(&bytes[..bytes.len() - 1]).is_err());
        assert!(BLSScalar::from_bytes_for_serde(&[1u8; 5]).is_err());
    }
}
