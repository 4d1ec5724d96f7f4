use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

const DETERMINISTIC_SEED: [u8; 32] = [
    1, 0, 0, 0, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0,
];

/// Should be used only for tests, not for any real world usage.
///
/// Setting `DETERMINISTIC_TEST_RNG=1` makes every call return the same stream.
pub fn test_rng() -> ChaChaRng {
    let is_deterministic =
        std::env::vars().any(|(key, val)| key == "DETERMINISTIC_TEST_RNG" && val == "1");
    if is_deterministic {
        ChaChaRng::from_seed(DETERMINISTIC_SEED)
    } else {
        ChaChaRng::from_entropy()
    }
}

#[cfg(test)]
mod test {
    use ark_std::UniformRand;

    #[test]
    fn fresh_rngs_diverge() {
        let mut rng = super::test_rng();
        let a = u128::rand(&mut rng);
        let mut rng = super::test_rng();
        let b = u128::rand(&mut rng);
        if std::env::var("DETERMINISTIC_TEST_RNG").as_deref() == Ok("1") {
            assert_eq!(a, b);
        } else {
            assert_ne!(a, b);
        }
    }
}
