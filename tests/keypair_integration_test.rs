use num_bigint::BigUint;
use num_traits::One;
use prime_keygen::{generate_probable_prime, KeyPairBuilder, KeygenError};

#[test]
fn test_key_pair_from_small_primes() {
    let pair = KeyPairBuilder::generate(&BigUint::from(7u32), &BigUint::from(11u32)).unwrap();

    assert_eq!(pair.public.modulus, BigUint::from(77u32));
    assert_eq!(pair.private.modulus, BigUint::from(77u32));

    let totient = BigUint::from(60u32);
    let product = (&pair.public.exponent * &pair.private.exponent) % &totient;
    assert_eq!(product, BigUint::one());
}

#[test]
fn test_key_pair_round_trips_a_message() {
    // Retry on the (rare) draw where 65537 divides the totient.
    let pair = loop {
        let p = generate_probable_prime(64);
        let mut q = generate_probable_prime(64);
        while q == p {
            q = generate_probable_prime(64);
        }
        match KeyPairBuilder::generate(&p, &q) {
            Ok(pair) => break pair,
            Err(KeygenError::KeyDerivation { .. }) => continue,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    };

    // Textbook RSA round trip: (m^e)^d == m mod n.
    let message = BigUint::from(42_424_242u64);
    let ciphertext = message.modpow(&pair.public.exponent, &pair.public.modulus);
    let decrypted = ciphertext.modpow(&pair.private.exponent, &pair.private.modulus);
    assert_eq!(decrypted, message);
}

#[test]
fn test_composite_inputs_are_rejected() {
    let err = KeyPairBuilder::generate(&BigUint::from(9u32), &BigUint::from(11u32)).unwrap_err();
    match err {
        KeygenError::NotPrime { candidate, .. } => assert_eq!(candidate, BigUint::from(9u32)),
        other => panic!("expected NotPrime, got {:?}", other),
    }

    let err = KeyPairBuilder::generate(&BigUint::from(11u32), &BigUint::from(15u32)).unwrap_err();
    assert!(matches!(err, KeygenError::NotPrime { .. }));
}

#[test]
fn test_key_display_shows_components() {
    let pair = KeyPairBuilder::generate(&BigUint::from(7u32), &BigUint::from(11u32)).unwrap();
    let shown = format!("{}", pair.public);
    assert!(shown.contains("n=77"));
    assert!(shown.contains("e=65537"));
}
