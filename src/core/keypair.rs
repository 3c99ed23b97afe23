use crate::core::primality::MillerRabin;
use crate::domain::model::{PrivateKey, PublicKey, RsaKeyPair, Verdict};
use crate::utils::error::{KeygenError, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// The commonly used RSA public exponent.
const PUBLIC_EXPONENT: u32 = 65_537;

/// Derives an RSA key pair from two primes:
/// modulus = p * q, e = 65537, d = e^-1 mod (p-1)(q-1).
pub struct KeyPairBuilder;

impl KeyPairBuilder {
    /// Fails with `NotPrime` if either input is composite; the inputs are
    /// re-verified probabilistically rather than trusted.
    pub fn generate(prime1: &BigUint, prime2: &BigUint) -> Result<RsaKeyPair> {
        let checker = MillerRabin::new();
        for prime in [prime1, prime2] {
            match checker.check(prime).verdict {
                Verdict::Prime => {}
                Verdict::NotPrime { smallest_factor } => {
                    return Err(KeygenError::NotPrime {
                        candidate: prime.clone(),
                        smallest_factor,
                    })
                }
                Verdict::Interrupted => {
                    return Err(KeygenError::InternalConsistency {
                        message: "probabilistic check reported an interrupted verdict".to_string(),
                    })
                }
            }
        }

        let modulus = prime1 * prime2;
        let public_exponent = BigUint::from(PUBLIC_EXPONENT);
        let one = BigUint::one();
        let totient = (prime1 - &one) * (prime2 - &one);

        let private_exponent =
            mod_inverse(&public_exponent, &totient).ok_or_else(|| KeygenError::KeyDerivation {
                message: format!("{} is not invertible modulo the totient", PUBLIC_EXPONENT),
            })?;

        Ok(RsaKeyPair {
            public: PublicKey {
                modulus: modulus.clone(),
                exponent: public_exponent,
            },
            private: PrivateKey {
                modulus,
                exponent: private_exponent,
            },
        })
    }
}

fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    let value = BigInt::from(value.clone());
    let modulus = BigInt::from(modulus.clone());
    let extended = value.extended_gcd(&modulus);
    if !extended.gcd.is_one() {
        return None;
    }
    let mut inverse = extended.x % &modulus;
    if inverse < BigInt::zero() {
        inverse += &modulus;
    }
    inverse.to_biguint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_inverse_small_values() {
        let inverse = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inverse, BigUint::from(4u32));

        // 2 has no inverse modulo 4.
        assert!(mod_inverse(&BigUint::from(2u32), &BigUint::from(4u32)).is_none());
    }

    #[test]
    fn test_generate_small_key_pair() {
        let pair = KeyPairBuilder::generate(&BigUint::from(7u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(pair.public.modulus, BigUint::from(77u32));
        assert_eq!(pair.public.exponent, BigUint::from(65_537u32));
        assert_eq!(pair.private.modulus, BigUint::from(77u32));

        // d * e == 1 mod (p-1)(q-1)
        let totient = BigUint::from(60u32);
        let product = (&pair.private.exponent * &pair.public.exponent) % &totient;
        assert_eq!(product, BigUint::one());
    }

    #[test]
    fn test_generate_rejects_composite_input() {
        let err = KeyPairBuilder::generate(&BigUint::from(9u32), &BigUint::from(11u32)).unwrap_err();
        assert!(matches!(err, KeygenError::NotPrime { .. }));
    }
}
