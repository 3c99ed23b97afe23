use num_bigint::BigUint;
use std::fmt;

/// Outcome of a single primality check.
///
/// `Interrupted` only ever comes out of the deterministic check when its
/// cancellation token fires mid-loop; it is never a final verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Prime,
    NotPrime {
        /// Smallest factor when the check can name one (trial division always
        /// can; Miller-Rabin only for even composites).
        smallest_factor: Option<BigUint>,
    },
    Interrupted,
}

impl Verdict {
    pub fn is_prime(&self) -> bool {
        matches!(self, Verdict::Prime)
    }
}

/// A candidate together with the verdict reached for it. Moves by value
/// between the background checks and the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimalityVerdict {
    pub candidate: BigUint,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub modulus: BigUint,
    pub exponent: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub modulus: BigUint,
    pub exponent: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPublicKey(n={}, e={})", self.modulus, self.exponent)
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPrivateKey(n={}, d={})", self.modulus, self.exponent)
    }
}
