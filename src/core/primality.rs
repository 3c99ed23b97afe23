use crate::domain::model::{PrimalityVerdict, Verdict};
use crate::domain::ports::PrimalityCheck;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use tokio_util::sync::CancellationToken;

/// Rounds for the probabilistic check; error probability is at most 4^-40.
const MILLER_RABIN_ROUNDS: u32 = 40;

/// Exhaustive trial-division check. Exact but O(sqrt(n)), so the orchestrator
/// runs it under a timeout budget; the cancellation token is polled on every
/// loop iteration.
pub struct TrialDivision;

impl PrimalityCheck for TrialDivision {
    fn check(&self, candidate: &BigUint, cancel: &CancellationToken) -> PrimalityVerdict {
        PrimalityVerdict {
            candidate: candidate.clone(),
            verdict: trial_divide(candidate, cancel),
        }
    }
}

fn trial_divide(n: &BigUint, cancel: &CancellationToken) -> Verdict {
    let one = BigUint::one();
    let two = BigUint::from(2u32);

    if *n <= one {
        return Verdict::NotPrime {
            smallest_factor: None,
        };
    }
    if *n == two {
        return Verdict::Prime;
    }
    if (n % &two).is_zero() {
        return Verdict::NotPrime {
            smallest_factor: Some(two),
        };
    }

    let mut divisor = BigUint::from(3u32);
    while &divisor * &divisor <= *n {
        if cancel.is_cancelled() {
            tracing::debug!("Trial division interrupted at divisor {}", divisor);
            return Verdict::Interrupted;
        }
        if (n % &divisor).is_zero() {
            return Verdict::NotPrime {
                smallest_factor: Some(divisor),
            };
        }
        divisor += &two;
    }

    Verdict::Prime
}

/// Miller-Rabin check with random bases. Fast, always runs to completion and
/// never reports `Interrupted`.
pub struct MillerRabin {
    rounds: u32,
}

impl MillerRabin {
    pub fn new() -> Self {
        Self {
            rounds: MILLER_RABIN_ROUNDS,
        }
    }

    pub fn with_rounds(rounds: u32) -> Self {
        Self { rounds }
    }

    pub fn check(&self, candidate: &BigUint) -> PrimalityVerdict {
        PrimalityVerdict {
            candidate: candidate.clone(),
            verdict: self.verdict(candidate),
        }
    }

    fn verdict(&self, n: &BigUint) -> Verdict {
        let one = BigUint::one();
        let two = BigUint::from(2u32);
        let three = BigUint::from(3u32);

        if *n <= one {
            return Verdict::NotPrime {
                smallest_factor: None,
            };
        }
        if *n == two || *n == three {
            return Verdict::Prime;
        }
        if (n % &two).is_zero() {
            return Verdict::NotPrime {
                smallest_factor: Some(two),
            };
        }

        // n - 1 = d * 2^s with d odd.
        let n_minus_one = n - &one;
        let mut d = n_minus_one.clone();
        let mut s = 0u32;
        while (&d % &two).is_zero() {
            d >>= 1u32;
            s += 1;
        }

        let mut rng = rand::thread_rng();
        'witness: for _ in 0..self.rounds {
            let base = rng.gen_biguint_range(&two, &n_minus_one);
            let mut x = base.modpow(&d, n);
            if x == one || x == n_minus_one {
                continue;
            }
            for _ in 1..s {
                x = x.modpow(&two, n);
                if x == n_minus_one {
                    continue 'witness;
                }
            }
            return Verdict::NotPrime {
                smallest_factor: None,
            };
        }

        Verdict::Prime
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws random odd integers of exactly `bits` bits until one passes the
/// probabilistic check. `bits` must be at least 2.
pub fn generate_probable_prime(bits: u64) -> BigUint {
    let mut rng = rand::thread_rng();
    let checker = MillerRabin::new();
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if checker.check(&candidate).verdict.is_prime() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic(n: u32) -> Verdict {
        trial_divide(&BigUint::from(n), &CancellationToken::new())
    }

    #[test]
    fn test_trial_division_small_cases() {
        assert_eq!(
            deterministic(0),
            Verdict::NotPrime {
                smallest_factor: None
            }
        );
        assert_eq!(
            deterministic(1),
            Verdict::NotPrime {
                smallest_factor: None
            }
        );
        assert_eq!(deterministic(2), Verdict::Prime);
        assert_eq!(deterministic(3), Verdict::Prime);
        assert_eq!(
            deterministic(9),
            Verdict::NotPrime {
                smallest_factor: Some(BigUint::from(3u32))
            }
        );
        assert_eq!(
            deterministic(91),
            Verdict::NotPrime {
                smallest_factor: Some(BigUint::from(7u32))
            }
        );
        assert_eq!(deterministic(7919), Verdict::Prime);
    }

    #[test]
    fn test_trial_division_reports_interruption() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let verdict = trial_divide(&BigUint::from(101u32), &cancel);
        assert_eq!(verdict, Verdict::Interrupted);
    }

    #[test]
    fn test_checks_agree_below_bound() {
        let miller = MillerRabin::new();
        for n in 2u32..2000 {
            let candidate = BigUint::from(n);
            let exact = deterministic(n).is_prime();
            let probable = miller.check(&candidate).verdict.is_prime();
            assert_eq!(exact, probable, "checks disagree on {}", n);
        }
    }

    #[test]
    fn test_miller_rabin_large_known_values() {
        let miller = MillerRabin::new();
        // 2^61 - 1 is a Mersenne prime; its predecessor is composite.
        let mersenne = (BigUint::one() << 61usize) - BigUint::one();
        assert!(miller.check(&mersenne).verdict.is_prime());
        let composite = &mersenne - BigUint::one();
        assert!(!miller.check(&composite).verdict.is_prime());
    }

    #[test]
    fn test_generate_probable_prime_has_requested_size() {
        let prime = generate_probable_prime(24);
        assert_eq!(prime.bits(), 24);
        // Small enough to confirm exhaustively.
        assert_eq!(
            trial_divide(&prime, &CancellationToken::new()),
            Verdict::Prime
        );
    }
}
