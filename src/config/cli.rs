use crate::core::primality::generate_probable_prime;
use crate::domain::ports::{CandidateSource, KeygenSettings};
use crate::utils::error::{KeygenError, Result};
use crate::utils::validation::{
    validate_bit_length, validate_candidate_count, validate_positive_number, Validate,
};
use clap::Parser;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "prime-keygen")]
#[command(about = "Derives an RSA key pair from two concurrently checked prime candidates")]
pub struct CliConfig {
    /// Bit length of the randomly generated candidates.
    #[arg(long, default_value = "256")]
    pub bits: u64,

    /// Two fixed decimal candidates instead of random generation.
    #[arg(long, value_delimiter = ',')]
    pub candidates: Vec<String>,

    #[arg(long, default_value = "5")]
    pub poll_iterations: u32,

    #[arg(long, default_value = "1000")]
    pub poll_timeout_ms: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Report process CPU/memory usage")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn candidate_source(&self) -> Result<CliCandidateSource> {
        if self.candidates.is_empty() {
            return Ok(CliCandidateSource::Random { bits: self.bits });
        }

        validate_candidate_count("candidates", &self.candidates)?;
        let mut parsed = self.candidates.iter().map(|raw| {
            raw.trim()
                .parse::<BigUint>()
                .map_err(|e| KeygenError::InvalidConfigValueError {
                    field: "candidates".to_string(),
                    value: raw.clone(),
                    reason: format!("Not a decimal integer: {}", e),
                })
        });
        let first = parsed.next().expect("validated to hold two entries")?;
        let second = parsed.next().expect("validated to hold two entries")?;
        Ok(CliCandidateSource::Fixed { first, second })
    }
}

impl KeygenSettings for CliConfig {
    fn poll_iterations(&self) -> u32 {
        self.poll_iterations
    }

    fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_bit_length("bits", self.bits)?;
        validate_positive_number("poll_iterations", u64::from(self.poll_iterations), 1)?;
        validate_positive_number("poll_timeout_ms", self.poll_timeout_ms, 1)?;
        validate_candidate_count("candidates", &self.candidates)?;
        Ok(())
    }
}

/// Candidate acquisition for the CLI path: random probable primes of the
/// configured size, or two fixed values supplied on the command line.
pub enum CliCandidateSource {
    Random { bits: u64 },
    Fixed { first: BigUint, second: BigUint },
}

impl CandidateSource for CliCandidateSource {
    fn candidates(&self) -> Result<(BigUint, BigUint)> {
        match self {
            CliCandidateSource::Random { bits } => {
                tracing::debug!("Generating two {}-bit probable primes", bits);
                Ok((generate_probable_prime(*bits), generate_probable_prime(*bits)))
            }
            CliCandidateSource::Fixed { first, second } => Ok((first.clone(), second.clone())),
        }
    }
}
