use crate::domain::model::PrimalityVerdict;
use crate::utils::error::Result;
use num_bigint::BigUint;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Supplies the two candidates for one key-generation run.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self) -> Result<(BigUint, BigUint)>;
}

pub trait KeygenSettings: Send + Sync {
    /// Number of bounded waits the orchestrator grants each deterministic check.
    fn poll_iterations(&self) -> u32;

    /// Length of each bounded wait.
    fn poll_timeout(&self) -> Duration;
}

/// A primality check that honors cooperative cancellation. Implementations
/// must poll the token inside their main loop and report
/// `Verdict::Interrupted` once it fires.
pub trait PrimalityCheck: Send + Sync + 'static {
    fn check(&self, candidate: &BigUint, cancel: &CancellationToken) -> PrimalityVerdict;
}
