use crate::core::async_task::AsyncTask;
use crate::core::primality::{MillerRabin, TrialDivision};
use crate::domain::model::{PrimalityVerdict, Verdict};
use crate::domain::ports::{KeygenSettings, PrimalityCheck};
use crate::utils::error::{KeygenError, Result};
use num_bigint::BigUint;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs the deterministic check for two candidates concurrently, each behind
/// an [`AsyncTask`], polling with up to `poll_iterations` waits of
/// `poll_timeout` each. A candidate whose deterministic verdict does not
/// arrive inside that budget gets its task cancelled and falls back to the
/// probabilistic check, run synchronously in candidate order.
pub struct PrimalityOrchestrator<S: KeygenSettings, D: PrimalityCheck = TrialDivision> {
    settings: S,
    deterministic: Arc<D>,
    probabilistic: MillerRabin,
}

impl<S: KeygenSettings> PrimalityOrchestrator<S> {
    pub fn new(settings: S) -> Self {
        Self::with_deterministic(settings, Arc::new(TrialDivision))
    }
}

impl<S: KeygenSettings, D: PrimalityCheck> PrimalityOrchestrator<S, D> {
    /// Injects a custom deterministic check; the seam the tests use to slow
    /// the check down past its budget.
    pub fn with_deterministic(settings: S, deterministic: Arc<D>) -> Self {
        Self {
            settings,
            deterministic,
            probabilistic: MillerRabin::new(),
        }
    }

    /// Produces one final verdict per candidate, in input order. Fails with
    /// `NotPrime` if either final verdict is composite, and with
    /// `ComputationFailure` if a background check itself failed.
    pub async fn run(
        &self,
        candidate0: BigUint,
        candidate1: BigUint,
    ) -> Result<(PrimalityVerdict, PrimalityVerdict)> {
        let candidates = [candidate0, candidate1];

        let tasks: Vec<AsyncTask<PrimalityVerdict>> = candidates
            .iter()
            .map(|candidate| {
                let checker = Arc::clone(&self.deterministic);
                AsyncTask::spawn(
                    move |value: BigUint, cancel: CancellationToken| checker.check(&value, &cancel),
                    candidate.clone(),
                )
            })
            .collect();

        let mut captured: Vec<(usize, PrimalityVerdict)> = Vec::new();
        for (index, task) in tasks.iter().enumerate() {
            match self.poll_deterministic(index, task).await {
                Ok(Some(verdict)) => captured.push((index, verdict)),
                Ok(None) => {}
                Err(err) => {
                    // A failed check aborts the whole run; stop the sibling
                    // tasks instead of leaving their workers spinning.
                    for other in &tasks {
                        if !other.is_done() && !other.is_cancelled() {
                            other.cancel(true);
                        }
                    }
                    return Err(err);
                }
            }
        }

        let mut slots: [Option<PrimalityVerdict>; 2] = [None, None];
        let captured_count = captured.len();
        for (index, verdict) in captured {
            slots[index] = Some(verdict);
        }

        match captured_count {
            0 | 1 => {
                for (index, candidate) in candidates.iter().enumerate() {
                    if slots[index].is_none() {
                        tracing::info!(
                            "No deterministic verdict for candidate {}, running probabilistic fallback",
                            index
                        );
                        slots[index] = Some(self.probabilistic.check(candidate));
                    }
                }
            }
            2 => {}
            n => {
                return Err(KeygenError::InternalConsistency {
                    message: format!("captured {} deterministic verdicts for 2 candidates", n),
                })
            }
        }

        let [Some(verdict0), Some(verdict1)] = slots else {
            return Err(KeygenError::InternalConsistency {
                message: "a candidate is missing a final verdict".to_string(),
            });
        };

        for verdict in [&verdict0, &verdict1] {
            match &verdict.verdict {
                Verdict::Prime => {}
                Verdict::NotPrime { smallest_factor } => {
                    return Err(KeygenError::NotPrime {
                        candidate: verdict.candidate.clone(),
                        smallest_factor: smallest_factor.clone(),
                    })
                }
                Verdict::Interrupted => {
                    return Err(KeygenError::InternalConsistency {
                        message: "an interrupted verdict survived the fallback".to_string(),
                    })
                }
            }
        }

        Ok((verdict0, verdict1))
    }

    /// Polls one task within its budget. Returns `None` when no usable
    /// deterministic verdict arrived (timeout-then-cancel, cancellation, or
    /// an interrupted verdict); `Timeout` and `TaskCancelled` are handled
    /// here and never surface. A `ComputationFailure` aborts the run.
    async fn poll_deterministic(
        &self,
        index: usize,
        task: &AsyncTask<PrimalityVerdict>,
    ) -> Result<Option<PrimalityVerdict>> {
        let iterations = self.settings.poll_iterations();
        let wait = self.settings.poll_timeout();

        let mut verdict = None;
        for attempt in 0..iterations {
            if task.is_done() {
                match task.result_now() {
                    Ok(value) => verdict = Some(value),
                    Err(KeygenError::TaskCancelled) => {}
                    Err(other) => return Err(other),
                }
                break;
            }
            match task.get_timeout(wait).await {
                Ok(value) => {
                    verdict = Some(value);
                    break;
                }
                Err(KeygenError::Timeout) => {
                    tracing::debug!(
                        "Deterministic check for candidate {} still running after attempt {}",
                        index,
                        attempt + 1
                    );
                }
                Err(KeygenError::TaskCancelled) => break,
                Err(other) => return Err(other),
            }
        }

        // The task may have reached a terminal state after the last wait
        // elapsed; capture that before deciding to cancel.
        if verdict.is_none() && task.is_done() {
            match task.result_now() {
                Ok(value) => verdict = Some(value),
                Err(KeygenError::TaskCancelled) => {}
                Err(other) => return Err(other),
            }
        }

        if !task.is_done() && !task.is_cancelled() {
            tracing::info!(
                "Deterministic check for candidate {} exceeded its budget, cancelling",
                index
            );
            task.cancel(true);
        }

        // An interrupted check never counts as a deterministic result.
        Ok(verdict.filter(|value| value.verdict != Verdict::Interrupted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PollSettings;

    #[tokio::test]
    async fn test_fast_candidates_resolve_deterministically() {
        let orchestrator = PrimalityOrchestrator::new(PollSettings::default());
        let (v0, v1) = orchestrator
            .run(BigUint::from(7u32), BigUint::from(11u32))
            .await
            .unwrap();
        assert_eq!(v0.candidate, BigUint::from(7u32));
        assert_eq!(v0.verdict, Verdict::Prime);
        assert_eq!(v1.candidate, BigUint::from(11u32));
        assert_eq!(v1.verdict, Verdict::Prime);
    }

    #[tokio::test]
    async fn test_composite_candidate_fails_with_factor() {
        let orchestrator = PrimalityOrchestrator::new(PollSettings::default());
        let err = orchestrator
            .run(BigUint::from(9u32), BigUint::from(11u32))
            .await
            .unwrap_err();
        match err {
            KeygenError::NotPrime {
                candidate,
                smallest_factor,
            } => {
                assert_eq!(candidate, BigUint::from(9u32));
                assert_eq!(smallest_factor, Some(BigUint::from(3u32)));
            }
            other => panic!("expected NotPrime, got {:?}", other),
        }
    }
}
