use crate::core::keypair::KeyPairBuilder;
use crate::core::orchestrator::PrimalityOrchestrator;
use crate::core::primality::TrialDivision;
use crate::domain::model::RsaKeyPair;
use crate::domain::ports::{CandidateSource, KeygenSettings, PrimalityCheck};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_candidate;

/// Drives one key-generation run end to end: acquire two candidates,
/// orchestrate the primality checks, derive the key pair.
pub struct KeygenEngine<C: CandidateSource, S: KeygenSettings, D: PrimalityCheck = TrialDivision> {
    source: C,
    orchestrator: PrimalityOrchestrator<S, D>,
    monitor_enabled: bool,
}

impl<C: CandidateSource, S: KeygenSettings, D: PrimalityCheck> KeygenEngine<C, S, D> {
    pub fn new(source: C, orchestrator: PrimalityOrchestrator<S, D>) -> Self {
        Self {
            source,
            orchestrator,
            monitor_enabled: false,
        }
    }

    pub fn new_with_monitoring(
        source: C,
        orchestrator: PrimalityOrchestrator<S, D>,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            source,
            orchestrator,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<RsaKeyPair> {
        let monitor = SystemMonitor::new(self.monitor_enabled);

        tracing::info!("Acquiring prime candidates...");
        let (candidate0, candidate1) = self.source.candidates()?;
        validate_candidate("candidate0", &candidate0)?;
        validate_candidate("candidate1", &candidate1)?;
        tracing::info!(
            "Candidates acquired ({} and {} bits)",
            candidate0.bits(),
            candidate1.bits()
        );

        tracing::info!("Checking primality...");
        let (verdict0, verdict1) = self.orchestrator.run(candidate0, candidate1).await?;
        tracing::info!(
            "Both candidates confirmed prime: {} and {}",
            verdict0.candidate,
            verdict1.candidate
        );

        tracing::info!("Deriving RSA key pair...");
        let key_pair = KeyPairBuilder::generate(&verdict0.candidate, &verdict1.candidate)?;
        tracing::info!("Key pair derived (modulus {} bits)", key_pair.public.modulus.bits());

        monitor.log_final_stats();

        Ok(key_pair)
    }
}
