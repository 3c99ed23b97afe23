pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliCandidateSource, CliConfig};
pub use crate::config::PollSettings;

pub use crate::core::async_task::AsyncTask;
pub use crate::core::engine::KeygenEngine;
pub use crate::core::keypair::KeyPairBuilder;
pub use crate::core::orchestrator::PrimalityOrchestrator;
pub use crate::core::primality::{generate_probable_prime, MillerRabin, TrialDivision};
pub use crate::domain::model::{PrimalityVerdict, PrivateKey, PublicKey, RsaKeyPair, Verdict};
pub use crate::domain::ports::{CandidateSource, KeygenSettings, PrimalityCheck};
pub use crate::utils::error::{KeygenError, Result};
