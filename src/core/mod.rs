pub mod async_task;
pub mod engine;
pub mod keypair;
pub mod orchestrator;
pub mod primality;

pub use crate::domain::model::{PrimalityVerdict, PrivateKey, PublicKey, RsaKeyPair, Verdict};
pub use crate::domain::ports::{CandidateSource, KeygenSettings, PrimalityCheck};
pub use crate::utils::error::Result;
