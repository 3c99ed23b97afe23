use num_bigint::BigUint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeygenError {
    #[error("timed out waiting for a background task")]
    Timeout,

    #[error("background task was cancelled before producing a result")]
    TaskCancelled,

    #[error("task result is not available yet")]
    ResultNotReady,

    #[error("background computation failed: {message}")]
    ComputationFailure { message: String },

    #[error("candidate {candidate} is not prime")]
    NotPrime {
        candidate: BigUint,
        smallest_factor: Option<BigUint>,
    },

    #[error("key derivation failed: {message}")]
    KeyDerivation { message: String },

    #[error("internal consistency error: {message}")]
    InternalConsistency { message: String },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, KeygenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transient,
    Validation,
    Processing,
    Internal,
}

impl KeygenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            KeygenError::Timeout | KeygenError::TaskCancelled => ErrorCategory::Transient,
            KeygenError::NotPrime { .. } | KeygenError::InvalidConfigValueError { .. } => {
                ErrorCategory::Validation
            }
            KeygenError::ComputationFailure { .. } | KeygenError::KeyDerivation { .. } => {
                ErrorCategory::Processing
            }
            KeygenError::ResultNotReady | KeygenError::InternalConsistency { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Handled locally by the orchestrator's poll/fallback policy.
            KeygenError::Timeout | KeygenError::TaskCancelled => ErrorSeverity::Low,
            KeygenError::ResultNotReady | KeygenError::InvalidConfigValueError { .. } => {
                ErrorSeverity::Medium
            }
            KeygenError::NotPrime { .. }
            | KeygenError::ComputationFailure { .. }
            | KeygenError::KeyDerivation { .. } => ErrorSeverity::High,
            KeygenError::InternalConsistency { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            KeygenError::Timeout => {
                "Increase --poll-timeout-ms or --poll-iterations to give the deterministic check more time"
            }
            KeygenError::TaskCancelled => {
                "The deterministic check was cancelled; the probabilistic fallback normally covers this"
            }
            KeygenError::ResultNotReady => {
                "Wait for the task to complete (is_done) before reading its result"
            }
            KeygenError::ComputationFailure { .. } => {
                "Re-run the program; if the failure persists, report it with the candidate values"
            }
            KeygenError::NotPrime { .. } => {
                "Supply prime candidates, or omit --candidates to generate random probable primes"
            }
            KeygenError::KeyDerivation { .. } => {
                "Choose different primes; the public exponent must be coprime to (p-1)(q-1)"
            }
            KeygenError::InternalConsistency { .. } => {
                "This is a bug in prime-keygen; please report it"
            }
            KeygenError::InvalidConfigValueError { .. } => {
                "Check the command line flags against --help"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KeygenError::NotPrime {
                candidate,
                smallest_factor: Some(factor),
            } => format!(
                "Candidate {} is not prime (smallest factor {})",
                candidate, factor
            ),
            KeygenError::NotPrime { candidate, .. } => {
                format!("Candidate {} is not prime", candidate)
            }
            KeygenError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(KeygenError::Timeout.severity(), ErrorSeverity::Low);
        assert_eq!(
            KeygenError::NotPrime {
                candidate: BigUint::from(9u32),
                smallest_factor: Some(BigUint::from(3u32)),
            }
            .severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            KeygenError::InternalConsistency {
                message: "boom".to_string()
            }
            .severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_user_friendly_message_includes_factor() {
        let err = KeygenError::NotPrime {
            candidate: BigUint::from(9u32),
            smallest_factor: Some(BigUint::from(3u32)),
        };
        assert_eq!(
            err.user_friendly_message(),
            "Candidate 9 is not prime (smallest factor 3)"
        );
    }
}
