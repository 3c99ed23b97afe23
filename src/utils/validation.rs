use crate::utils::error::{KeygenError, Result};
use num_bigint::BigUint;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(KeygenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_bit_length(field_name: &str, bits: u64) -> Result<()> {
    if !(8..=8192).contains(&bits) {
        return Err(KeygenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bits.to_string(),
            reason: "Bit length must be between 8 and 8192".to_string(),
        });
    }
    Ok(())
}

pub fn validate_candidate(field_name: &str, candidate: &BigUint) -> Result<()> {
    if *candidate < BigUint::from(2u32) {
        return Err(KeygenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: candidate.to_string(),
            reason: "Candidate must be greater than 1".to_string(),
        });
    }
    Ok(())
}

pub fn validate_candidate_count(field_name: &str, candidates: &[String]) -> Result<()> {
    if !candidates.is_empty() && candidates.len() != 2 {
        return Err(KeygenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: candidates.join(","),
            reason: "Exactly two candidates are required".to_string(),
        });
    }
    Ok(())
}
