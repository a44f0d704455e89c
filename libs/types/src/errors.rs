//! Error types for identity parsing and pool-parameter validation
//!
//! These are raised while building value types, before any pool state is
//! touched, so every variant here is a caller-side precondition failure.

use thiserror::Error;

/// Errors that can occur while validating pool parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Both sides of a pair name the same mint
    #[error("Pair requires two distinct mints, got {mint} twice")]
    IdenticalMints { mint: String },

    /// Fee schedule is not a proper fraction
    #[error("Invalid fee {numerator}/{denominator}: need denominator > 0 and numerator < denominator")]
    InvalidFee { numerator: u64, denominator: u64 },

    /// Address string could not be decoded
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
}
