//! Pool engine errors and their recovery classes

use crate::custody::CustodyError;
use dex_amm::{AmmError, MathError};
use dex_types::{MintPair, PoolId, ValidationError};
use thiserror::Error;

/// How a caller should treat a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Bad input, rejected before any state was read; fix the request
    Precondition,
    /// Overflow or division by zero; a scale or configuration problem
    Arithmetic,
    /// Expected economic rejection; retry with adjusted parameters
    Policy,
    /// Implementation bug; never retry
    Invariant,
}

/// Pool engine error types
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Pool {pool_id} already exists for pair {pair}")]
    DuplicatePool { pool_id: PoolId, pair: MintPair },

    #[error("Unknown pool {0}")]
    PoolNotFound(PoolId),

    #[error(transparent)]
    InvalidParameters(#[from] ValidationError),

    #[error(transparent)]
    Amm(#[from] AmmError),

    #[error("Custody operation failed: {0}")]
    Custody(#[from] CustodyError),

    #[error("Settlement rollback failed after {cause}: {rollback}")]
    RollbackFailed {
        cause: CustodyError,
        rollback: CustodyError,
    },
}

impl PoolError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicatePool { .. } | Self::PoolNotFound(_) | Self::InvalidParameters(_) => {
                ErrorClass::Precondition
            }
            Self::Amm(AmmError::ZeroAmount { .. }) => ErrorClass::Precondition,
            Self::Amm(AmmError::Arithmetic(_)) => ErrorClass::Arithmetic,
            Self::Amm(AmmError::InvariantViolation { .. }) | Self::RollbackFailed { .. } => {
                ErrorClass::Invariant
            }
            Self::Amm(_) | Self::Custody(_) => ErrorClass::Policy,
        }
    }

    /// Invariant breaks must abort the caller, never be retried
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Invariant
    }
}

impl From<MathError> for PoolError {
    fn from(err: MathError) -> Self {
        Self::Amm(AmmError::Arithmetic(err))
    }
}
