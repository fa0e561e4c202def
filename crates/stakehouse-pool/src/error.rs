use stakehouse_token::LedgerError;
use stakehouse_types::Address;
use thiserror::Error;

use crate::ownership::OwnershipError;

/// Errors that can occur in pool operations.
///
/// Every distinguishable failure gets its own variant so a caller can tell
/// what to fix before re-issuing the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error("Staking and rewards token must differ")]
    SameToken,

    #[error("Pool is retired")]
    PoolRetired,

    #[error("Insufficient staked balance: have {have}, need {need}")]
    InsufficientStake { have: String, need: String },

    #[error("Only the zap contract may stake for a third party, not {0}")]
    UnauthorizedStakeFor(Address),

    #[error("Provided reward exceeds the pool's reward token balance")]
    RewardTooHigh,

    #[error("Reward period still active until {period_finish}")]
    PeriodActive { period_finish: u64 },

    #[error("Rewards duration must be greater than zero")]
    ZeroDuration,

    #[error("Reward token sweep locked until {available_at}")]
    SweepCooldownActive { available_at: u64 },

    #[error("Cannot sweep the staking token")]
    StakingTokenProtected,

    #[error("Cannot clone a cloned pool")]
    CloneOfClone,

    #[error("Arithmetic overflow in reward accounting")]
    Overflow,

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
