use stakehouse_pool::PoolError;
use stakehouse_token::{LedgerError, VaultError};
use stakehouse_types::Address;
use thiserror::Error;

/// Errors from the zap route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZapError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("No endorsed staking pool for token {0}")]
    PoolNotRegistered(Address),

    #[error("Vault can accept {capacity}, asked to take {asked}")]
    VaultCapacityExceeded { capacity: String, asked: String },

    #[error("Vault minted no shares")]
    NoSharesMinted,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}
