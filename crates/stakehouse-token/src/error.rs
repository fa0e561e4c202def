use stakehouse_types::Address;
use thiserror::Error;

/// Errors that can occur in ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Unknown token: {0}")]
    UnknownToken(Address),

    #[error("Token already registered: {0}")]
    TokenAlreadyRegistered(Address),

    #[error("Insufficient balance of {token} for {holder}: have {have}, need {need}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        have: String,
        need: String,
    },

    #[error("Token supply overflow for {0}")]
    SupplyOverflow(Address),
}

/// Errors that can occur in vault operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Vault share math overflow")]
    ShareOverflow,
}
