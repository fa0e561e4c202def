use stakehouse_pool::OwnershipError;
use stakehouse_types::Address;
use thiserror::Error;

/// Errors from registry listing and administration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Caller {0} is not an approved pool endorser")]
    NotEndorser(Address),

    #[error("Pool owner {0} is not on the approved owner list")]
    PoolOwnerNotApproved(Address),

    #[error("Pool stakes {found}, expected {expected}")]
    TokenMismatch { expected: Address, found: Address },

    #[error("Token {0} already has an endorsed pool; pass replace to swap it")]
    AlreadyRegistered(Address),

    #[error("Token {0} has no pool to replace")]
    ReplacementMissing(Address),

    #[error("Pool {0} is already endorsed")]
    PoolAlreadyEndorsed(Address),

    #[error("Zero address not allowed")]
    ZeroAddress,

    #[error(transparent)]
    Ownership(#[from] OwnershipError),
}
