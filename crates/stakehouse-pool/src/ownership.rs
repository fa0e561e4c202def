//! Two-step ownership transfer.
//!
//! The current owner proposes a successor; nothing changes until the
//! successor calls `accept`. An owner can therefore never hand control to an
//! address that cannot act.

use stakehouse_types::Address;
use thiserror::Error;

/// Errors from ownership checks and transfers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("Caller {0} is not the owner")]
    NotOwner(Address),

    #[error("Caller {0} is not the pending owner")]
    NotPendingOwner(Address),

    #[error("New owner cannot be the zero address")]
    ZeroOwner,
}

/// Owner plus optional pending successor.
#[derive(Debug, Clone)]
pub struct Ownership {
    owner: Address,
    pending: Option<Address>,
}

impl Ownership {
    /// Ownership effective immediately.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            pending: None,
        }
    }

    /// Ownership that must be claimed: `owner` holds control until
    /// `pending` accepts.
    pub fn pending(owner: Address, pending: Address) -> Self {
        Self {
            owner,
            pending: Some(pending),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.pending
    }

    /// Fail unless `caller` is the current owner.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), OwnershipError> {
        if caller != self.owner {
            return Err(OwnershipError::NotOwner(caller));
        }
        Ok(())
    }

    /// Propose a successor. Owner-only; the proposal replaces any earlier one.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OwnershipError::ZeroOwner);
        }
        self.pending = Some(new_owner);
        Ok(())
    }

    /// Claim ownership. Only the pending successor may call.
    pub fn accept(&mut self, caller: Address) -> Result<(), OwnershipError> {
        if self.pending != Some(caller) {
            return Err(OwnershipError::NotPendingOwner(caller));
        }
        self.owner = caller;
        self.pending = None;
        Ok(())
    }
}
