//! Stakehouse Token - external collaborator models.
//!
//! This crate provides:
//! - The fungible balance ledger pools move custody through
//! - The conversion vault (base asset in, shares out) the zap deposits into

pub mod ledger;
pub mod vault;
pub mod error;

pub use error::{LedgerError, VaultError};
pub use ledger::{TokenInfo, TokenLedger};
pub use vault::Vault;
