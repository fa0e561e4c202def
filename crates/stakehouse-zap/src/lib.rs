//! Stakehouse Zap - single-call convert-and-stake.
//!
//! Routes a base asset through its conversion vault and stakes the minted
//! shares into the registry-endorsed pool, all on the caller's behalf. The
//! zap holds nothing between calls.

pub mod error;
pub mod zap;

pub use error::ZapError;
pub use zap::StakingZap;
