//! Stakehouse Registry - the endorsed pool-per-token directory.
//!
//! Holds at most one endorsed staking pool per staking token. Listing is
//! gated twice: the caller must be an approved endorser, and the pool's
//! owner must be on the approved-owner list.

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::StakingPoolRegistry;
