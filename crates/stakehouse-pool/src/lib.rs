//! Stakehouse Pool - the reward-distribution core.
//!
//! This crate provides:
//! - The reward-per-token accumulator (lazy, O(1) per account)
//! - The staking pool state machine (stake/withdraw/claim/notify/sweep)
//! - Two-step ownership transfer
//! - A factory replacing the original clonable-template deployment

pub mod accumulator;
pub mod pool;
pub mod ownership;
pub mod factory;
pub mod error;

pub use accumulator::RewardSchedule;
pub use error::PoolError;
pub use factory::PoolFactory;
pub use ownership::{Ownership, OwnershipError};
pub use pool::{PoolConfig, StakingPool, DEFAULT_REWARDS_DURATION, SWEEP_COOLDOWN};
