//! Reward-per-token accumulator.
//!
//! The engine never iterates accounts. A single global index — cumulative
//! reward owed per staked unit since inception, scaled by `U256::UNIT` —
//! advances lazily with elapsed time:
//!
//! ```text
//! index += elapsed * reward_rate * UNIT / total_staked
//! ```
//!
//! Each account remembers the index value it last settled against; the gap
//! times its balance is what it has earned since. Division truncates toward
//! zero, so a few base units of dust per checkpoint stay in the pool — that
//! is accepted and tested for, not eliminated.

use stakehouse_types::U256;

use crate::error::PoolError;

/// Global emission schedule and accumulator state for one pool.
#[derive(Debug, Clone)]
pub struct RewardSchedule {
    /// Reward units emitted per second, fixed for the current period
    pub reward_rate: U256,
    /// Cumulative reward-per-staked-unit index, scaled by `U256::UNIT`
    pub reward_per_token_stored: U256,
    /// Timestamp of the last index fold
    pub last_update_time: u64,
    /// Timestamp the current period stops emitting
    pub period_finish: u64,
    /// Length of a funding period in seconds
    pub rewards_duration: u64,
}

impl RewardSchedule {
    /// A schedule with no period started.
    pub fn new(rewards_duration: u64) -> Self {
        Self {
            reward_rate: U256::ZERO,
            reward_per_token_stored: U256::ZERO,
            last_update_time: 0,
            period_finish: 0,
            rewards_duration,
        }
    }

    /// Emission stops at `period_finish`; time past it earns nothing.
    pub fn last_time_reward_applicable(&self, now: u64) -> u64 {
        now.min(self.period_finish)
    }

    /// Current value of the index. Pure: mutation happens only in `settle`.
    ///
    /// With nothing staked the index stays frozen — no stakers means no
    /// distribution, and no division by zero.
    pub fn reward_per_token(&self, total_staked: &U256, now: u64) -> Result<U256, PoolError> {
        if total_staked.is_zero() {
            return Ok(self.reward_per_token_stored);
        }

        let elapsed = self
            .last_time_reward_applicable(now)
            .saturating_sub(self.last_update_time);

        let delta = U256::from(elapsed)
            .checked_mul(&self.reward_rate)
            .and_then(|n| n.checked_mul(&U256::UNIT))
            .and_then(|n| n.checked_div(total_staked))
            .ok_or(PoolError::Overflow)?;

        self.reward_per_token_stored
            .checked_add(&delta)
            .ok_or(PoolError::Overflow)
    }

    /// Fold elapsed emission into stored state. Returns the settled index.
    pub fn settle(&mut self, total_staked: &U256, now: u64) -> Result<U256, PoolError> {
        self.reward_per_token_stored = self.reward_per_token(total_staked, now)?;
        self.last_update_time = self.last_time_reward_applicable(now);
        Ok(self.reward_per_token_stored)
    }

    /// Rate that results from funding `amount` at `now`.
    ///
    /// Mid-period funding folds the un-emitted remainder of the current rate
    /// into the new amount so scheduled emission is never discarded — the
    /// fairness rule for top-ups.
    pub fn rate_after_notify(&self, amount: U256, now: u64) -> Result<U256, PoolError> {
        if self.rewards_duration == 0 {
            return Err(PoolError::ZeroDuration);
        }

        let duration = U256::from(self.rewards_duration);
        let total = if now >= self.period_finish {
            amount
        } else {
            let remaining = U256::from(self.period_finish - now);
            let leftover = remaining
                .checked_mul(&self.reward_rate)
                .ok_or(PoolError::Overflow)?;
            amount.checked_add(&leftover).ok_or(PoolError::Overflow)?
        };

        total.checked_div(&duration).ok_or(PoolError::Overflow)
    }

    /// Begin a fresh period at `rate`.
    pub fn start_period(&mut self, rate: U256, now: u64) {
        self.reward_rate = rate;
        self.last_update_time = now;
        self.period_finish = now.saturating_add(self.rewards_duration);
    }

    /// Total emission a full period pays at the current rate.
    pub fn reward_for_duration(&self) -> U256 {
        self.reward_rate
            .checked_mul(&U256::from(self.rewards_duration))
            .unwrap_or(U256::MAX)
    }

    /// Zero out the schedule. Used by the decommissioning sweep.
    pub fn reset(&mut self) {
        self.reward_rate = U256::ZERO;
        self.reward_per_token_stored = U256::ZERO;
        self.last_update_time = 0;
        self.period_finish = 0;
    }
}

/// Rewards an account has accrued: already-settled amount plus its balance
/// times the index movement since its last settlement.
pub fn earned(
    balance: &U256,
    current_index: &U256,
    paid_index: &U256,
    accrued: &U256,
) -> Result<U256, PoolError> {
    let delta = current_index
        .checked_sub(paid_index)
        .ok_or(PoolError::Overflow)?;
    let new_rewards = balance
        .checked_mul(&delta)
        .and_then(|n| n.checked_div(&U256::UNIT))
        .ok_or(PoolError::Overflow)?;
    accrued.checked_add(&new_rewards).ok_or(PoolError::Overflow)
}
