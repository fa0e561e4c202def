//! The staking pool state machine.
//!
//! One pool pays one reward token to stakers of one staking token. Every
//! mutating operation settles the accumulator first (the checkpoint), then
//! applies its own effect, then moves custody through the ledger — state is
//! final before any transfer happens. A pool runs until governance sweeps
//! the reward token after the post-period cooldown, which retires it for
//! good: no new stakes, withdrawals and claims still honored.

use std::collections::HashMap;

use parking_lot::Mutex;
use stakehouse_token::TokenLedger;
use stakehouse_types::{Address, U256};

use crate::accumulator::{earned, RewardSchedule};
use crate::error::PoolError;
use crate::ownership::Ownership;

/// Default funding period length: 7 days.
pub const DEFAULT_REWARDS_DURATION: u64 = 7 * 24 * 60 * 60;

/// Grace window after a period ends before the reward token may be swept:
/// 90 days.
pub const SWEEP_COOLDOWN: u64 = 90 * 24 * 60 * 60;

/// Construction parameters for a pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// The pool's own address (its custody account in the ledger)
    pub address: Address,
    /// Governance owner
    pub owner: Address,
    /// Token paid out as rewards
    pub rewards_token: Address,
    /// Token users stake
    pub staking_token: Address,
    /// Only address allowed to stake on behalf of someone else.
    /// Zero disables third-party staking until set.
    pub zap_contract: Address,
}

#[derive(Debug)]
struct PoolState {
    schedule: RewardSchedule,
    total_staked: U256,
    balances: HashMap<Address, U256>,
    user_reward_per_token_paid: HashMap<Address, U256>,
    rewards: HashMap<Address, U256>,
    retired: bool,
    zap_contract: Address,
    ownership: Ownership,
}

impl PoolState {
    /// Settle the global index, and optionally an account's view of it.
    /// Every mutating operation runs this first.
    fn checkpoint(&mut self, account: Option<Address>, now: u64) -> Result<(), PoolError> {
        let index = self.schedule.settle(&self.total_staked, now)?;

        if let Some(account) = account {
            let accrued = self.earned_at(account, index)?;
            self.rewards.insert(account, accrued);
            self.user_reward_per_token_paid.insert(account, index);
        }
        Ok(())
    }

    /// Account's accrued-but-unclaimed rewards against a given index value.
    /// A retired pool owes nothing: the sweep reclaimed the funding.
    fn earned_at(&self, account: Address, index: U256) -> Result<U256, PoolError> {
        if self.retired {
            return Ok(U256::ZERO);
        }
        let balance = self.balance_of(account);
        let paid = self
            .user_reward_per_token_paid
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO);
        let accrued = self.rewards.get(&account).copied().unwrap_or(U256::ZERO);
        earned(&balance, &index, &paid, &accrued)
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or(U256::ZERO)
    }
}

/// A staking pool. All public operations are atomic: each one holds the
/// pool's mutex for its whole body.
#[derive(Debug)]
pub struct StakingPool {
    address: Address,
    staking_token: Address,
    rewards_token: Address,
    /// Set for pools spawned by `PoolFactory::clone_pool`; clones cannot be
    /// cloned again.
    cloned: bool,
    ledger: TokenLedger,
    state: Mutex<PoolState>,
}

impl StakingPool {
    /// Build a pool with ownership effective immediately.
    pub fn new(config: PoolConfig, ledger: TokenLedger) -> Result<Self, PoolError> {
        Self::build(config, ledger, None)
    }

    pub(crate) fn build(
        config: PoolConfig,
        ledger: TokenLedger,
        clone_deployer: Option<Address>,
    ) -> Result<Self, PoolError> {
        if config.address.is_zero()
            || config.owner.is_zero()
            || config.rewards_token.is_zero()
            || config.staking_token.is_zero()
        {
            return Err(PoolError::ZeroAddress);
        }
        if config.staking_token == config.rewards_token {
            return Err(PoolError::SameToken);
        }

        // Clone handshake: the deployer governs until the requested owner
        // accepts.
        let ownership = match clone_deployer {
            Some(deployer) => Ownership::pending(deployer, config.owner),
            None => Ownership::new(config.owner),
        };

        Ok(Self {
            address: config.address,
            staking_token: config.staking_token,
            rewards_token: config.rewards_token,
            cloned: clone_deployer.is_some(),
            ledger,
            state: Mutex::new(PoolState {
                schedule: RewardSchedule::new(DEFAULT_REWARDS_DURATION),
                total_staked: U256::ZERO,
                balances: HashMap::new(),
                user_reward_per_token_paid: HashMap::new(),
                rewards: HashMap::new(),
                retired: false,
                zap_contract: config.zap_contract,
                ownership,
            }),
        })
    }

    // ---- views ----

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn staking_token(&self) -> Address {
        self.staking_token
    }

    pub fn rewards_token(&self) -> Address {
        self.rewards_token
    }

    pub fn is_cloned(&self) -> bool {
        self.cloned
    }

    pub fn owner(&self) -> Address {
        self.state.lock().ownership.owner()
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.state.lock().ownership.pending_owner()
    }

    pub fn zap_contract(&self) -> Address {
        self.state.lock().zap_contract
    }

    pub fn is_retired(&self) -> bool {
        self.state.lock().retired
    }

    pub fn total_supply(&self) -> U256 {
        self.state.lock().total_staked
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.state.lock().balance_of(account)
    }

    /// Stored (settled) rewards for an account, excluding lazy accrual.
    pub fn rewards_of(&self, account: Address) -> U256 {
        self.state
            .lock()
            .rewards
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Index value the account last settled against.
    pub fn user_reward_per_token_paid(&self, account: Address) -> U256 {
        self.state
            .lock()
            .user_reward_per_token_paid
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Current reward-per-token index.
    pub fn reward_per_token(&self, now: u64) -> Result<U256, PoolError> {
        let state = self.state.lock();
        state.schedule.reward_per_token(&state.total_staked, now)
    }

    /// Rewards an account could claim right now.
    pub fn earned(&self, account: Address, now: u64) -> Result<U256, PoolError> {
        let state = self.state.lock();
        let index = state.schedule.reward_per_token(&state.total_staked, now)?;
        state.earned_at(account, index)
    }

    /// Total emission a full period pays at the current rate.
    pub fn reward_for_duration(&self) -> U256 {
        self.state.lock().schedule.reward_for_duration()
    }

    pub fn rewards_duration(&self) -> u64 {
        self.state.lock().schedule.rewards_duration
    }

    pub fn period_finish(&self) -> u64 {
        self.state.lock().schedule.period_finish
    }

    pub fn reward_rate(&self) -> U256 {
        self.state.lock().schedule.reward_rate
    }

    // ---- user operations ----

    /// Stake `amount` of the staking token for the caller's own account.
    pub fn stake(&self, account: Address, amount: U256, now: u64) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        self.stake_inner(&mut state, account, account, amount, now)
    }

    /// Stake on behalf of `recipient`, pulling funds from `caller`.
    /// Only the registered zap contract may do this.
    pub fn stake_for(
        &self,
        caller: Address,
        recipient: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        if caller.is_zero() || caller != state.zap_contract {
            return Err(PoolError::UnauthorizedStakeFor(caller));
        }
        self.stake_inner(&mut state, caller, recipient, amount, now)
    }

    fn stake_inner(
        &self,
        state: &mut PoolState,
        funder: Address,
        recipient: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), PoolError> {
        if amount.is_zero() {
            return Err(PoolError::ZeroAmount);
        }
        if state.retired {
            return Err(PoolError::PoolRetired);
        }

        let new_total = state
            .total_staked
            .checked_add(&amount)
            .ok_or(PoolError::Overflow)?;
        // Validate the funder can pay before touching balances, so a failed
        // call leaves no trace.
        let funds = self.ledger.balance_of(&self.staking_token, &funder);
        if funds < amount {
            return Err(PoolError::Ledger(
                stakehouse_token::LedgerError::InsufficientBalance {
                    token: self.staking_token,
                    holder: funder,
                    have: funds.to_string(),
                    need: amount.to_string(),
                },
            ));
        }

        state.checkpoint(Some(recipient), now)?;

        state.total_staked = new_total;
        let balance = state.balances.entry(recipient).or_insert(U256::ZERO);
        *balance = balance.saturating_add(&amount);

        self.ledger
            .transfer(self.staking_token, funder, self.address, amount)?;

        tracing::info!("pool {}: {} staked {} for {}", self.address, funder, amount, recipient);
        Ok(())
    }

    /// Withdraw staked tokens. Allowed even after retirement.
    pub fn withdraw(&self, account: Address, amount: U256, now: u64) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        if amount.is_zero() {
            return Err(PoolError::ZeroAmount);
        }

        let balance = state.balance_of(account);
        let remaining = balance
            .checked_sub(&amount)
            .ok_or_else(|| PoolError::InsufficientStake {
                have: balance.to_string(),
                need: amount.to_string(),
            })?;

        state.checkpoint(Some(account), now)?;

        state.balances.insert(account, remaining);
        state.total_staked = state.total_staked.saturating_sub(&amount);

        self.ledger
            .transfer(self.staking_token, self.address, account, amount)?;

        tracing::info!("pool {}: {} withdrew {}", self.address, account, amount);
        Ok(())
    }

    /// Claim accrued rewards. Claiming with nothing accrued is a successful
    /// no-op. Returns the amount transferred.
    pub fn get_reward(&self, account: Address, now: u64) -> Result<U256, PoolError> {
        let mut state = self.state.lock();
        state.checkpoint(Some(account), now)?;

        let reward = state.rewards.get(&account).copied().unwrap_or(U256::ZERO);
        if reward.is_zero() {
            return Ok(U256::ZERO);
        }

        state.rewards.insert(account, U256::ZERO);
        self.ledger
            .transfer(self.rewards_token, self.address, account, reward)?;

        tracing::info!("pool {}: {} claimed {}", self.address, account, reward);
        Ok(reward)
    }

    /// Withdraw the full staked balance, then claim. Final state is
    /// identical to making the two calls separately in that order.
    pub fn exit(&self, account: Address, now: u64) -> Result<U256, PoolError> {
        let balance = self.balance_of(account);
        self.withdraw(account, balance, now)?;
        self.get_reward(account, now)
    }

    // ---- governance operations ----

    /// Fold `amount` of newly-funded reward into the emission rate.
    /// The reward token must already sit in the pool's custody; the rate is
    /// refused when a full period at that rate could not be paid out.
    pub fn notify_reward_amount(
        &self,
        caller: Address,
        amount: U256,
        now: u64,
    ) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state.ownership.ensure_owner(caller)?;
        // Retirement is terminal: a retired pool owes nothing and must not
        // start emitting again.
        if state.retired {
            return Err(PoolError::PoolRetired);
        }

        state.checkpoint(None, now)?;

        let rate = state.schedule.rate_after_notify(amount, now)?;

        let funded = self.ledger.balance_of(&self.rewards_token, &self.address);
        let max_rate = funded
            .checked_div(&U256::from(state.schedule.rewards_duration))
            .ok_or(PoolError::ZeroDuration)?;
        if rate > max_rate {
            return Err(PoolError::RewardTooHigh);
        }

        state.schedule.start_period(rate, now);

        tracing::info!(
            "pool {}: notified {} reward, rate {} until {}",
            self.address,
            amount,
            rate,
            state.schedule.period_finish
        );
        Ok(())
    }

    /// Change the funding period length. Only between periods.
    pub fn set_rewards_duration(
        &self,
        caller: Address,
        duration: u64,
        now: u64,
    ) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state.ownership.ensure_owner(caller)?;
        if duration == 0 {
            return Err(PoolError::ZeroDuration);
        }
        if now < state.schedule.period_finish {
            return Err(PoolError::PeriodActive {
                period_finish: state.schedule.period_finish,
            });
        }
        state.schedule.rewards_duration = duration;
        tracing::info!("pool {}: rewards duration set to {}s", self.address, duration);
        Ok(())
    }

    /// Point the pool at a new zap contract.
    pub fn set_zap_contract(&self, caller: Address, zap: Address) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state.ownership.ensure_owner(caller)?;
        if zap.is_zero() {
            return Err(PoolError::ZeroAddress);
        }
        state.zap_contract = zap;
        tracing::info!("pool {}: zap contract set to {}", self.address, zap);
        Ok(())
    }

    /// Sweep tokens out of the pool to the owner.
    ///
    /// The staking token is never sweepable. Sweeping the reward token is
    /// the decommissioning path: it waits out the post-period cooldown,
    /// ignores `amount` and drains the entire reward balance, zeroes the
    /// schedule, and retires the pool irreversibly. Any other token moves
    /// `amount` as asked.
    pub fn recover_token(
        &self,
        caller: Address,
        token: Address,
        amount: U256,
        now: u64,
    ) -> Result<U256, PoolError> {
        let mut state = self.state.lock();
        state.ownership.ensure_owner(caller)?;

        if token == self.staking_token {
            return Err(PoolError::StakingTokenProtected);
        }

        state.checkpoint(None, now)?;

        if token == self.rewards_token {
            let available_at = state
                .schedule
                .period_finish
                .saturating_add(SWEEP_COOLDOWN);
            if now < available_at {
                return Err(PoolError::SweepCooldownActive { available_at });
            }

            let swept = self.ledger.balance_of(&self.rewards_token, &self.address);
            state.schedule.reset();
            state.retired = true;

            self.ledger
                .transfer(self.rewards_token, self.address, state.ownership.owner(), swept)?;

            tracing::warn!("pool {}: retired, swept {} reward tokens", self.address, swept);
            return Ok(swept);
        }

        self.ledger
            .transfer(token, self.address, state.ownership.owner(), amount)?;
        tracing::info!("pool {}: recovered {} of {}", self.address, amount, token);
        Ok(amount)
    }

    /// Propose a new owner; takes effect only on `accept_ownership`.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state.ownership.transfer(caller, new_owner)?;
        Ok(())
    }

    /// Claim proposed ownership.
    pub fn accept_ownership(&self, caller: Address) -> Result<(), PoolError> {
        let mut state = self.state.lock();
        state.ownership.accept(caller)?;
        tracing::info!("pool {}: ownership accepted by {}", self.address, caller);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::UNIT
    }

    struct Harness {
        ledger: TokenLedger,
        pool: StakingPool,
        gov: Address,
        zap: Address,
        staking: Address,
        rewards: Address,
    }

    fn setup() -> Harness {
        let ledger = TokenLedger::new();
        let staking = addr(1);
        let rewards = addr(2);
        let gov = addr(3);
        let zap = addr(4);
        ledger.register_token(staking, "yvDAI", 18).unwrap();
        ledger.register_token(rewards, "OP", 18).unwrap();

        let pool = StakingPool::new(
            PoolConfig {
                address: addr(5),
                owner: gov,
                rewards_token: rewards,
                staking_token: staking,
                zap_contract: zap,
            },
            ledger.clone(),
        )
        .unwrap();

        Harness {
            ledger,
            pool,
            gov,
            zap,
            staking,
            rewards,
        }
    }

    fn fund_rewards(h: &Harness, amount: U256) {
        h.ledger.mint(h.rewards, h.pool.address(), amount).unwrap();
    }

    fn give_stake(h: &Harness, who: Address, amount: U256) {
        h.ledger.mint(h.staking, who, amount).unwrap();
    }

    #[test]
    fn test_constructor_validation() {
        let ledger = TokenLedger::new();
        let config = PoolConfig {
            address: addr(5),
            owner: addr(3),
            rewards_token: addr(1),
            staking_token: addr(1),
            zap_contract: Address::ZERO,
        };
        assert_eq!(
            StakingPool::new(config.clone(), ledger.clone()).unwrap_err(),
            PoolError::SameToken
        );

        let mut config = config;
        config.rewards_token = addr(2);
        config.owner = Address::ZERO;
        assert_eq!(
            StakingPool::new(config, ledger).unwrap_err(),
            PoolError::ZeroAddress
        );
    }

    #[test]
    fn test_stake_zero_fails() {
        let h = setup();
        assert_eq!(
            h.pool.stake(addr(10), U256::ZERO, 0).unwrap_err(),
            PoolError::ZeroAmount
        );
    }

    #[test]
    fn test_stake_and_withdraw_move_custody() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, user, units(100));

        h.pool.stake(user, units(100), 0).unwrap();
        assert_eq!(h.pool.balance_of(user), units(100));
        assert_eq!(h.pool.total_supply(), units(100));
        assert_eq!(h.ledger.balance_of(&h.staking, &h.pool.address()), units(100));
        assert_eq!(h.ledger.balance_of(&h.staking, &user), U256::ZERO);

        h.pool.withdraw(user, units(40), 10).unwrap();
        assert_eq!(h.pool.balance_of(user), units(60));
        assert_eq!(h.ledger.balance_of(&h.staking, &user), units(40));
    }

    #[test]
    fn test_stake_without_funds_has_no_effect() {
        let h = setup();
        let user = addr(10);
        let err = h.pool.stake(user, units(1), 0).unwrap_err();
        assert!(matches!(err, PoolError::Ledger(_)));
        assert_eq!(h.pool.balance_of(user), U256::ZERO);
        assert_eq!(h.pool.total_supply(), U256::ZERO);
    }

    #[test]
    fn test_withdraw_more_than_staked_fails() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, user, units(10));
        h.pool.stake(user, units(10), 0).unwrap();

        let err = h.pool.withdraw(user, units(11), 0).unwrap_err();
        assert!(matches!(err, PoolError::InsufficientStake { .. }));
        assert_eq!(h.pool.withdraw(user, U256::ZERO, 0), Err(PoolError::ZeroAmount));
    }

    #[test]
    fn test_stake_for_requires_zap() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, h.gov, units(10));

        // Even governance cannot stake for a third party
        assert_eq!(
            h.pool.stake_for(h.gov, user, units(10), 0).unwrap_err(),
            PoolError::UnauthorizedStakeFor(h.gov)
        );

        give_stake(&h, h.zap, units(10));
        h.pool.stake_for(h.zap, user, units(10), 0).unwrap();
        assert_eq!(h.pool.balance_of(user), units(10));
        assert_eq!(h.pool.balance_of(h.zap), U256::ZERO);
    }

    #[test]
    fn test_notify_requires_owner_and_funding() {
        let h = setup();
        assert!(matches!(
            h.pool.notify_reward_amount(addr(10), units(100), 0),
            Err(PoolError::Ownership(_))
        ));

        // Unfunded notify trips the sufficiency check
        assert_eq!(
            h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap_err(),
            PoolError::RewardTooHigh
        );

        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();
        assert_eq!(
            h.pool.reward_rate(),
            units(100) / U256::from(DEFAULT_REWARDS_DURATION)
        );
        assert_eq!(h.pool.period_finish(), DEFAULT_REWARDS_DURATION);
        assert!(h.pool.reward_for_duration() > U256::ZERO);
    }

    #[test]
    fn test_single_staker_earns_full_emission() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, user, units(100));
        h.pool.stake(user, units(100), 0).unwrap();

        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();
        let rate = h.pool.reward_rate();

        // Sole staker: earned after one day is exactly rate * elapsed
        // (the truncation cancels because balance == total staked).
        let earned = h.pool.earned(user, DAY).unwrap();
        assert_eq!(earned, rate * U256::from(DAY));

        let claimed = h.pool.get_reward(user, DAY).unwrap();
        assert_eq!(claimed, earned);
        assert_eq!(h.ledger.balance_of(&h.rewards, &user), earned);
        assert_eq!(h.pool.rewards_of(user), U256::ZERO);
    }

    #[test]
    fn test_claim_twice_transfers_zero() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, user, units(100));
        h.pool.stake(user, units(100), 0).unwrap();
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        let first = h.pool.get_reward(user, DAY).unwrap();
        assert!(first > U256::ZERO);
        // Same instant, no new accrual: a no-op, not an error
        assert_eq!(h.pool.get_reward(user, DAY).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_two_equal_stakers_earn_equally() {
        let h = setup();
        let (a, b) = (addr(10), addr(11));
        for user in [a, b] {
            give_stake(&h, user, units(50));
            h.pool.stake(user, units(50), 0).unwrap();
        }
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        for t in [1, 1_000, DAY, 3 * DAY, 10 * DAY] {
            assert_eq!(
                h.pool.earned(a, t).unwrap(),
                h.pool.earned(b, t).unwrap(),
                "diverged at t={t}"
            );
        }
    }

    #[test]
    fn test_exit_equals_withdraw_plus_claim() {
        let h = setup();
        let user = addr(10);
        give_stake(&h, user, units(100));
        h.pool.stake(user, units(100), 0).unwrap();
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        let expected = h.pool.earned(user, DAY).unwrap();
        let claimed = h.pool.exit(user, DAY).unwrap();
        assert_eq!(claimed, expected);
        assert_eq!(h.pool.balance_of(user), U256::ZERO);
        assert_eq!(h.ledger.balance_of(&h.staking, &user), units(100));
        assert_eq!(h.ledger.balance_of(&h.rewards, &user), expected);

        // Exit with nothing staked fails like a bare withdraw would
        assert_eq!(h.pool.exit(user, DAY).unwrap_err(), PoolError::ZeroAmount);
    }

    #[test]
    fn test_set_rewards_duration_guards() {
        let h = setup();
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        assert!(matches!(
            h.pool.set_rewards_duration(h.gov, DAY, DAY),
            Err(PoolError::PeriodActive { .. })
        ));
        assert_eq!(
            h.pool.set_rewards_duration(h.gov, 0, DEFAULT_REWARDS_DURATION),
            Err(PoolError::ZeroDuration)
        );

        h.pool
            .set_rewards_duration(h.gov, 14 * DAY, DEFAULT_REWARDS_DURATION)
            .unwrap();
        assert_eq!(h.pool.rewards_duration(), 14 * DAY);
    }

    #[test]
    fn test_set_zap_contract() {
        let h = setup();
        assert_eq!(
            h.pool.set_zap_contract(h.gov, Address::ZERO),
            Err(PoolError::ZeroAddress)
        );
        h.pool.set_zap_contract(h.gov, addr(9)).unwrap();
        assert_eq!(h.pool.zap_contract(), addr(9));
    }

    #[test]
    fn test_recover_other_token() {
        let h = setup();
        let stray = addr(7);
        h.ledger.register_token(stray, "DAI", 18).unwrap();
        h.ledger.mint(stray, h.pool.address(), units(100)).unwrap();

        h.pool.recover_token(h.gov, stray, units(100), 0).unwrap();
        assert_eq!(h.ledger.balance_of(&stray, &h.gov), units(100));
        assert_eq!(h.ledger.balance_of(&stray, &h.pool.address()), U256::ZERO);
        assert!(!h.pool.is_retired());
    }

    #[test]
    fn test_retired_pool_refuses_new_funding() {
        let h = setup();
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        let sweep_time = DEFAULT_REWARDS_DURATION + SWEEP_COOLDOWN;
        h.pool
            .recover_token(h.gov, h.rewards, U256::ZERO, sweep_time)
            .unwrap();
        assert!(h.pool.is_retired());

        // Fresh funding would emit to nobody: refused outright
        fund_rewards(&h, units(100));
        assert_eq!(
            h.pool
                .notify_reward_amount(h.gov, units(100), sweep_time)
                .unwrap_err(),
            PoolError::PoolRetired
        );
        assert_eq!(h.pool.reward_rate(), U256::ZERO);
        assert_eq!(h.pool.period_finish(), 0);
    }

    #[test]
    fn test_recover_staking_token_refused() {
        let h = setup();
        assert_eq!(
            h.pool
                .recover_token(h.gov, h.staking, units(1), 0)
                .unwrap_err(),
            PoolError::StakingTokenProtected
        );
    }

    #[test]
    fn test_ownership_two_step() {
        let h = setup();
        let next = addr(8);
        h.pool.transfer_ownership(h.gov, next).unwrap();
        assert_eq!(h.pool.owner(), h.gov);

        // Old owner still governs until acceptance
        fund_rewards(&h, units(100));
        h.pool.notify_reward_amount(h.gov, units(100), 0).unwrap();

        h.pool.accept_ownership(next).unwrap();
        assert_eq!(h.pool.owner(), next);
        assert!(matches!(
            h.pool.set_zap_contract(h.gov, addr(9)),
            Err(PoolError::Ownership(_))
        ));
    }
}
