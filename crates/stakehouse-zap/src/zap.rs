//! The zap route: base asset -> vault shares -> staked position.

use std::sync::Arc;

use stakehouse_pool::PoolError;
use stakehouse_registry::StakingPoolRegistry;
use stakehouse_token::{TokenLedger, Vault};
use stakehouse_types::{Address, U256};

use crate::error::ZapError;

/// Converts and stakes in one call. Stateless between calls: every asset
/// that enters leaves again within the same operation.
pub struct StakingZap {
    address: Address,
    ledger: TokenLedger,
    registry: Arc<StakingPoolRegistry>,
}

impl StakingZap {
    pub fn new(address: Address, ledger: TokenLedger, registry: Arc<StakingPoolRegistry>) -> Self {
        Self {
            address,
            ledger,
            registry,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Pull `amount` of the vault's base asset from `caller`, deposit it,
    /// and stake the minted shares in the endorsed pool under `caller`'s
    /// name. Returns the shares staked.
    ///
    /// All-or-nothing: if the vault cannot accept the full amount the call
    /// fails before any asset moves. Deposit limits silently truncate vault
    /// deposits, and staking more than was minted must never happen.
    pub fn zap_in(
        &self,
        vault: &Vault,
        caller: Address,
        amount: U256,
        now: u64,
    ) -> Result<U256, ZapError> {
        if amount.is_zero() {
            return Err(ZapError::ZeroAmount);
        }

        let pool = self
            .registry
            .staking_pool(vault.address())
            .ok_or(ZapError::PoolNotRegistered(vault.address()))?;

        // Checked up front: a stake refusal after the deposit would strand
        // the minted shares in the zap.
        if pool.is_retired() {
            return Err(ZapError::Pool(PoolError::PoolRetired));
        }

        let capacity = vault.available_capacity();
        if capacity < amount {
            return Err(ZapError::VaultCapacityExceeded {
                capacity: capacity.to_string(),
                asked: amount.to_string(),
            });
        }
        // A deposit the share price rounds to zero shares would absorb the
        // caller's asset with nothing to stake back. Refused before any
        // transfer, like the capacity check.
        if vault.preview_deposit(amount)?.is_zero() {
            return Err(ZapError::NoSharesMinted);
        }

        self.ledger
            .transfer(vault.base_token(), caller, self.address, amount)?;

        // Stake what the vault actually minted, not what was asked: share
        // price moves between calls.
        let shares = vault.deposit(self.address, amount)?;
        if shares.is_zero() {
            return Err(ZapError::NoSharesMinted);
        }

        pool.stake_for(self.address, caller, shares, now)?;

        tracing::info!(
            "zap: {} converted {} base units into {} staked shares of pool {}",
            caller,
            amount,
            shares,
            pool.address()
        );
        Ok(shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakehouse_pool::{PoolConfig, PoolError, PoolFactory};

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::UNIT
    }

    struct Env {
        ledger: TokenLedger,
        vault: Vault,
        zap: StakingZap,
        registry: Arc<StakingPoolRegistry>,
        gov: Address,
        dai: Address,
    }

    fn setup() -> Env {
        let ledger = TokenLedger::new();
        let dai = addr(1);
        let rewards = addr(2);
        let gov = addr(3);
        let zap_address = addr(4);
        ledger.register_token(dai, "DAI", 18).unwrap();
        ledger.register_token(rewards, "OP", 18).unwrap();

        let vault = Vault::new(addr(5), dai, "yvDAI", ledger.clone()).unwrap();

        let registry = Arc::new(StakingPoolRegistry::new(gov));
        registry.set_pool_endorser(gov, gov, true).unwrap();
        registry.set_approved_pool_owner(gov, gov, true).unwrap();

        let pool = PoolFactory::new(ledger.clone())
            .deploy(PoolConfig {
                address: addr(6),
                owner: gov,
                rewards_token: rewards,
                staking_token: vault.address(),
                zap_contract: zap_address,
            })
            .unwrap();
        registry
            .add_staking_pool(gov, pool, vault.address(), false)
            .unwrap();

        let zap = StakingZap::new(zap_address, ledger.clone(), registry.clone());

        Env {
            ledger,
            vault,
            zap,
            registry,
            gov,
            dai,
        }
    }

    #[test_log::test]
    fn test_zap_stakes_minted_shares() {
        let env = setup();
        let user = addr(10);
        env.ledger.mint(env.dai, user, units(100)).unwrap();

        let shares = env.zap.zap_in(&env.vault, user, units(100), 0).unwrap();
        assert_eq!(shares, units(100));

        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        assert_eq!(pool.balance_of(user), shares);

        // Zap keeps nothing
        assert_eq!(
            env.ledger.balance_of(&env.dai, &env.zap.address()),
            U256::ZERO
        );
        assert_eq!(
            env.ledger.balance_of(&env.vault.address(), &env.zap.address()),
            U256::ZERO
        );
        assert_eq!(env.ledger.balance_of(&env.dai, &user), U256::ZERO);
    }

    #[test]
    fn test_zap_adapts_to_share_price() {
        let env = setup();
        let user = addr(10);
        let whale = addr(11);
        env.ledger.mint(env.dai, user, units(100)).unwrap();
        env.ledger.mint(env.dai, whale, units(200)).unwrap();

        // Seed the vault, then double the share price with a donation
        env.vault.deposit(whale, units(100)).unwrap();
        env.ledger
            .transfer(env.dai, whale, env.vault.address(), units(100))
            .unwrap();

        // 100 DAI at 2.0 price per share: 50 shares, all of them staked
        let shares = env.zap.zap_in(&env.vault, user, units(100), 0).unwrap();
        assert_eq!(shares, units(50));
        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        assert_eq!(pool.balance_of(user), units(50));
    }

    #[test]
    fn test_zap_rejects_when_vault_is_capped() {
        let env = setup();
        let user = addr(10);
        env.ledger.mint(env.dai, user, units(100)).unwrap();
        env.vault.set_deposit_limit(units(60));

        let err = env
            .zap
            .zap_in(&env.vault, user, units(100), 0)
            .unwrap_err();
        assert!(matches!(err, ZapError::VaultCapacityExceeded { .. }));

        // Nothing moved: no partial deposit, no stake, funds intact
        assert_eq!(env.ledger.balance_of(&env.dai, &user), units(100));
        assert_eq!(env.vault.total_assets(), U256::ZERO);
        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        assert_eq!(pool.balance_of(user), U256::ZERO);

        // Under the cap the same call goes through
        env.zap.zap_in(&env.vault, user, units(60), 0).unwrap();
        assert_eq!(pool.balance_of(user), units(60));
    }

    #[test]
    fn test_zap_rejects_zero_share_deposit() {
        let env = setup();
        let user = addr(10);
        let whale = addr(11);
        env.ledger.mint(env.dai, user, units(50)).unwrap();
        env.ledger.mint(env.dai, whale, units(200)).unwrap();

        // One share-wei outstanding plus a massive donation: the share
        // price rounds a 50 DAI deposit down to zero shares.
        env.vault.deposit(whale, U256::ONE).unwrap();
        env.ledger
            .transfer(env.dai, whale, env.vault.address(), units(100))
            .unwrap();
        assert_eq!(
            env.vault.preview_deposit(units(50)).unwrap(),
            U256::ZERO
        );

        let vault_assets = env.vault.total_assets();
        assert_eq!(
            env.zap.zap_in(&env.vault, user, units(50), 0).unwrap_err(),
            ZapError::NoSharesMinted
        );

        // The caller keeps every base unit; the vault absorbed nothing
        assert_eq!(env.ledger.balance_of(&env.dai, &user), units(50));
        assert_eq!(env.vault.total_assets(), vault_assets);
        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        assert_eq!(pool.balance_of(user), U256::ZERO);
    }

    #[test]
    fn test_zap_requires_registered_pool() {
        let env = setup();
        let user = addr(10);
        let orphan = Vault::new(addr(7), env.dai, "yvDAI-2", env.ledger.clone()).unwrap();
        env.ledger.mint(env.dai, user, units(100)).unwrap();

        assert_eq!(
            env.zap.zap_in(&orphan, user, units(100), 0).unwrap_err(),
            ZapError::PoolNotRegistered(orphan.address())
        );
    }

    #[test]
    fn test_zap_rejects_retired_pool() {
        let env = setup();
        let user = addr(10);
        env.ledger.mint(env.dai, user, units(100)).unwrap();

        // Retire the pool: reward sweep after the cooldown
        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        let rewards = addr(2);
        pool.recover_token(env.gov, rewards, U256::ZERO, 90 * 86_400)
            .unwrap();
        assert!(pool.is_retired());

        assert_eq!(
            env.zap.zap_in(&env.vault, user, units(100), 0).unwrap_err(),
            ZapError::Pool(PoolError::PoolRetired)
        );
        // Funds never left the caller
        assert_eq!(env.ledger.balance_of(&env.dai, &user), units(100));
    }

    #[test]
    fn test_zap_zero_amount() {
        let env = setup();
        assert_eq!(
            env.zap.zap_in(&env.vault, addr(10), U256::ZERO, 0),
            Err(ZapError::ZeroAmount)
        );
    }

    #[test]
    fn test_zap_requires_caller_funds() {
        let env = setup();
        let err = env
            .zap
            .zap_in(&env.vault, addr(10), units(1), 0)
            .unwrap_err();
        assert!(matches!(err, ZapError::Ledger(_)));
    }

    #[test]
    fn test_direct_stake_for_still_gated() {
        let env = setup();
        let pool = env.registry.staking_pool(env.vault.address()).unwrap();
        // Only the zap address may stake for third parties
        assert!(matches!(
            pool.stake_for(env.gov, addr(10), units(1), 0),
            Err(PoolError::UnauthorizedStakeFor(_))
        ));
    }
}
