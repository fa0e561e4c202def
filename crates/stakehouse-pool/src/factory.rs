//! Pool deployment.
//!
//! Two paths: a direct deploy with ownership effective immediately, and a
//! clone of an existing pool's shape. A clone starts governed by its
//! deployer with the requested owner pending, so the handoff is explicit.
//! Clones cannot be cloned again — every clone traces back to a directly
//! deployed template.

use std::sync::Arc;

use stakehouse_token::TokenLedger;
use stakehouse_types::Address;

use crate::error::PoolError;
use crate::pool::{PoolConfig, StakingPool};

/// Deploys staking pools against a shared ledger.
#[derive(Clone)]
pub struct PoolFactory {
    ledger: TokenLedger,
}

impl PoolFactory {
    pub fn new(ledger: TokenLedger) -> Self {
        Self { ledger }
    }

    /// Deploy a pool. The configured owner governs immediately.
    pub fn deploy(&self, config: PoolConfig) -> Result<Arc<StakingPool>, PoolError> {
        let pool = StakingPool::new(config, self.ledger.clone())?;
        tracing::info!(
            "deployed pool {} (staking {}, rewards {})",
            pool.address(),
            pool.staking_token(),
            pool.rewards_token()
        );
        Ok(Arc::new(pool))
    }

    /// Deploy a pool with `template`'s shape. `caller` governs the clone
    /// until `config.owner` accepts ownership.
    pub fn clone_pool(
        &self,
        template: &StakingPool,
        caller: Address,
        config: PoolConfig,
    ) -> Result<Arc<StakingPool>, PoolError> {
        if template.is_cloned() {
            return Err(PoolError::CloneOfClone);
        }
        if caller.is_zero() {
            return Err(PoolError::ZeroAddress);
        }

        let pool = StakingPool::build(config, self.ledger.clone(), Some(caller))?;

        tracing::info!(
            "cloned pool {} from {} (deployer {})",
            pool.address(),
            template.address(),
            caller
        );
        Ok(Arc::new(pool))
    }
}
