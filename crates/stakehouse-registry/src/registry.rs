//! The staking pool registry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use stakehouse_pool::{Ownership, StakingPool};
use stakehouse_types::Address;

use crate::error::RegistryError;

struct RegistryInner {
    /// Endorsed pool for each staking token
    pools: HashMap<Address, Arc<StakingPool>>,
    /// Every staking token ever listed, in listing order. Append-only:
    /// replacing a pool keeps the token's slot.
    tokens: Vec<Address>,
    /// Pools currently carrying the registry's endorsement
    endorsed: HashSet<Address>,
    /// Addresses allowed to list pools
    pool_endorsers: HashSet<Address>,
    /// Pool owners whose pools are eligible for listing
    approved_pool_owners: HashSet<Address>,
    ownership: Ownership,
}

/// Directory of endorsed staking pools, one per staking token.
pub struct StakingPoolRegistry {
    inner: RwLock<RegistryInner>,
}

impl StakingPoolRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                pools: HashMap::new(),
                tokens: Vec::new(),
                endorsed: HashSet::new(),
                pool_endorsers: HashSet::new(),
                approved_pool_owners: HashSet::new(),
                ownership: Ownership::new(owner),
            }),
        }
    }

    /// List `pool` as the endorsed pool for `token`.
    ///
    /// With `replace` unset the token must be new; with it set the token
    /// must already be listed, and the outgoing pool loses its
    /// endorsement. Either way the pool must stake exactly `token`, its
    /// owner must be approved, and it must not already be endorsed.
    pub fn add_staking_pool(
        &self,
        caller: Address,
        pool: Arc<StakingPool>,
        token: Address,
        replace: bool,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();

        // The owner may always list; everyone else needs the endorser bit
        if caller != inner.ownership.owner() && !inner.pool_endorsers.contains(&caller) {
            return Err(RegistryError::NotEndorser(caller));
        }
        let pool_owner = pool.owner();
        if !inner.approved_pool_owners.contains(&pool_owner) {
            return Err(RegistryError::PoolOwnerNotApproved(pool_owner));
        }
        if pool.staking_token() != token {
            return Err(RegistryError::TokenMismatch {
                expected: token,
                found: pool.staking_token(),
            });
        }
        if inner.endorsed.contains(&pool.address()) {
            return Err(RegistryError::PoolAlreadyEndorsed(pool.address()));
        }

        let existing = inner.pools.get(&token).map(|p| p.address());
        match (replace, existing) {
            (false, Some(_)) => return Err(RegistryError::AlreadyRegistered(token)),
            (true, None) => return Err(RegistryError::ReplacementMissing(token)),
            (true, Some(old)) => {
                inner.endorsed.remove(&old);
            }
            (false, None) => {
                inner.tokens.push(token);
            }
        }

        inner.endorsed.insert(pool.address());
        tracing::info!(
            "registry: endorsed pool {} for token {} (replace: {})",
            pool.address(),
            token,
            replace
        );
        inner.pools.insert(token, pool);
        Ok(())
    }

    /// Grant or revoke the right to list pools. Owner only.
    pub fn set_pool_endorser(
        &self,
        caller: Address,
        endorser: Address,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        inner.ownership.ensure_owner(caller)?;
        if endorser.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        if allowed {
            inner.pool_endorsers.insert(endorser);
        } else {
            inner.pool_endorsers.remove(&endorser);
        }
        tracing::info!("registry: endorser {} set to {}", endorser, allowed);
        Ok(())
    }

    /// Approve or revoke a pool owner. Owner only.
    pub fn set_approved_pool_owner(
        &self,
        caller: Address,
        pool_owner: Address,
        allowed: bool,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        inner.ownership.ensure_owner(caller)?;
        if pool_owner.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        if allowed {
            inner.approved_pool_owners.insert(pool_owner);
        } else {
            inner.approved_pool_owners.remove(&pool_owner);
        }
        tracing::info!("registry: pool owner {} set to {}", pool_owner, allowed);
        Ok(())
    }

    // ---- views ----

    /// Endorsed pool for `token`, if any.
    pub fn staking_pool(&self, token: Address) -> Option<Arc<StakingPool>> {
        self.inner.read().pools.get(&token).cloned()
    }

    pub fn is_registered(&self, token: Address) -> bool {
        self.inner.read().pools.contains_key(&token)
    }

    pub fn is_pool_endorsed(&self, pool: Address) -> bool {
        self.inner.read().endorsed.contains(&pool)
    }

    pub fn is_pool_endorser(&self, account: Address) -> bool {
        self.inner.read().pool_endorsers.contains(&account)
    }

    pub fn is_approved_pool_owner(&self, account: Address) -> bool {
        self.inner.read().approved_pool_owners.contains(&account)
    }

    /// Number of tokens ever listed.
    pub fn num_tokens(&self) -> usize {
        self.inner.read().tokens.len()
    }

    /// Token at listing position `index`.
    pub fn token_at(&self, index: usize) -> Option<Address> {
        self.inner.read().tokens.get(index).copied()
    }

    pub fn owner(&self) -> Address {
        self.inner.read().ownership.owner()
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.inner.read().ownership.pending_owner()
    }

    pub fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        inner.ownership.transfer(caller, new_owner)?;
        Ok(())
    }

    pub fn accept_ownership(&self, caller: Address) -> Result<(), RegistryError> {
        let mut inner = self.inner.write();
        inner.ownership.accept(caller)?;
        tracing::info!("registry: ownership accepted by {}", caller);
        Ok(())
    }
}
