//! Conversion vault: base asset in, shares out.
//!
//! Models the external exchange the zap routes through. The vault's share
//! token is registered in the ledger under the vault's own address; share
//! price floats with the ratio of held assets to minted shares, so a donation
//! of base asset raises the price without minting.
//!
//! A deposit limit caps total held assets. Deposits past the limit are
//! *partially* accepted (the capacity remainder) rather than rejected, which
//! is exactly the behavior callers staking "what they asked for" instead of
//! "what they got" are burned by.

use parking_lot::RwLock;
use stakehouse_types::{Address, U256};

use crate::error::VaultError;
use crate::ledger::TokenLedger;

/// A single-asset vault with share-price semantics.
pub struct Vault {
    address: Address,
    base_token: Address,
    ledger: TokenLedger,
    deposit_limit: RwLock<U256>,
}

impl Vault {
    /// Create a vault for `base_token`, registering its share token in the
    /// ledger under `address`. Share decimals mirror the base token.
    pub fn new(
        address: Address,
        base_token: Address,
        symbol: &str,
        ledger: TokenLedger,
    ) -> Result<Self, VaultError> {
        let decimals = ledger.decimals(&base_token)?;
        ledger.register_token(address, symbol, decimals)?;
        Ok(Self {
            address,
            base_token,
            ledger,
            deposit_limit: RwLock::new(U256::MAX),
        })
    }

    /// The vault's address, which is also its share token identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The asset this vault wraps.
    pub fn base_token(&self) -> Address {
        self.base_token
    }

    /// Base asset currently held by the vault.
    pub fn total_assets(&self) -> U256 {
        self.ledger.balance_of(&self.base_token, &self.address)
    }

    /// Shares currently minted.
    pub fn total_shares(&self) -> U256 {
        self.ledger.total_supply(&self.address)
    }

    /// Current maximum total assets.
    pub fn deposit_limit(&self) -> U256 {
        *self.deposit_limit.read()
    }

    pub fn set_deposit_limit(&self, limit: U256) {
        *self.deposit_limit.write() = limit;
    }

    /// Base asset the vault can still accept before hitting its limit.
    pub fn available_capacity(&self) -> U256 {
        self.deposit_limit().saturating_sub(&self.total_assets())
    }

    /// Base units one whole share is worth, scaled by `U256::UNIT`.
    pub fn price_per_share(&self) -> U256 {
        let shares = self.total_shares();
        if shares.is_zero() {
            return U256::UNIT;
        }
        self.total_assets()
            .checked_mul(&U256::UNIT)
            .and_then(|scaled| scaled.checked_div(&shares))
            .unwrap_or(U256::ZERO)
    }

    /// Shares a deposit of `amount` would mint right now, after the deposit
    /// limit truncates it. No state change.
    pub fn preview_deposit(&self, amount: U256) -> Result<U256, VaultError> {
        let accepted = amount.min(self.available_capacity());
        if accepted.is_zero() {
            return Ok(U256::ZERO);
        }
        let shares_before = self.total_shares();
        if shares_before.is_zero() {
            return Ok(accepted);
        }
        accepted
            .checked_mul(&shares_before)
            .and_then(|n| n.checked_div(&self.total_assets()))
            .ok_or(VaultError::ShareOverflow)
    }

    /// Deposit up to `amount` base asset from `from`, minting shares at the
    /// current price. Accepts only the remaining capacity when the deposit
    /// limit is binding. Returns the shares actually minted.
    pub fn deposit(&self, from: Address, amount: U256) -> Result<U256, VaultError> {
        let accepted = amount.min(self.available_capacity());
        if accepted.is_zero() {
            return Ok(U256::ZERO);
        }

        let shares = self.preview_deposit(accepted)?;

        self.ledger
            .transfer(self.base_token, from, self.address, accepted)?;
        self.ledger.mint(self.address, from, shares)?;

        tracing::debug!(
            "vault {} accepted {} of {} base units, minted {} shares",
            self.address,
            accepted,
            amount,
            shares
        );
        Ok(shares)
    }

    /// Redeem all of `from`'s shares for a pro-rata slice of held assets.
    /// Returns the base asset paid out.
    pub fn withdraw(&self, from: Address) -> Result<U256, VaultError> {
        let shares = self.ledger.balance_of(&self.address, &from);
        let total_shares = self.total_shares();
        if shares.is_zero() || total_shares.is_zero() {
            return Ok(U256::ZERO);
        }

        let payout = shares
            .checked_mul(&self.total_assets())
            .and_then(|n| n.checked_div(&total_shares))
            .ok_or(VaultError::ShareOverflow)?;

        self.ledger.burn(self.address, from, shares)?;
        self.ledger
            .transfer(self.base_token, self.address, from, payout)?;
        Ok(payout)
    }
}
