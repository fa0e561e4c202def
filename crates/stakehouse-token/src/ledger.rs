//! Fungible balance ledger.
//!
//! One shared ledger tracks every token in the system, keyed by
//! (token, holder). Pools, vaults, and zaps all hold a clone of the same
//! handle; custody moves only through `transfer`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use stakehouse_types::{Address, U256};

use crate::error::LedgerError;

/// Metadata for a registered token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Ticker symbol, for logs only
    pub symbol: String,
    /// Decimal places of the smallest unit
    pub decimals: u8,
    /// Total minted supply
    pub total_supply: U256,
}

#[derive(Debug, Default)]
struct LedgerInner {
    tokens: HashMap<Address, TokenInfo>,
    balances: HashMap<(Address, Address), U256>,
}

/// Shared handle to the balance ledger.
///
/// Cloning is cheap; all clones view the same state.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

impl TokenLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LedgerInner::default())),
        }
    }

    /// Register a new token identity.
    pub fn register_token(
        &self,
        token: Address,
        symbol: &str,
        decimals: u8,
    ) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        if inner.tokens.contains_key(&token) {
            return Err(LedgerError::TokenAlreadyRegistered(token));
        }
        inner.tokens.insert(
            token,
            TokenInfo {
                symbol: symbol.to_string(),
                decimals,
                total_supply: U256::ZERO,
            },
        );
        tracing::debug!("registered token {} ({})", token, symbol);
        Ok(())
    }

    /// Check whether a token identity is known.
    pub fn is_registered(&self, token: &Address) -> bool {
        self.inner.read().tokens.contains_key(token)
    }

    /// Get a holder's balance. Zero for unknown tokens or holders.
    pub fn balance_of(&self, token: &Address, holder: &Address) -> U256 {
        self.inner
            .read()
            .balances
            .get(&(*token, *holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Get a token's total minted supply.
    pub fn total_supply(&self, token: &Address) -> U256 {
        self.inner
            .read()
            .tokens
            .get(token)
            .map(|t| t.total_supply)
            .unwrap_or(U256::ZERO)
    }

    /// Get a token's decimal places.
    pub fn decimals(&self, token: &Address) -> Result<u8, LedgerError> {
        self.inner
            .read()
            .tokens
            .get(token)
            .map(|t| t.decimals)
            .ok_or(LedgerError::UnknownToken(*token))
    }

    /// Mint new units to a holder.
    pub fn mint(&self, token: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        let info = inner
            .tokens
            .get_mut(&token)
            .ok_or(LedgerError::UnknownToken(token))?;
        info.total_supply = info
            .total_supply
            .checked_add(&amount)
            .ok_or(LedgerError::SupplyOverflow(token))?;

        let balance = inner.balances.entry((token, to)).or_insert(U256::ZERO);
        // Cannot overflow: balance <= total_supply, which was just checked.
        *balance = balance.saturating_add(&amount);
        Ok(())
    }

    /// Burn units held by a holder.
    pub fn burn(&self, token: Address, from: Address, amount: U256) -> Result<(), LedgerError> {
        let mut inner = self.inner.write();
        let balance = inner
            .balances
            .get(&(token, from))
            .copied()
            .unwrap_or(U256::ZERO);
        let remaining = balance
            .checked_sub(&amount)
            .ok_or_else(|| LedgerError::InsufficientBalance {
                token,
                holder: from,
                have: balance.to_string(),
                need: amount.to_string(),
            })?;

        let info = inner
            .tokens
            .get_mut(&token)
            .ok_or(LedgerError::UnknownToken(token))?;
        info.total_supply = info.total_supply.saturating_sub(&amount);
        inner.balances.insert((token, from), remaining);
        Ok(())
    }

    /// Move units between holders. Zero-amount transfers succeed as no-ops.
    pub fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        let mut inner = self.inner.write();
        if !inner.tokens.contains_key(&token) {
            return Err(LedgerError::UnknownToken(token));
        }

        let from_balance = inner
            .balances
            .get(&(token, from))
            .copied()
            .unwrap_or(U256::ZERO);
        let remaining = from_balance.checked_sub(&amount).ok_or_else(|| {
            LedgerError::InsufficientBalance {
                token,
                holder: from,
                have: from_balance.to_string(),
                need: amount.to_string(),
            }
        })?;

        inner.balances.insert((token, from), remaining);
        let to_balance = inner.balances.entry((token, to)).or_insert(U256::ZERO);
        *to_balance = to_balance.saturating_add(&amount);
        Ok(())
    }
}

impl Default for TokenLedger {
    fn default() -> Self {
        Self::new()
    }
}
