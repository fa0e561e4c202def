//! Stakehouse Types - Core type definitions for the STAKEHOUSE reward engine.
//!
//! This crate provides the fundamental types used throughout the workspace:
//! - Addresses (20-byte, hex encoded)
//! - U256 (256-bit unsigned integer for token amounts)

pub mod address;
pub mod u256;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use u256::U256;
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, TypesError, U256};
}
