use thiserror::Error;

/// Errors that can occur when constructing or parsing core types.
///
/// No `Eq`: `hex::FromHexError` is only `PartialEq`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid U256 string: {0}")]
    InvalidU256String(String),

    #[error("U256 overflow")]
    U256Overflow,

    #[error("Hex decode error: {0}")]
    HexError(#[from] hex::FromHexError),
}
