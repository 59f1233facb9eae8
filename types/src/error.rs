//! Validation and parsing errors for the shared oracle types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("duplicated denom {0}")]
    DuplicateDenom(String),

    #[error("invalid exchange rate notation: {0}")]
    InvalidTuple(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid vote hash: {0}")]
    InvalidHash(String),

    #[error("invalid oracle parameter: {0}")]
    InvalidParams(String),
}
