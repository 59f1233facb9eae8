use oracle_store::{BankError, StoreError};
use oracle_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error("bank error: {0}")]
    Bank(#[from] BankError),

    #[error("unknown denom: {0}")]
    UnknownDenom(String),

    #[error("no prevote found for {0}")]
    NoPrevote(String),

    #[error("no vote found for {0}")]
    NoVote(String),

    #[error("feeder {feeder} is not allowed to vote for {validator}")]
    NoVotingPermission { feeder: String, validator: String },

    #[error("validator {0} is not in the active set")]
    ValidatorNotActive(String),

    #[error("validator {0} does not exist")]
    ValidatorNotFound(String),

    #[error("reveal period of submitted vote does not match the prevote: submitted at {submit_block}, revealed at {height}")]
    RevealPeriodMismatch { submit_block: u64, height: u64 },

    #[error("revealed values do not match the prevote hash: expected {expected}, got {actual}")]
    VerificationFailed { expected: String, actual: String },

    #[error("salt length must be 1 to 4 bytes, is {0}")]
    InvalidSaltLength(usize),

    #[error("exchange rates string is {0} bytes, limit is 4096")]
    ExchangeRatesTooLong(usize),

    #[error("{0} address must not be empty")]
    EmptyAddress(&'static str),

    #[error("ballot for {0} has zero total power")]
    ZeroBallotPower(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
}
