//! Fundamental types for the price oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! fixed-point decimals, validator/account addresses, coins, oracle parameters,
//! exchange-rate tuples and the commit/reveal vote records.

pub mod address;
pub mod claim;
pub mod coin;
pub mod dec;
pub mod denom;
pub mod error;
pub mod hash;
pub mod params;
pub mod time;
pub mod tuple;
pub mod vote;

pub use address::{AccAddress, ValAddress};
pub use claim::Claim;
pub use coin::Coin;
pub use dec::Dec;
pub use denom::validate_denom;
pub use error::TypesError;
pub use hash::VoteHash;
pub use params::{Denom, Params};
pub use tuple::{format_exchange_rate_tuples, parse_exchange_rate_tuples, ExchangeRateTuple};
pub use vote::{ExchangeRatePrevote, ExchangeRateVote};
