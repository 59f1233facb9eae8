//! Commit and reveal records.

use crate::address::ValAddress;
use crate::hash::VoteHash;
use crate::tuple::ExchangeRateTuple;
use serde::{Deserialize, Serialize};

/// The commit half: a hash submitted one period ahead of its reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRatePrevote {
    pub hash: VoteHash,
    pub voter: ValAddress,
    pub submit_block: u64,
}

impl ExchangeRatePrevote {
    pub fn new(hash: VoteHash, voter: ValAddress, submit_block: u64) -> Self {
        Self {
            hash,
            voter,
            submit_block,
        }
    }
}

/// The reveal half: the validator's rate claims for the current period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateVote {
    pub exchange_rate_tuples: Vec<ExchangeRateTuple>,
    pub voter: ValAddress,
}

impl ExchangeRateVote {
    pub fn new(exchange_rate_tuples: Vec<ExchangeRateTuple>, voter: ValAddress) -> Self {
        Self {
            exchange_rate_tuples,
            voter,
        }
    }
}
