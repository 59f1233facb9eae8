//! Price oracle state machine.
//!
//! Validators commit to a salted hash of their exchange-rate claims (prevote),
//! reveal them one vote period later (vote), and at the last block of each
//! period the end-blocker tallies every denomination:
//!
//! 1. Ballots are built per denomination from the revealed votes of active validators.
//! 2. Ballots below the vote threshold are dropped; the one with the most power
//!    becomes the reference denomination.
//! 3. Every other ballot is converted to cross rates against the reference and
//!    tallied around its power-weighted median.
//! 4. Validators outside the reward band accrue misses; winners share the
//!    escrowed rewards.
//!
//! At the end of every slash window validators with too many misses are slashed
//! and jailed, and all miss counters are reset.

pub mod abci;
pub mod ballot;
pub mod context;
pub mod error;
pub mod events;
pub mod keeper;
pub mod msg;
pub mod msg_server;
pub mod query;
pub mod reward;
pub mod slash;
pub mod tally;

#[cfg(test)]
pub(crate) mod test_support;

pub use abci::{end_blocker, EndBlockReport};
pub use ballot::{ExchangeRateBallot, VoteForTally};
pub use context::Context;
pub use error::OracleError;
pub use events::OracleEvent;
pub use keeper::Keeper;
pub use msg::{
    MsgAggregateExchangeRatePrevote, MsgAggregateExchangeRateVote, MsgDelegateFeedConsent,
    OracleMsg,
};
pub use msg_server::{handle_msg, MsgServer};
pub use query::{handle_query, OracleQuery, QueryResponse};
