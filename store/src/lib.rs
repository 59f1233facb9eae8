//! Storage and collaborator traits for the price oracle.
//!
//! The oracle keeps its state in a byte-oriented key-value store and reaches the
//! staking, bank and distribution modules through narrow traits. Every backend
//! (a chain's state tree, an in-memory map for testing) implements these traits;
//! the rest of the codebase depends only on them.

pub mod bank;
pub mod codec;
pub mod distribution;
pub mod error;
pub mod keys;
pub mod kv;
pub mod staking;

pub use bank::{BankError, BankKeeper};
pub use codec::{decode, encode};
pub use distribution::DistributionKeeper;
pub use error::StoreError;
pub use kv::KvStore;
pub use staking::{StakingKeeper, ValidatorInfo};
