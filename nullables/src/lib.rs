//! Nullable infrastructure for deterministic testing.
//!
//! The oracle reaches storage and the staking, bank and distribution modules
//! only through the traits in `oracle-store`. This crate provides test-friendly
//! implementations that:
//! - Keep all state in memory, in deterministic order
//! - Can be controlled and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;
pub mod distribution;
pub mod staking;
pub mod store;

pub use bank::NullBank;
pub use distribution::NullDistribution;
pub use staking::{NullStaking, SlashRecord};
pub use store::NullKvStore;
