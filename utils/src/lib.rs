//! Shared utilities for the price oracle.

pub mod stats;

pub use stats::{OracleStat, StatsCounter, StatsSnapshot};
