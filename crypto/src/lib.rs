//! Cryptographic primitives for the price oracle.
//!
//! - **SHA-256** for hashing
//! - Commit/reveal vote hashes: `salt:rates:validator`, truncated to 20 bytes

pub mod hash;

pub use hash::{aggregate_vote_hash, sha256, sha256_multi, verify_vote_hash};
