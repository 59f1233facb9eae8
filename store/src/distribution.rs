//! Distribution module as seen by the oracle.

use oracle_types::{Coin, ValAddress};

/// Module account that receives oracle rewards before allocation.
pub const DISTRIBUTION_MODULE: &str = "distribution";

pub trait DistributionKeeper {
    /// Credit already-transferred rewards to a validator.
    fn allocate_tokens_to_validator(&self, validator: &ValAddress, tokens: &[Coin]);
}
