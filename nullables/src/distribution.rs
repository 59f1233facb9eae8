//! Nullable distribution module recording per-validator allocations.

use oracle_store::DistributionKeeper;
use oracle_types::{Coin, ValAddress};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullDistribution {
    allocations: Mutex<BTreeMap<ValAddress, BTreeMap<String, u128>>>,
}

impl NullDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total of `denom` allocated to `validator` so far.
    pub fn allocated(&self, validator: &ValAddress, denom: &str) -> u128 {
        self.allocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(validator)
            .and_then(|m| m.get(denom))
            .copied()
            .unwrap_or(0)
    }
}

impl DistributionKeeper for NullDistribution {
    fn allocate_tokens_to_validator(&self, validator: &ValAddress, tokens: &[Coin]) {
        let mut allocations = self.allocations.lock().unwrap_or_else(|e| e.into_inner());
        let entry = allocations.entry(*validator).or_default();
        for coin in tokens {
            *entry.entry(coin.denom.clone()).or_default() += coin.amount;
        }
    }
}
