//! Keeper wired to nullable collaborators.

use std::sync::Arc;

use oracle_nullables::{NullBank, NullDistribution, NullKvStore, NullStaking};
use oracle_types::{Dec, ExchangeRateTuple, ExchangeRateVote, Params, ValAddress};

use crate::keeper::Keeper;

pub fn val(b: u8) -> ValAddress {
    ValAddress::new([b; 20])
}

pub struct TestInput {
    pub keeper: Keeper,
    pub store: Arc<NullKvStore>,
    pub staking: Arc<NullStaking>,
    pub bank: Arc<NullBank>,
    pub distribution: Arc<NullDistribution>,
}

impl TestInput {
    pub fn new() -> Self {
        Self::with_staking(NullStaking::new())
    }

    pub fn with_staking(staking: NullStaking) -> Self {
        let store = Arc::new(NullKvStore::new());
        let staking = Arc::new(staking);
        let bank = Arc::new(NullBank::new());
        let distribution = Arc::new(NullDistribution::new());
        let keeper = Keeper::new(
            store.clone(),
            staking.clone(),
            bank.clone(),
            distribution.clone(),
        );
        Self {
            keeper,
            store,
            staking,
            bank,
            distribution,
        }
    }

    /// Keeper with `params` stored and the whitelist installed as vote targets.
    pub fn with_params(params: Params) -> Self {
        let input = Self::new();
        for denom in &params.whitelist {
            input
                .keeper
                .set_vote_target(&denom.name)
                .expect("set vote target");
        }
        input.keeper.set_params(&params).expect("valid params");
        input
    }

    pub fn submit_vote(&self, voter: ValAddress, rates: &[(&str, Dec)]) {
        let tuples = rates
            .iter()
            .map(|(denom, rate)| ExchangeRateTuple::new(*denom, *rate))
            .collect();
        self.keeper
            .set_vote(&ExchangeRateVote::new(tuples, voter))
            .expect("store vote");
    }
}

pub fn dec(s: &str) -> Dec {
    s.parse().expect("valid decimal")
}
