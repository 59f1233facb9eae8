//! Reward distribution to ballot winners.

use std::collections::BTreeMap;

use oracle_store::distribution::DISTRIBUTION_MODULE;
use oracle_types::params::MODULE_NAME;
use oracle_types::{Claim, Coin, ValAddress};

use crate::error::OracleError;
use crate::keeper::Keeper;

/// `floor(balance * weight / total)` without overflowing for `weight <= total`.
fn pro_rata(balance: u128, weight: u128, total: u128) -> u128 {
    let whole = balance / total;
    let rest = balance % total;
    whole * weight + rest * weight / total
}

/// Pays each winning claim its weighted share of one period's slice of the escrow.
///
/// For every denom held in escrow a claim receives
/// `floor(balance * weight / total_weight / (reward_window / vote_period))`.
/// Nothing is paid when no claim carries weight. Returns the total paid out.
pub fn reward_ballot_winners(
    keeper: &Keeper,
    vote_period: u64,
    reward_distribution_window: u64,
    claims: &BTreeMap<ValAddress, Claim>,
) -> Result<Vec<Coin>, OracleError> {
    let total_weight: i64 = claims.values().map(|c| c.weight.max(0)).sum();
    if total_weight == 0 {
        return Ok(Vec::new());
    }
    let periods = if vote_period == 0 {
        0
    } else {
        reward_distribution_window / vote_period
    };
    if periods == 0 {
        return Ok(Vec::new());
    }

    let pool = keeper.bank().module_balances(MODULE_NAME);
    let total_weight = total_weight as u128;

    let mut distributed: BTreeMap<String, u128> = BTreeMap::new();
    let mut payouts: Vec<(ValAddress, Vec<Coin>)> = Vec::new();
    for claim in claims.values().filter(|c| c.weight > 0) {
        let weight = claim.weight as u128;
        let coins: Vec<Coin> = pool
            .iter()
            .map(|coin| {
                let amount = pro_rata(coin.amount, weight, total_weight) / periods as u128;
                Coin::new(coin.denom.clone(), amount)
            })
            .filter(|coin| !coin.is_zero())
            .collect();
        if coins.is_empty() {
            continue;
        }
        for coin in &coins {
            *distributed.entry(coin.denom.clone()).or_default() += coin.amount;
        }
        payouts.push((claim.recipient, coins));
    }

    if payouts.is_empty() {
        return Ok(Vec::new());
    }

    let total: Vec<Coin> = distributed
        .into_iter()
        .map(|(denom, amount)| Coin::new(denom, amount))
        .collect();
    keeper
        .bank()
        .send_coins_from_module_to_module(MODULE_NAME, DISTRIBUTION_MODULE, &total)?;
    for (validator, coins) in &payouts {
        keeper
            .distribution()
            .allocate_tokens_to_validator(validator, coins);
    }

    tracing::debug!(winners = payouts.len(), "oracle rewards distributed");
    Ok(total)
}
