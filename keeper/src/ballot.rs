//! Ballots: per-denomination collections of revealed rates, and the
//! store-level operations that build and prune them.

use std::collections::{BTreeMap, BTreeSet};

use oracle_types::params::Denom;
use oracle_types::{Claim, Dec, ValAddress};

use crate::error::OracleError;
use crate::keeper::Keeper;

/// One validator's rate for one denomination, weighted by its power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteForTally {
    pub exchange_rate: Dec,
    pub denom: String,
    pub voter: ValAddress,
    pub power: i64,
}

impl VoteForTally {
    pub fn new(exchange_rate: Dec, denom: impl Into<String>, voter: ValAddress, power: i64) -> Self {
        Self {
            exchange_rate,
            denom: denom.into(),
            voter,
            power,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeRateBallot {
    votes: Vec<VoteForTally>,
}

impl ExchangeRateBallot {
    pub fn new(votes: Vec<VoteForTally>) -> Self {
        Self { votes }
    }

    pub fn push(&mut self, vote: VoteForTally) {
        self.votes.push(vote);
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoteForTally> {
        self.votes.iter()
    }

    /// Total power of the ballot.
    pub fn power(&self) -> i64 {
        self.votes.iter().map(|v| v.power).sum()
    }

    /// Stable sort by ascending rate.
    pub fn sort(&mut self) {
        self.votes.sort_by(|a, b| a.exchange_rate.cmp(&b.exchange_rate));
    }

    /// Rates keyed by voter.
    pub fn to_map(&self) -> BTreeMap<ValAddress, Dec> {
        self.votes
            .iter()
            .map(|v| (v.voter, v.exchange_rate))
            .collect()
    }

    /// Re-expresses each rate against the reference denomination, keyed by voter.
    ///
    /// A voter's own abstention stays an abstention. Voters with no positive
    /// reference rate, or whose cross rate is not representable, are dropped.
    /// The result is sorted.
    pub fn to_cross_rate(&self, reference: &BTreeMap<ValAddress, Dec>) -> ExchangeRateBallot {
        let mut cross = Vec::with_capacity(self.votes.len());
        for vote in &self.votes {
            if !vote.exchange_rate.is_positive() {
                cross.push(vote.clone());
                continue;
            }
            let Some(reference_rate) = reference.get(&vote.voter).filter(|r| r.is_positive()) else {
                continue;
            };
            match reference_rate.checked_quo(vote.exchange_rate) {
                Some(rate) if rate.is_positive() => cross.push(VoteForTally::new(
                    rate,
                    vote.denom.clone(),
                    vote.voter,
                    vote.power,
                )),
                _ => tracing::debug!(
                    voter = %vote.voter,
                    denom = %vote.denom,
                    "cross rate out of range, vote dropped"
                ),
            }
        }
        let mut ballot = ExchangeRateBallot::new(cross);
        ballot.sort();
        ballot
    }

    /// Rate of the first vote at which the cumulative power reaches half the
    /// total. The ballot must be sorted. `None` when the ballot has no power.
    pub fn weighted_median(&self) -> Option<Dec> {
        let total = self.power();
        if total <= 0 {
            return None;
        }
        let mut pivot: i64 = 0;
        for vote in &self.votes {
            pivot += vote.power;
            if pivot.saturating_mul(2) >= total {
                return Some(vote.exchange_rate);
            }
        }
        None
    }

    /// [`weighted_median`](Self::weighted_median) for ballots that must carry power.
    pub fn weighted_median_with_assertion(&self) -> Result<Dec, OracleError> {
        self.weighted_median().ok_or_else(|| {
            OracleError::ZeroBallotPower(
                self.votes
                    .first()
                    .map(|v| v.denom.clone())
                    .unwrap_or_default(),
            )
        })
    }

    /// Power-weighted population standard deviation around `median`.
    pub fn standard_deviation(&self, median: Dec) -> Result<Dec, OracleError> {
        let samples = self.votes.iter().map(|v| (v.exchange_rate, v.power));
        Dec::weighted_std_dev(samples, median).ok_or(OracleError::Overflow("standard deviation"))
    }
}

/// Collects this period's revealed votes into per-denomination ballots.
///
/// Only voters present in `claims` contribute. A non-positive rate is an
/// abstention and carries no power. Each ballot is sorted by rate.
pub fn organize_ballot_by_denom(
    keeper: &Keeper,
    claims: &BTreeMap<ValAddress, Claim>,
) -> Result<BTreeMap<String, ExchangeRateBallot>, OracleError> {
    let mut ballots: BTreeMap<String, ExchangeRateBallot> = BTreeMap::new();

    for vote in keeper.iter_votes()? {
        let vote = vote?;
        let Some(claim) = claims.get(&vote.voter) else {
            continue;
        };
        for tuple in vote.exchange_rate_tuples {
            let power = if tuple.exchange_rate.is_positive() {
                claim.power
            } else {
                0
            };
            ballots
                .entry(tuple.denom.clone())
                .or_default()
                .push(VoteForTally::new(
                    tuple.exchange_rate,
                    tuple.denom,
                    vote.voter,
                    power,
                ));
        }
    }

    for ballot in ballots.values_mut() {
        ballot.sort();
    }
    Ok(ballots)
}

/// Deletes every revealed vote and every prevote older than one vote period.
pub fn clear_ballots(keeper: &Keeper, height: u64, vote_period: u64) -> Result<(), OracleError> {
    for prevote in keeper.iter_prevotes()? {
        let prevote = prevote?;
        if height > prevote.submit_block.saturating_add(vote_period) {
            keeper.delete_prevote(&prevote.voter)?;
        }
    }
    for vote in keeper.iter_votes()? {
        keeper.delete_vote(&vote?.voter)?;
    }
    Ok(())
}

/// Re-syncs the stored vote targets with the whitelist when their membership differs.
pub fn apply_whitelist(
    keeper: &Keeper,
    whitelist: &[Denom],
    vote_targets: &BTreeSet<String>,
) -> Result<bool, OracleError> {
    let update_required = vote_targets.len() != whitelist.len()
        || whitelist.iter().any(|d| !vote_targets.contains(&d.name));
    if !update_required {
        return Ok(false);
    }

    keeper.clear_vote_targets()?;
    for denom in whitelist {
        keeper.set_vote_target(&denom.name)?;
    }
    tracing::info!(
        targets = whitelist.len(),
        "vote targets refreshed from whitelist"
    );
    Ok(true)
}
