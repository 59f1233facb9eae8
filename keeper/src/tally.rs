//! Tally of a single ballot, and reference-denomination selection.

use std::collections::{BTreeMap, BTreeSet};

use oracle_types::{Claim, Dec, ValAddress};

use crate::ballot::ExchangeRateBallot;
use crate::error::OracleError;

/// Computes the weighted median of a sorted ballot and credits every voter
/// within the reward spread, or who abstained, with a win.
///
/// The spread is the larger of the ballot's standard deviation and
/// `median * reward_band / 2`.
pub fn tally(
    ballot: &ExchangeRateBallot,
    reward_band: Dec,
    claims: &mut BTreeMap<ValAddress, Claim>,
) -> Result<Dec, OracleError> {
    let overflow = || OracleError::Overflow("tally");

    let median = ballot.weighted_median_with_assertion()?;
    let standard_deviation = ballot.standard_deviation(median)?;
    let band_spread = reward_band
        .checked_quo_int(2)
        .and_then(|half| median.checked_mul(half))
        .ok_or_else(overflow)?;
    let spread = standard_deviation.max(band_spread);

    let low = median.saturating_sub(spread);
    let high = median.saturating_add(spread);

    for vote in ballot.iter() {
        let rate = vote.exchange_rate;
        if (rate >= low && rate <= high) || !rate.is_positive() {
            if let Some(claim) = claims.get_mut(&vote.voter) {
                claim.weight += vote.power;
                claim.win_count += 1;
            }
        }
    }

    tracing::debug!(
        %median,
        %spread,
        votes = ballot.len(),
        "ballot tallied"
    );
    Ok(median)
}

/// Ballot power and whether it reaches `threshold_votes`. A ballot with no
/// power never passes.
pub fn ballot_is_passing(ballot: &ExchangeRateBallot, threshold_votes: i64) -> (i64, bool) {
    let power = ballot.power();
    (power, power != 0 && power >= threshold_votes)
}

/// Minimum ballot power: `vote_threshold` of total bonded power, rounded.
pub fn threshold_votes(vote_threshold: Dec, total_bonded_power: i64) -> Result<i64, OracleError> {
    let threshold = vote_threshold
        .checked_mul_int(total_bonded_power)
        .ok_or(OracleError::Overflow("vote threshold"))?
        .round_int();
    i64::try_from(threshold).map_err(|_| OracleError::Overflow("vote threshold"))
}

/// Picks the passing ballot with the most power as the reference.
///
/// Ballots for denoms outside `vote_targets` are discarded. Failing ballots are
/// removed from both `vote_targets` and `ballots`, so their voters are not
/// charged a miss for them. Equal power is broken in favour of the
/// lexicographically smaller denom.
pub fn pick_reference_denom(
    vote_targets: &mut BTreeSet<String>,
    ballots: &mut BTreeMap<String, ExchangeRateBallot>,
    threshold_votes: i64,
) -> Option<String> {
    let mut reference: Option<(String, i64)> = None;

    let denoms: Vec<String> = ballots.keys().cloned().collect();
    for denom in denoms {
        if !vote_targets.contains(&denom) {
            ballots.remove(&denom);
            continue;
        }

        let (power, passing) = match ballots.get(&denom) {
            Some(ballot) => ballot_is_passing(ballot, threshold_votes),
            None => continue,
        };
        if !passing {
            tracing::debug!(%denom, power, threshold_votes, "ballot failed threshold");
            vote_targets.remove(&denom);
            ballots.remove(&denom);
            continue;
        }

        let replace = match &reference {
            None => true,
            Some((best, best_power)) => {
                power > *best_power || (power == *best_power && denom < *best)
            }
        };
        if replace {
            reference = Some((denom, power));
        }
    }

    reference.map(|(denom, _)| denom)
}
