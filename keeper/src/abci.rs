//! End-of-block hook: the per-period tally and the slash-window check.

use std::collections::BTreeMap;

use oracle_types::time::is_period_last_block;
use oracle_types::{Claim, ValAddress};

use crate::ballot::{apply_whitelist, clear_ballots, organize_ballot_by_denom};
use crate::context::Context;
use crate::error::OracleError;
use crate::keeper::Keeper;
use crate::reward::reward_ballot_winners;
use crate::slash::slash_and_reset_miss_counters;
use crate::tally::{pick_reference_denom, tally, threshold_votes};

/// What the end-blocker did at one height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndBlockReport {
    /// The height closed a vote period.
    pub vote_period_ended: bool,
    pub reference_denom: Option<String>,
    /// Denoms whose rate was published, in publication order.
    pub published: Vec<String>,
    /// Validators charged a miss this period.
    pub missed: Vec<ValAddress>,
    /// The height closed a slash window.
    pub slash_window_ended: bool,
    pub slashed: Vec<ValAddress>,
}

/// Claim map over the active set: bonded, unjailed validators in power order,
/// at most `max_validators` of them.
fn build_claims(keeper: &Keeper) -> BTreeMap<ValAddress, Claim> {
    let staking = keeper.staking();
    let max_validators = staking.max_validators() as usize;
    let power_reduction = staking.power_reduction();

    staking
        .validators_by_power()
        .into_iter()
        .filter(|v| v.bonded && !v.jailed)
        .take(max_validators)
        .map(|v| {
            let power = v.consensus_power(power_reduction);
            (v.operator, Claim::new(power, 0, 0, v.operator))
        })
        .collect()
}

pub fn end_blocker(keeper: &Keeper, ctx: &mut Context) -> Result<EndBlockReport, OracleError> {
    let params = keeper.params()?;
    let height = ctx.height();
    let mut report = EndBlockReport::default();

    if is_period_last_block(height, params.vote_period) {
        report.vote_period_ended = true;

        keeper.clear_exchange_rates()?;

        let mut claims = build_claims(keeper);
        let mut vote_targets = keeper.vote_targets()?;
        let mut ballots = organize_ballot_by_denom(keeper, &claims)?;

        let staking = keeper.staking();
        let total_bonded_power = i64::try_from(
            staking
                .total_bonded_tokens()
                .checked_div(staking.power_reduction())
                .unwrap_or(0),
        )
        .map_err(|_| OracleError::Overflow("total bonded power"))?;
        let threshold = threshold_votes(params.vote_threshold, total_bonded_power)?;

        if let Some(reference) = pick_reference_denom(&mut vote_targets, &mut ballots, threshold) {
            let reference_ballot = ballots
                .get(&reference)
                .cloned()
                .unwrap_or_default();
            let reference_rates = reference_ballot.to_map();
            let reference_rate = reference_ballot.weighted_median_with_assertion()?;

            for (denom, ballot) in &ballots {
                let rate = if *denom == reference {
                    tally(ballot, params.reward_band, &mut claims)?
                } else {
                    let cross = ballot.to_cross_rate(&reference_rates);
                    let published = cross
                        .weighted_median()
                        .and_then(|cross_rate| reference_rate.checked_quo(cross_rate));
                    let Some(published) = published else {
                        // no voter backs this denom with a reference rate
                        tracing::warn!(
                            %denom,
                            %reference,
                            "cross ballot has no power, denom dropped for this period"
                        );
                        vote_targets.remove(denom.as_str());
                        continue;
                    };
                    tally(&cross, params.reward_band, &mut claims)?;
                    published
                };
                keeper.set_exchange_rate_with_event(ctx, denom, rate)?;
                report.published.push(denom.clone());
            }
            tracing::info!(
                height,
                %reference,
                %reference_rate,
                published = report.published.len(),
                "oracle rates published"
            );
            report.reference_denom = Some(reference);
        } else {
            tracing::info!(height, "no ballot reached the vote threshold");
        }

        let target_count = vote_targets.len() as u64;
        for claim in claims.values() {
            if claim.win_count < target_count {
                let misses = keeper.miss_counter(&claim.recipient)?;
                keeper.set_miss_counter(&claim.recipient, misses + 1)?;
                report.missed.push(claim.recipient);
            }
        }

        reward_ballot_winners(
            keeper,
            params.vote_period,
            params.reward_distribution_window,
            &claims,
        )?;

        clear_ballots(keeper, height, params.vote_period)?;
        apply_whitelist(keeper, &params.whitelist, &vote_targets)?;
    }

    if is_period_last_block(height, params.slash_window) {
        report.slash_window_ended = true;
        report.slashed = slash_and_reset_miss_counters(keeper, ctx)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dec, val, TestInput};
    use oracle_nullables::NullStaking;
    use oracle_store::StakingKeeper;
    use oracle_types::params::{Denom, MODULE_NAME};
    use oracle_types::{Coin, Dec, Params};
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn params(whitelist: &[&str]) -> Params {
        Params {
            vote_period: 1,
            vote_threshold: dec("0.5"),
            reward_band: dec("0.02"),
            reward_distribution_window: 10,
            slash_window: 100,
            min_valid_per_window: dec("0.05"),
            whitelist: whitelist.iter().map(|d| Denom::new(*d, Dec::ZERO)).collect(),
            ..Params::default()
        }
    }

    fn input_with_validators(whitelist: &[&str], powers: &[(u8, i64)]) -> TestInput {
        let input = TestInput::with_params(params(whitelist));
        for (b, power) in powers {
            input.staking.add_validator(val(*b), *power);
        }
        input
    }

    const EQUAL_THREE: &[(u8, i64)] = &[(1, 100), (2, 100), (3, 100)];

    #[test]
    fn single_denom_publishes_weighted_median() {
        let input = input_with_validators(&["uusd"], EQUAL_THREE);
        input.submit_vote(val(1), &[("uusd", dec("6"))]);
        input.submit_vote(val(2), &[("uusd", dec("10"))]);
        input.submit_vote(val(3), &[("uusd", dec("17"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();

        assert!(report.vote_period_ended);
        assert_eq!(report.reference_denom.as_deref(), Some("uusd"));
        assert_eq!(input.keeper.exchange_rate("uusd").unwrap(), dec("10"));
        assert_eq!(report.missed, vec![val(3)]);
        assert_eq!(input.keeper.miss_counter(&val(3)).unwrap(), 1);
        assert_eq!(input.keeper.miss_counter(&val(1)).unwrap(), 0);
        assert_eq!(ctx.events().len(), 1);
        assert_eq!(ctx.events()[0].kind(), "exchange_rate_update");
    }

    #[test]
    fn cross_rates_are_published_against_reference() {
        let input = input_with_validators(&["ueur", "ukrw", "uusd"], EQUAL_THREE);
        for b in 1..=3 {
            input.submit_vote(
                val(b),
                &[("uusd", dec("2")), ("ueur", dec("4")), ("ukrw", dec("0.5"))],
            );
        }

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();

        // equal power everywhere, so the smallest denom is the reference
        assert_eq!(report.reference_denom.as_deref(), Some("ueur"));
        assert_eq!(input.keeper.exchange_rate("ueur").unwrap(), dec("4"));
        assert_eq!(input.keeper.exchange_rate("uusd").unwrap(), dec("2"));
        assert_eq!(input.keeper.exchange_rate("ukrw").unwrap(), dec("0.5"));
        assert_eq!(report.published, vec!["ueur", "ukrw", "uusd"]);
        assert!(report.missed.is_empty());
    }

    #[test]
    fn failed_ballot_is_not_charged_as_a_miss() {
        let input = input_with_validators(&["ueur", "uusd"], EQUAL_THREE);
        input.submit_vote(val(1), &[("uusd", dec("1")), ("ueur", dec("3"))]);
        input.submit_vote(val(2), &[("uusd", dec("1"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.published, vec!["uusd"]);
        assert!(input.keeper.exchange_rate("ueur").is_err());
        assert_eq!(report.missed, vec![val(3)]);
    }

    #[test]
    fn wide_ballot_still_publishes() {
        let input = input_with_validators(&["uusd"], EQUAL_THREE);
        input.submit_vote(val(1), &[("uusd", dec("1"))]);
        input.submit_vote(val(2), &[("uusd", dec("100000000000"))]);
        input.submit_vote(val(3), &[("uusd", dec("100000000000"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.published, vec!["uusd"]);
        assert_eq!(
            input.keeper.exchange_rate("uusd").unwrap(),
            dec("100000000000")
        );
        assert_eq!(report.missed, vec![val(1)]);
    }

    #[test]
    fn cross_ballot_without_reference_voters_is_dropped() {
        let input = input_with_validators(&["ueur", "uusd"], &[(1, 100), (2, 100), (3, 200)]);
        // both ballots carry 200 of 400 power; ueur wins the tie as reference,
        // and nobody voting uusd also voted ueur
        input.submit_vote(val(1), &[("ueur", dec("4"))]);
        input.submit_vote(val(2), &[("ueur", dec("4"))]);
        input.submit_vote(val(3), &[("uusd", dec("2"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.reference_denom.as_deref(), Some("ueur"));
        assert_eq!(report.published, vec!["ueur"]);
        assert!(input.keeper.exchange_rate("uusd").is_err());
        // ueur voters are not charged for the dropped denom
        assert_eq!(report.missed, vec![val(3)]);
        assert_eq!(input.keeper.miss_counter(&val(1)).unwrap(), 0);
        assert!(input.keeper.is_vote_target("uusd").unwrap());
    }

    #[test]
    fn target_without_any_ballot_charges_everyone() {
        let input = input_with_validators(&["ueur", "uusd"], EQUAL_THREE);
        for b in 1..=3 {
            input.submit_vote(val(b), &[("uusd", dec("1"))]);
        }

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.missed, vec![val(1), val(2), val(3)]);
    }

    #[test]
    fn rates_cleared_when_nothing_passes() {
        let input = input_with_validators(&["uusd"], EQUAL_THREE);
        input.keeper.set_exchange_rate("uusd", dec("1")).unwrap();
        input.submit_vote(val(1), &[("uusd", dec("1"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.reference_denom, None);
        assert!(input.keeper.exchange_rate("uusd").is_err());
        // the only target failed, so nobody is charged a miss
        assert!(report.missed.is_empty());
        // and the shrunk target set is restored from the whitelist
        assert!(input.keeper.is_vote_target("uusd").unwrap());
    }

    #[test]
    fn abstention_wins_without_reward() {
        let input = input_with_validators(&["uusd"], EQUAL_THREE);
        input.bank.mint(MODULE_NAME, Coin::new("uusd", 2_000));
        input.submit_vote(val(1), &[("uusd", dec("5"))]);
        input.submit_vote(val(2), &[("uusd", dec("5"))]);
        input.submit_vote(val(3), &[("uusd", dec("0"))]);

        let mut ctx = Context::new(0);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert!(report.missed.is_empty());
        assert_eq!(input.distribution.allocated(&val(3), "uusd"), 0);
        assert_eq!(input.distribution.allocated(&val(1), "uusd"), 100);
    }

    #[test]
    fn winners_rewarded_from_escrow() {
        let input = input_with_validators(&["uusd"], EQUAL_THREE);
        input.bank.mint(MODULE_NAME, Coin::new("uusd", 3_000));
        input.submit_vote(val(1), &[("uusd", dec("6"))]);
        input.submit_vote(val(2), &[("uusd", dec("10"))]);
        input.submit_vote(val(3), &[("uusd", dec("17"))]);

        let mut ctx = Context::new(0);
        end_blocker(&input.keeper, &mut ctx).unwrap();

        // 10 periods per window; two winners of equal weight split 300
        assert_eq!(input.distribution.allocated(&val(1), "uusd"), 150);
        assert_eq!(input.distribution.allocated(&val(2), "uusd"), 150);
        assert_eq!(input.distribution.allocated(&val(3), "uusd"), 0);
    }

    #[test]
    fn votes_pruned_after_tally() {
        let input = input_with_validators(&["uusd"], &[(1, 100)]);
        input.submit_vote(val(1), &[("uusd", dec("1"))]);
        let mut ctx = Context::new(0);
        end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(input.keeper.iter_votes().unwrap().count(), 0);
    }

    #[test]
    fn active_set_skips_unbonded_and_caps_at_max_validators() {
        let staking = NullStaking::new().with_max_validators(1);
        staking.add_validator(val(1), 100);
        staking.add_validator(val(2), 90);
        staking.add_validator(val(3), 80);
        staking.set_bonded(&val(1), false);
        let input = TestInput::with_staking(staking);

        let claims = build_claims(&input.keeper);
        assert_eq!(claims.keys().collect::<Vec<_>>(), vec![&val(2)]);
        assert_eq!(claims[&val(2)].power, 90);
    }

    #[test]
    fn active_set_skips_jailed() {
        let staking = NullStaking::new();
        staking.add_validator(val(1), 100);
        staking.add_validator(val(2), 90);
        staking.jail(&val(1));
        let input = TestInput::with_staking(staking);

        let claims = build_claims(&input.keeper);
        assert_eq!(claims.keys().collect::<Vec<_>>(), vec![&val(2)]);
    }

    #[test]
    fn slash_window_resets_counters() {
        let mut p = params(&["uusd"]);
        p.slash_window = 2;
        p.min_valid_per_window = dec("0.5");
        let input = TestInput::with_params(p);
        input.staking.add_validator(val(1), 100);
        input.staking.add_validator(val(2), 100);

        // val(2) never votes: two misses over a two-period window
        for height in 0..2 {
            input.submit_vote(val(1), &[("uusd", dec("1"))]);
            let mut ctx = Context::new(height);
            let report = end_blocker(&input.keeper, &mut ctx).unwrap();
            assert_eq!(report.slash_window_ended, height == 1);
            if height == 1 {
                assert_eq!(report.slashed, vec![val(2)]);
            }
        }
        assert!(input.staking.is_jailed(&val(2)));
        assert_eq!(input.keeper.iter_miss_counters().unwrap().count(), 0);

        // once jailed, val(2) is out of the active set and accrues no misses
        input.submit_vote(val(1), &[("uusd", dec("1"))]);
        let mut ctx = Context::new(2);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report.published, vec!["uusd"]);
        assert!(report.missed.is_empty());
        assert_eq!(input.keeper.miss_counter(&val(2)).unwrap(), 0);
    }

    #[test]
    fn nothing_happens_mid_period() {
        let mut p = params(&["uusd"]);
        p.vote_period = 5;
        let input = TestInput::with_params(p);
        input.staking.add_validator(val(1), 100);
        input.submit_vote(val(1), &[("uusd", dec("1"))]);

        let mut ctx = Context::new(2);
        let report = end_blocker(&input.keeper, &mut ctx).unwrap();
        assert_eq!(report, EndBlockReport::default());
        assert_eq!(input.keeper.iter_votes().unwrap().count(), 1);
    }

    proptest! {
        /// Exactly the reported losers gain one miss, on top of whatever they
        /// had. Non-voters lose whenever a rate is published.
        #[test]
        fn misses_charged_once_to_losers(
            voters in vec((1i64..500, proptest::option::of(1u128..100_000), 0u64..5), 1..7),
        ) {
            let input = TestInput::with_params(params(&["uusd"]));
            let addrs: Vec<ValAddress> = (1u8..).take(voters.len()).map(val).collect();
            for (addr, (power, rate, misses)) in addrs.iter().zip(&voters) {
                input.staking.add_validator(*addr, *power);
                input.keeper.set_miss_counter(addr, *misses).unwrap();
                if let Some(raw) = rate {
                    input.submit_vote(*addr, &[("uusd", Dec::from_ratio(*raw, 100).unwrap())]);
                }
            }

            let mut ctx = Context::new(0);
            let report = end_blocker(&input.keeper, &mut ctx).unwrap();

            for (addr, (_, rate, misses)) in addrs.iter().zip(&voters) {
                let lost = report.missed.contains(addr);
                let after = input.keeper.miss_counter(addr).unwrap();
                prop_assert_eq!(after, misses + lost as u64);
                if rate.is_none() {
                    prop_assert_eq!(lost, !report.published.is_empty());
                }
            }
        }

        /// The published cross rate times the cross median recovers the
        /// reference rate, up to rounding.
        #[test]
        fn cross_rate_recovers_reference(
            voters in vec((1i64..500, 1u128..10_000, 1u128..10_000), 1..7),
        ) {
            let input = TestInput::with_params(params(&["ueur", "uusd"]));
            for (b, (power, eur, usd)) in (1u8..).zip(&voters) {
                input.staking.add_validator(val(b), *power);
                input.submit_vote(
                    val(b),
                    &[
                        ("ueur", Dec::from_ratio(*eur, 100).unwrap()),
                        ("uusd", Dec::from_ratio(*usd, 100).unwrap()),
                    ],
                );
            }

            // both ballots carry the full power, so ueur is the reference
            let claims = build_claims(&input.keeper);
            let ballots = organize_ballot_by_denom(&input.keeper, &claims).unwrap();
            let reference_rate = ballots["ueur"].weighted_median().unwrap();
            let cross_median = ballots["uusd"]
                .to_cross_rate(&ballots["ueur"].to_map())
                .weighted_median()
                .unwrap();

            let mut ctx = Context::new(0);
            let report = end_blocker(&input.keeper, &mut ctx).unwrap();
            prop_assert_eq!(report.reference_denom.as_deref(), Some("ueur"));
            prop_assert_eq!(input.keeper.exchange_rate("ueur").unwrap(), reference_rate);

            let published = input.keeper.exchange_rate("uusd").unwrap();
            let recovered = published.checked_mul(cross_median).unwrap();
            let error = (recovered.raw() - reference_rate.raw()).abs();
            prop_assert!(error <= cross_median.truncate_int() + 2);
        }
    }
}
