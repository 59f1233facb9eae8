//! Slash-window enforcement.

use oracle_types::time::VALIDATOR_UPDATE_DELAY;
use oracle_types::{Dec, ValAddress};

use crate::context::Context;
use crate::error::OracleError;
use crate::events::OracleEvent;
use crate::keeper::Keeper;

/// Slashes and jails every bonded, unjailed validator whose valid-vote rate over
/// the window fell below `min_valid_per_window`, then deletes all miss counters.
///
/// Returns the slashed validators.
pub fn slash_and_reset_miss_counters(
    keeper: &Keeper,
    ctx: &mut Context,
) -> Result<Vec<ValAddress>, OracleError> {
    let params = keeper.params()?;
    let staking = keeper.staking();
    let infraction_height = ctx
        .height()
        .saturating_sub(VALIDATOR_UPDATE_DELAY)
        .saturating_sub(1);
    let periods = i64::try_from(params.periods_per_slash_window())
        .map_err(|_| OracleError::Overflow("slash window"))?;
    let power_reduction = staking.power_reduction();

    let mut slashed = Vec::new();
    for entry in keeper.iter_miss_counters()? {
        let (operator, misses) = entry?;
        let misses = i64::try_from(misses).map_err(|_| OracleError::Overflow("miss counter"))?;

        let valid_vote_rate = Dec::from_int(periods - misses)
            .checked_quo_int(periods)
            .ok_or(OracleError::Overflow("valid vote rate"))?;

        if valid_vote_rate < params.min_valid_per_window {
            match staking.validator(&operator) {
                Some(validator) if validator.bonded && !validator.jailed => {
                    let power = validator.consensus_power(power_reduction);
                    staking.slash(&operator, infraction_height, power, params.slash_fraction);
                    staking.jail(&operator);
                    tracing::warn!(
                        %operator,
                        misses,
                        %valid_vote_rate,
                        power,
                        "validator slashed for missing oracle votes"
                    );
                    ctx.emit(OracleEvent::Slash {
                        validator: operator,
                        power,
                        infraction_height,
                        fraction: params.slash_fraction,
                    });
                    slashed.push(operator);
                }
                _ => {
                    tracing::debug!(%operator, misses, "miss threshold exceeded by inactive validator");
                }
            }
        }

        keeper.delete_miss_counter(&operator)?;
    }
    Ok(slashed)
}
