//! Oracle parameters: the vote period, tally thresholds, windows and the
//! whitelist of tracked denominations.
//!
//! All values are governance-tunable; `Params::validate` is the gate every
//! update passes through.

use crate::dec::Dec;
use crate::error::TypesError;
use crate::time::{BLOCKS_PER_MINUTE, BLOCKS_PER_WEEK, BLOCKS_PER_YEAR};
use serde::{Deserialize, Serialize};

/// Module name, also used to label the reward escrow account.
pub const MODULE_NAME: &str = "oracle";

/// Micro-denominated USD, the default whitelisted denomination.
pub const MICRO_USD_DENOM: &str = "uusd";

/// A whitelisted denomination and its tobin tax.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denom {
    pub name: String,
    pub tobin_tax: Dec,
}

impl Denom {
    pub fn new(name: impl Into<String>, tobin_tax: Dec) -> Self {
        Self {
            name: name.into(),
            tobin_tax,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Length of one voting period in blocks.
    pub vote_period: u64,
    /// Fraction of total bonded power a ballot needs to pass.
    pub vote_threshold: Dec,
    /// Tolerated band around the weighted median for reward eligibility.
    pub reward_band: Dec,
    /// Blocks over which escrowed rewards are amortized.
    pub reward_distribution_window: u64,
    pub whitelist: Vec<Denom>,
    pub slash_fraction: Dec,
    /// Blocks per slash window.
    pub slash_window: u64,
    /// Minimum valid-vote ratio per slash window before a validator is slashed.
    pub min_valid_per_window: Dec,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            vote_period: BLOCKS_PER_MINUTE,
            vote_threshold: Dec::with_prec(50, 2),
            reward_band: Dec::with_prec(2, 2),
            reward_distribution_window: BLOCKS_PER_YEAR,
            whitelist: vec![Denom::new(MICRO_USD_DENOM, Dec::with_prec(25, 4))],
            slash_fraction: Dec::with_prec(1, 4),
            slash_window: BLOCKS_PER_WEEK,
            min_valid_per_window: Dec::with_prec(5, 2),
        }
    }
}

fn within_unit(value: Dec) -> bool {
    !value.is_negative() && value <= Dec::ONE
}

impl Params {
    pub fn validate(&self) -> Result<(), TypesError> {
        let invalid = |msg: String| Err(TypesError::InvalidParams(msg));

        if self.vote_period == 0 {
            return invalid(format!("vote_period must be > 0, is {}", self.vote_period));
        }
        if self.vote_threshold <= Dec::with_prec(33, 2) || self.vote_threshold > Dec::ONE {
            return invalid(format!(
                "vote_threshold must be in (0.33, 1], is {}",
                self.vote_threshold
            ));
        }
        if !within_unit(self.reward_band) {
            return invalid(format!("reward_band must be in [0, 1], is {}", self.reward_band));
        }
        if self.reward_distribution_window < self.vote_period {
            return invalid(format!(
                "reward_distribution_window {} is shorter than vote_period {}",
                self.reward_distribution_window, self.vote_period
            ));
        }
        if !within_unit(self.slash_fraction) {
            return invalid(format!(
                "slash_fraction must be in [0, 1], is {}",
                self.slash_fraction
            ));
        }
        if self.slash_window < self.vote_period {
            return invalid(format!(
                "slash_window {} is shorter than vote_period {}",
                self.slash_window, self.vote_period
            ));
        }
        if !within_unit(self.min_valid_per_window) {
            return invalid(format!(
                "min_valid_per_window must be in [0, 1], is {}",
                self.min_valid_per_window
            ));
        }
        for denom in &self.whitelist {
            if denom.name.is_empty() {
                return invalid("whitelist denom must have a name".to_string());
            }
            if !within_unit(denom.tobin_tax) {
                return invalid(format!(
                    "tobin_tax of {} must be in [0, 1], is {}",
                    denom.name, denom.tobin_tax
                ));
            }
        }
        Ok(())
    }

    /// Vote periods per slash window.
    pub fn periods_per_slash_window(&self) -> u64 {
        self.slash_window / self.vote_period
    }

    /// Vote periods per reward distribution window.
    pub fn periods_per_reward_window(&self) -> u64 {
        self.reward_distribution_window / self.vote_period
    }
}
