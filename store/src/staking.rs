//! Staking module as seen by the oracle.

use oracle_types::{Dec, ValAddress};

/// Snapshot of a validator's staking state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorInfo {
    pub operator: ValAddress,
    pub bonded: bool,
    pub jailed: bool,
    /// Bonded tokens, in the staking denom's smallest unit.
    pub tokens: u128,
}

impl ValidatorInfo {
    pub fn new(operator: ValAddress, tokens: u128) -> Self {
        Self {
            operator,
            bonded: true,
            jailed: false,
            tokens,
        }
    }

    /// Voting power: bonded tokens divided by the power reduction.
    /// Non-bonded validators have no power.
    pub fn consensus_power(&self, power_reduction: u128) -> i64 {
        if !self.bonded || power_reduction == 0 {
            return 0;
        }
        i64::try_from(self.tokens / power_reduction).unwrap_or(i64::MAX)
    }
}

pub trait StakingKeeper {
    fn validator(&self, operator: &ValAddress) -> Option<ValidatorInfo>;

    /// Validators ordered by descending power, as the staking module ranks them.
    /// May include validators that are no longer bonded.
    fn validators_by_power(&self) -> Vec<ValidatorInfo>;

    fn total_bonded_tokens(&self) -> u128;
    fn max_validators(&self) -> u32;
    fn power_reduction(&self) -> u128;

    /// Slash `fraction` of the stake the validator had at `infraction_height`.
    fn slash(&self, operator: &ValAddress, infraction_height: u64, power: i64, fraction: Dec);
    fn jail(&self, operator: &ValAddress);
}
