//! Nullable staking module with a controllable validator set.

use oracle_store::{StakingKeeper, ValidatorInfo};
use oracle_types::{Dec, ValAddress};
use std::sync::{Mutex, MutexGuard};

/// A slash as observed by the staking module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashRecord {
    pub operator: ValAddress,
    pub infraction_height: u64,
    pub power: i64,
    pub fraction: Dec,
}

pub struct NullStaking {
    validators: Mutex<Vec<ValidatorInfo>>,
    slashes: Mutex<Vec<SlashRecord>>,
    max_validators: u32,
    power_reduction: u128,
}

/// One unit of consensus power per million tokens.
pub const DEFAULT_POWER_REDUCTION: u128 = 1_000_000;

impl NullStaking {
    pub fn new() -> Self {
        Self {
            validators: Mutex::new(Vec::new()),
            slashes: Mutex::new(Vec::new()),
            max_validators: 100,
            power_reduction: DEFAULT_POWER_REDUCTION,
        }
    }

    pub fn with_max_validators(mut self, max_validators: u32) -> Self {
        self.max_validators = max_validators;
        self
    }

    pub fn with_power_reduction(mut self, power_reduction: u128) -> Self {
        self.power_reduction = power_reduction;
        self
    }

    /// Add a bonded validator holding `power` units of consensus power.
    pub fn add_validator(&self, operator: ValAddress, power: i64) {
        let tokens = power.max(0) as u128 * self.power_reduction;
        self.add_validator_info(ValidatorInfo::new(operator, tokens));
    }

    pub fn add_validator_info(&self, info: ValidatorInfo) {
        let mut validators = self.validators();
        validators.retain(|v| v.operator != info.operator);
        validators.push(info);
    }

    pub fn set_bonded(&self, operator: &ValAddress, bonded: bool) {
        if let Some(v) = self.validators().iter_mut().find(|v| v.operator == *operator) {
            v.bonded = bonded;
        }
    }

    pub fn unjail(&self, operator: &ValAddress) {
        if let Some(v) = self.validators().iter_mut().find(|v| v.operator == *operator) {
            v.jailed = false;
        }
    }

    pub fn is_jailed(&self, operator: &ValAddress) -> bool {
        self.validators()
            .iter()
            .any(|v| v.operator == *operator && v.jailed)
    }

    pub fn slashes(&self) -> Vec<SlashRecord> {
        self.slashes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn validators(&self) -> MutexGuard<'_, Vec<ValidatorInfo>> {
        self.validators.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for NullStaking {
    fn default() -> Self {
        Self::new()
    }
}

impl StakingKeeper for NullStaking {
    fn validator(&self, operator: &ValAddress) -> Option<ValidatorInfo> {
        self.validators()
            .iter()
            .find(|v| v.operator == *operator)
            .cloned()
    }

    fn validators_by_power(&self) -> Vec<ValidatorInfo> {
        let mut validators = self.validators().clone();
        validators.sort_by(|a, b| b.tokens.cmp(&a.tokens).then(a.operator.cmp(&b.operator)));
        validators
    }

    fn total_bonded_tokens(&self) -> u128 {
        self.validators()
            .iter()
            .filter(|v| v.bonded)
            .map(|v| v.tokens)
            .sum()
    }

    fn max_validators(&self) -> u32 {
        self.max_validators
    }

    fn power_reduction(&self) -> u128 {
        self.power_reduction
    }

    fn slash(&self, operator: &ValAddress, infraction_height: u64, power: i64, fraction: Dec) {
        self.slashes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SlashRecord {
                operator: *operator,
                infraction_height,
                power,
                fraction,
            });
    }

    fn jail(&self, operator: &ValAddress) {
        if let Some(v) = self.validators().iter_mut().find(|v| v.operator == *operator) {
            v.jailed = true;
        }
    }
}
