//! Per-period reward/miss accumulator for one active validator.

use crate::address::ValAddress;

/// Built fresh from the active validator set at the end of every vote period and
/// dropped once rewards are paid. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    /// Consensus power of the validator.
    pub power: i64,
    /// Sum of ballot power over every ballot this validator won.
    pub weight: i64,
    /// Number of ballots won (including abstentions).
    pub win_count: u64,
    pub recipient: ValAddress,
}

impl Claim {
    pub fn new(power: i64, weight: i64, win_count: u64, recipient: ValAddress) -> Self {
        Self {
            power,
            weight,
            win_count,
            recipient,
        }
    }
}
