//! Oracle transaction messages and their stateless checks.
//!
//! Messages carry addresses and hashes in their text form, exactly as
//! submitted. `validate_basic` rejects malformed input before any state is read.

use oracle_types::{parse_exchange_rate_tuples, AccAddress, ValAddress, VoteHash};
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// Maximum byte length of a revealed exchange-rate string.
pub const MAX_EXCHANGE_RATES_LEN: usize = 4096;
/// Maximum byte length of a reveal salt.
pub const MAX_SALT_LEN: usize = 4;

fn parse_feeder(feeder: &str) -> Result<AccAddress, OracleError> {
    if feeder.is_empty() {
        return Err(OracleError::EmptyAddress("feeder"));
    }
    Ok(feeder.parse()?)
}

fn parse_validator(validator: &str) -> Result<ValAddress, OracleError> {
    if validator.is_empty() {
        return Err(OracleError::EmptyAddress("validator"));
    }
    Ok(validator.parse()?)
}

/// Commit: the hash of a salted set of rates to be revealed next period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAggregateExchangeRatePrevote {
    pub hash: String,
    pub feeder: String,
    pub validator: String,
}

impl MsgAggregateExchangeRatePrevote {
    pub fn new(hash: VoteHash, feeder: AccAddress, validator: ValAddress) -> Self {
        Self {
            hash: hash.to_string(),
            feeder: feeder.to_string(),
            validator: validator.to_string(),
        }
    }

    pub fn validate_basic(&self) -> Result<(), OracleError> {
        self.vote_hash()?;
        self.feeder_address()?;
        self.validator_address()?;
        Ok(())
    }

    pub fn vote_hash(&self) -> Result<VoteHash, OracleError> {
        Ok(self.hash.parse()?)
    }

    pub fn feeder_address(&self) -> Result<AccAddress, OracleError> {
        parse_feeder(&self.feeder)
    }

    pub fn validator_address(&self) -> Result<ValAddress, OracleError> {
        parse_validator(&self.validator)
    }
}

/// Reveal: the salt and rates committed to by the previous period's prevote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAggregateExchangeRateVote {
    pub salt: String,
    pub exchange_rates: String,
    pub feeder: String,
    pub validator: String,
}

impl MsgAggregateExchangeRateVote {
    pub fn new(
        salt: impl Into<String>,
        exchange_rates: impl Into<String>,
        feeder: AccAddress,
        validator: ValAddress,
    ) -> Self {
        Self {
            salt: salt.into(),
            exchange_rates: exchange_rates.into(),
            feeder: feeder.to_string(),
            validator: validator.to_string(),
        }
    }

    pub fn validate_basic(&self) -> Result<(), OracleError> {
        self.feeder_address()?;
        self.validator_address()?;

        if self.exchange_rates.len() > MAX_EXCHANGE_RATES_LEN {
            return Err(OracleError::ExchangeRatesTooLong(self.exchange_rates.len()));
        }
        let tuples = parse_exchange_rate_tuples(&self.exchange_rates)?;
        if tuples.is_empty() {
            return Err(OracleError::Types(oracle_types::TypesError::InvalidTuple(
                "empty exchange rates".to_string(),
            )));
        }

        if self.salt.is_empty() || self.salt.len() > MAX_SALT_LEN {
            return Err(OracleError::InvalidSaltLength(self.salt.len()));
        }
        Ok(())
    }

    pub fn feeder_address(&self) -> Result<AccAddress, OracleError> {
        parse_feeder(&self.feeder)
    }

    pub fn validator_address(&self) -> Result<ValAddress, OracleError> {
        parse_validator(&self.validator)
    }
}

/// Authorizes `delegate` to submit votes on behalf of `operator`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDelegateFeedConsent {
    pub operator: String,
    pub delegate: String,
}

impl MsgDelegateFeedConsent {
    pub fn new(operator: ValAddress, delegate: AccAddress) -> Self {
        Self {
            operator: operator.to_string(),
            delegate: delegate.to_string(),
        }
    }

    pub fn validate_basic(&self) -> Result<(), OracleError> {
        self.operator_address()?;
        self.delegate_address()?;
        Ok(())
    }

    pub fn operator_address(&self) -> Result<ValAddress, OracleError> {
        if self.operator.is_empty() {
            return Err(OracleError::EmptyAddress("operator"));
        }
        Ok(self.operator.parse()?)
    }

    pub fn delegate_address(&self) -> Result<AccAddress, OracleError> {
        if self.delegate.is_empty() {
            return Err(OracleError::EmptyAddress("delegate"));
        }
        Ok(self.delegate.parse()?)
    }
}

/// Any oracle message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleMsg {
    Prevote(MsgAggregateExchangeRatePrevote),
    Vote(MsgAggregateExchangeRateVote),
    DelegateFeedConsent(MsgDelegateFeedConsent),
}

impl OracleMsg {
    pub fn kind(&self) -> &'static str {
        match self {
            OracleMsg::Prevote(_) => "aggregate_exchange_rate_prevote",
            OracleMsg::Vote(_) => "aggregate_exchange_rate_vote",
            OracleMsg::DelegateFeedConsent(_) => "delegate_feed_consent",
        }
    }

    pub fn validate_basic(&self) -> Result<(), OracleError> {
        match self {
            OracleMsg::Prevote(msg) => msg.validate_basic(),
            OracleMsg::Vote(msg) => msg.validate_basic(),
            OracleMsg::DelegateFeedConsent(msg) => msg.validate_basic(),
        }
    }
}
