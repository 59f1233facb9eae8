//! Oracle state access.
//!
//! `Keeper` owns the oracle's view of the key-value store and its handles to the
//! staking, bank and distribution modules. Every read decodes through the store
//! codec; iteration walks a snapshot of the prefix and decodes lazily.

use std::collections::BTreeSet;
use std::sync::Arc;

use oracle_store::{decode, encode, keys, BankKeeper, DistributionKeeper, KvStore, StakingKeeper};
use oracle_types::params::MODULE_NAME;
use oracle_types::{
    AccAddress, Coin, Dec, ExchangeRatePrevote, ExchangeRateVote, Params, ValAddress,
};

use crate::context::Context;
use crate::error::OracleError;
use crate::events::OracleEvent;

pub struct Keeper {
    store: Arc<dyn KvStore + Send + Sync>,
    staking: Arc<dyn StakingKeeper + Send + Sync>,
    bank: Arc<dyn BankKeeper + Send + Sync>,
    distribution: Arc<dyn DistributionKeeper + Send + Sync>,
}

type Entry = (Vec<u8>, Vec<u8>);

fn decode_rate((key, value): Entry) -> Result<(String, Dec), OracleError> {
    Ok((keys::denom_from_key(&key)?, decode(&value)?))
}

fn decode_delegation((key, value): Entry) -> Result<(ValAddress, AccAddress), OracleError> {
    Ok((keys::validator_from_key(&key)?, decode(&value)?))
}

fn decode_miss_counter((key, value): Entry) -> Result<(ValAddress, u64), OracleError> {
    Ok((keys::validator_from_key(&key)?, decode(&value)?))
}

fn decode_prevote((_, value): Entry) -> Result<ExchangeRatePrevote, OracleError> {
    Ok(decode(&value)?)
}

fn decode_vote((_, value): Entry) -> Result<ExchangeRateVote, OracleError> {
    Ok(decode(&value)?)
}

impl Keeper {
    pub fn new(
        store: Arc<dyn KvStore + Send + Sync>,
        staking: Arc<dyn StakingKeeper + Send + Sync>,
        bank: Arc<dyn BankKeeper + Send + Sync>,
        distribution: Arc<dyn DistributionKeeper + Send + Sync>,
    ) -> Self {
        Self {
            store,
            staking,
            bank,
            distribution,
        }
    }

    pub fn staking(&self) -> &dyn StakingKeeper {
        self.staking.as_ref()
    }

    pub fn bank(&self) -> &dyn BankKeeper {
        self.bank.as_ref()
    }

    pub fn distribution(&self) -> &dyn DistributionKeeper {
        self.distribution.as_ref()
    }

    // ── Params ───────────────────────────────────────────────────────────

    /// Stored parameters, or the defaults if none were ever set.
    pub fn params(&self) -> Result<Params, OracleError> {
        match self.store.get(keys::PARAMS_KEY)? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Ok(Params::default()),
        }
    }

    pub fn set_params(&self, params: &Params) -> Result<(), OracleError> {
        params.validate()?;
        self.store.set(keys::PARAMS_KEY, &encode(params)?)?;
        Ok(())
    }

    /// Tobin tax of a whitelisted denom.
    pub fn tobin_tax(&self, denom: &str) -> Result<Dec, OracleError> {
        self.params()?
            .whitelist
            .into_iter()
            .find(|d| d.name == denom)
            .map(|d| d.tobin_tax)
            .ok_or_else(|| OracleError::UnknownDenom(denom.to_string()))
    }

    // ── Exchange rates ───────────────────────────────────────────────────

    pub fn exchange_rate(&self, denom: &str) -> Result<Dec, OracleError> {
        match self.store.get(&keys::exchange_rate_key(denom))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Err(OracleError::UnknownDenom(denom.to_string())),
        }
    }

    pub fn set_exchange_rate(&self, denom: &str, rate: Dec) -> Result<(), OracleError> {
        self.store
            .set(&keys::exchange_rate_key(denom), &encode(&rate)?)?;
        Ok(())
    }

    /// Publish a rate and emit `exchange_rate_update`.
    pub fn set_exchange_rate_with_event(
        &self,
        ctx: &mut Context,
        denom: &str,
        rate: Dec,
    ) -> Result<(), OracleError> {
        self.set_exchange_rate(denom, rate)?;
        ctx.emit(OracleEvent::ExchangeRateUpdate {
            denom: denom.to_string(),
            exchange_rate: rate,
        });
        Ok(())
    }

    pub fn delete_exchange_rate(&self, denom: &str) -> Result<(), OracleError> {
        self.store.delete(&keys::exchange_rate_key(denom))?;
        Ok(())
    }

    /// Published rates in denom order.
    pub fn iter_exchange_rates(
        &self,
    ) -> Result<impl Iterator<Item = Result<(String, Dec), OracleError>>, OracleError> {
        let entries = self.store.prefix_iter(&[keys::EXCHANGE_RATE_PREFIX])?;
        Ok(entries.into_iter().map(decode_rate))
    }

    pub fn clear_exchange_rates(&self) -> Result<(), OracleError> {
        for (key, _) in self.store.prefix_iter(&[keys::EXCHANGE_RATE_PREFIX])? {
            self.store.delete(&key)?;
        }
        Ok(())
    }

    // ── Feeder delegation ────────────────────────────────────────────────

    /// Account allowed to vote for `operator`; the operator's own account by default.
    pub fn feeder_delegation(&self, operator: &ValAddress) -> Result<AccAddress, OracleError> {
        match self.store.get(&keys::feeder_delegation_key(operator))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Ok(operator.to_account()),
        }
    }

    pub fn set_feeder_delegation(
        &self,
        operator: &ValAddress,
        feeder: &AccAddress,
    ) -> Result<(), OracleError> {
        self.store
            .set(&keys::feeder_delegation_key(operator), &encode(feeder)?)?;
        Ok(())
    }

    pub fn iter_feeder_delegations(
        &self,
    ) -> Result<impl Iterator<Item = Result<(ValAddress, AccAddress), OracleError>>, OracleError>
    {
        let entries = self.store.prefix_iter(&[keys::FEEDER_DELEGATION_PREFIX])?;
        Ok(entries.into_iter().map(decode_delegation))
    }

    // ── Miss counters ────────────────────────────────────────────────────

    /// Vote periods missed in the current slash window.
    pub fn miss_counter(&self, operator: &ValAddress) -> Result<u64, OracleError> {
        match self.store.get(&keys::miss_counter_key(operator))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Ok(0),
        }
    }

    pub fn set_miss_counter(&self, operator: &ValAddress, count: u64) -> Result<(), OracleError> {
        self.store
            .set(&keys::miss_counter_key(operator), &encode(&count)?)?;
        Ok(())
    }

    pub fn delete_miss_counter(&self, operator: &ValAddress) -> Result<(), OracleError> {
        self.store.delete(&keys::miss_counter_key(operator))?;
        Ok(())
    }

    pub fn iter_miss_counters(
        &self,
    ) -> Result<impl Iterator<Item = Result<(ValAddress, u64), OracleError>>, OracleError> {
        let entries = self.store.prefix_iter(&[keys::MISS_COUNTER_PREFIX])?;
        Ok(entries.into_iter().map(decode_miss_counter))
    }

    // ── Prevotes ─────────────────────────────────────────────────────────

    pub fn prevote(&self, voter: &ValAddress) -> Result<ExchangeRatePrevote, OracleError> {
        match self.store.get(&keys::prevote_key(voter))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Err(OracleError::NoPrevote(voter.to_string())),
        }
    }

    pub fn set_prevote(&self, prevote: &ExchangeRatePrevote) -> Result<(), OracleError> {
        self.store
            .set(&keys::prevote_key(&prevote.voter), &encode(prevote)?)?;
        Ok(())
    }

    pub fn delete_prevote(&self, voter: &ValAddress) -> Result<(), OracleError> {
        self.store.delete(&keys::prevote_key(voter))?;
        Ok(())
    }

    pub fn iter_prevotes(
        &self,
    ) -> Result<impl Iterator<Item = Result<ExchangeRatePrevote, OracleError>>, OracleError> {
        let entries = self.store.prefix_iter(&[keys::PREVOTE_PREFIX])?;
        Ok(entries.into_iter().map(decode_prevote))
    }

    // ── Votes ────────────────────────────────────────────────────────────

    pub fn vote(&self, voter: &ValAddress) -> Result<ExchangeRateVote, OracleError> {
        match self.store.get(&keys::vote_key(voter))? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Err(OracleError::NoVote(voter.to_string())),
        }
    }

    pub fn set_vote(&self, vote: &ExchangeRateVote) -> Result<(), OracleError> {
        self.store.set(&keys::vote_key(&vote.voter), &encode(vote)?)?;
        Ok(())
    }

    pub fn delete_vote(&self, voter: &ValAddress) -> Result<(), OracleError> {
        self.store.delete(&keys::vote_key(voter))?;
        Ok(())
    }

    /// Revealed votes in voter-address order.
    pub fn iter_votes(
        &self,
    ) -> Result<impl Iterator<Item = Result<ExchangeRateVote, OracleError>>, OracleError> {
        let entries = self.store.prefix_iter(&[keys::VOTE_PREFIX])?;
        Ok(entries.into_iter().map(decode_vote))
    }

    // ── Vote targets ─────────────────────────────────────────────────────

    pub fn is_vote_target(&self, denom: &str) -> Result<bool, OracleError> {
        Ok(self.store.has(&keys::vote_target_key(denom))?)
    }

    pub fn set_vote_target(&self, denom: &str) -> Result<(), OracleError> {
        self.store
            .set(&keys::vote_target_key(denom), denom.as_bytes())?;
        Ok(())
    }

    pub fn vote_targets(&self) -> Result<BTreeSet<String>, OracleError> {
        self.store
            .prefix_iter(&[keys::VOTE_TARGET_PREFIX])?
            .into_iter()
            .map(|(key, _)| keys::denom_from_key(&key).map_err(OracleError::from))
            .collect()
    }

    pub fn clear_vote_targets(&self) -> Result<(), OracleError> {
        for (key, _) in self.store.prefix_iter(&[keys::VOTE_TARGET_PREFIX])? {
            self.store.delete(&key)?;
        }
        Ok(())
    }

    // ── Rewards and authorization ────────────────────────────────────────

    /// Escrowed reward balance of `denom`.
    pub fn reward_pool(&self, denom: &str) -> Coin {
        self.bank
            .module_balances(MODULE_NAME)
            .into_iter()
            .find(|c| c.denom == denom)
            .unwrap_or_else(|| Coin::new(denom, 0))
    }

    /// Checks that `feeder` may vote for `validator` and that the validator is
    /// bonded and not jailed.
    pub fn validate_feeder(
        &self,
        feeder: &AccAddress,
        validator: &ValAddress,
    ) -> Result<(), OracleError> {
        if *feeder != validator.to_account() && *feeder != self.feeder_delegation(validator)? {
            return Err(OracleError::NoVotingPermission {
                feeder: feeder.to_string(),
                validator: validator.to_string(),
            });
        }
        match self.staking.validator(validator) {
            Some(info) if info.bonded && !info.jailed => Ok(()),
            _ => Err(OracleError::ValidatorNotActive(validator.to_string())),
        }
    }
}
