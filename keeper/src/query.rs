//! Read-only queries over oracle state.

use oracle_types::params::Denom;
use oracle_types::{AccAddress, Dec, ExchangeRatePrevote, ExchangeRateVote, Params, ValAddress};
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::keeper::Keeper;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleQuery {
    ExchangeRate { denom: String },
    ExchangeRates,
    /// Denoms with a published rate.
    Actives,
    VoteTargets,
    TobinTax { denom: String },
    TobinTaxes,
    FeederDelegation { validator: ValAddress },
    MissCounter { validator: ValAddress },
    AggregatePrevote { validator: ValAddress },
    AggregatePrevotes,
    AggregateVote { validator: ValAddress },
    AggregateVotes,
    Params,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    ExchangeRate(Dec),
    ExchangeRates(Vec<(String, Dec)>),
    Denoms(Vec<String>),
    TobinTaxes(Vec<Denom>),
    FeederDelegation(AccAddress),
    MissCounter(u64),
    AggregatePrevote(ExchangeRatePrevote),
    AggregatePrevotes(Vec<ExchangeRatePrevote>),
    AggregateVote(ExchangeRateVote),
    AggregateVotes(Vec<ExchangeRateVote>),
    Params(Params),
}

impl OracleQuery {
    pub fn kind(&self) -> &'static str {
        match self {
            OracleQuery::ExchangeRate { .. } => "exchange_rate",
            OracleQuery::ExchangeRates => "exchange_rates",
            OracleQuery::Actives => "actives",
            OracleQuery::VoteTargets => "vote_targets",
            OracleQuery::TobinTax { .. } => "tobin_tax",
            OracleQuery::TobinTaxes => "tobin_taxes",
            OracleQuery::FeederDelegation { .. } => "feeder_delegation",
            OracleQuery::MissCounter { .. } => "miss_counter",
            OracleQuery::AggregatePrevote { .. } => "aggregate_prevote",
            OracleQuery::AggregatePrevotes => "aggregate_prevotes",
            OracleQuery::AggregateVote { .. } => "aggregate_vote",
            OracleQuery::AggregateVotes => "aggregate_votes",
            OracleQuery::Params => "params",
        }
    }
}

pub fn handle_query(keeper: &Keeper, query: &OracleQuery) -> Result<QueryResponse, OracleError> {
    let response = match query {
        OracleQuery::ExchangeRate { denom } => {
            QueryResponse::ExchangeRate(keeper.exchange_rate(denom)?)
        }
        OracleQuery::ExchangeRates => {
            QueryResponse::ExchangeRates(keeper.iter_exchange_rates()?.collect::<Result<_, _>>()?)
        }
        OracleQuery::Actives => QueryResponse::Denoms(
            keeper
                .iter_exchange_rates()?
                .map(|entry| entry.map(|(denom, _)| denom))
                .collect::<Result<_, _>>()?,
        ),
        OracleQuery::VoteTargets => {
            QueryResponse::Denoms(keeper.vote_targets()?.into_iter().collect())
        }
        OracleQuery::TobinTax { denom } => QueryResponse::ExchangeRate(keeper.tobin_tax(denom)?),
        OracleQuery::TobinTaxes => QueryResponse::TobinTaxes(keeper.params()?.whitelist),
        OracleQuery::FeederDelegation { validator } => {
            QueryResponse::FeederDelegation(keeper.feeder_delegation(validator)?)
        }
        OracleQuery::MissCounter { validator } => {
            QueryResponse::MissCounter(keeper.miss_counter(validator)?)
        }
        OracleQuery::AggregatePrevote { validator } => {
            QueryResponse::AggregatePrevote(keeper.prevote(validator)?)
        }
        OracleQuery::AggregatePrevotes => {
            QueryResponse::AggregatePrevotes(keeper.iter_prevotes()?.collect::<Result<_, _>>()?)
        }
        OracleQuery::AggregateVote { validator } => {
            QueryResponse::AggregateVote(keeper.vote(validator)?)
        }
        OracleQuery::AggregateVotes => {
            QueryResponse::AggregateVotes(keeper.iter_votes()?.collect::<Result<_, _>>()?)
        }
        OracleQuery::Params => QueryResponse::Params(keeper.params()?),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dec, val, TestInput};

    #[test]
    fn rates_and_actives() {
        let input = TestInput::new();
        input.keeper.set_exchange_rate("uusd", dec("1.5")).unwrap();
        input.keeper.set_exchange_rate("ueur", dec("0.9")).unwrap();

        assert_eq!(
            handle_query(&input.keeper, &OracleQuery::Actives).unwrap(),
            QueryResponse::Denoms(vec!["ueur".to_string(), "uusd".to_string()])
        );
        assert_eq!(
            handle_query(
                &input.keeper,
                &OracleQuery::ExchangeRate {
                    denom: "uusd".to_string()
                }
            )
            .unwrap(),
            QueryResponse::ExchangeRate(dec("1.5"))
        );
        assert!(matches!(
            handle_query(
                &input.keeper,
                &OracleQuery::ExchangeRate {
                    denom: "ukrw".to_string()
                }
            ),
            Err(OracleError::UnknownDenom(_))
        ));
    }

    #[test]
    fn miss_counter_and_feeder_defaults() {
        let input = TestInput::new();
        assert_eq!(
            handle_query(&input.keeper, &OracleQuery::MissCounter { validator: val(1) }).unwrap(),
            QueryResponse::MissCounter(0)
        );
        assert_eq!(
            handle_query(
                &input.keeper,
                &OracleQuery::FeederDelegation { validator: val(1) }
            )
            .unwrap(),
            QueryResponse::FeederDelegation(val(1).to_account())
        );
    }

    #[test]
    fn votes_listed() {
        let input = TestInput::new();
        input.submit_vote(val(1), &[("uusd", dec("1"))]);
        input.submit_vote(val(2), &[("uusd", dec("2"))]);
        match handle_query(&input.keeper, &OracleQuery::AggregateVotes).unwrap() {
            QueryResponse::AggregateVotes(votes) => assert_eq!(votes.len(), 2),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn params_and_tobin_taxes() {
        let input = TestInput::new();
        assert_eq!(
            handle_query(&input.keeper, &OracleQuery::Params).unwrap(),
            QueryResponse::Params(Params::default())
        );
        assert_eq!(
            handle_query(&input.keeper, &OracleQuery::TobinTaxes).unwrap(),
            QueryResponse::TobinTaxes(Params::default().whitelist)
        );
    }

    #[test]
    fn query_json_form() {
        let query: OracleQuery =
            serde_json::from_str(r#"{"type":"exchange_rate","denom":"uusd"}"#).unwrap();
        assert_eq!(
            query,
            OracleQuery::ExchangeRate {
                denom: "uusd".to_string()
            }
        );
    }
}
