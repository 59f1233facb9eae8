//! Message handlers. Every check runs before the first write, so a rejected
//! message leaves state untouched.

use oracle_crypto::aggregate_vote_hash;
use oracle_types::{parse_exchange_rate_tuples, ExchangeRatePrevote, ExchangeRateVote};

use crate::context::Context;
use crate::error::OracleError;
use crate::events::OracleEvent;
use crate::keeper::Keeper;
use crate::msg::{
    MsgAggregateExchangeRatePrevote, MsgAggregateExchangeRateVote, MsgDelegateFeedConsent,
    OracleMsg,
};

pub struct MsgServer<'a> {
    keeper: &'a Keeper,
}

impl<'a> MsgServer<'a> {
    pub fn new(keeper: &'a Keeper) -> Self {
        Self { keeper }
    }

    /// Records a commitment at the current height, replacing any earlier one.
    pub fn aggregate_exchange_rate_prevote(
        &self,
        ctx: &mut Context,
        msg: &MsgAggregateExchangeRatePrevote,
    ) -> Result<(), OracleError> {
        msg.validate_basic()?;
        let validator = msg.validator_address()?;
        let feeder = msg.feeder_address()?;
        let hash = msg.vote_hash()?;

        self.keeper.validate_feeder(&feeder, &validator)?;

        let prevote = ExchangeRatePrevote::new(hash, validator, ctx.height());
        self.keeper.set_prevote(&prevote)?;

        tracing::debug!(%validator, height = ctx.height(), "prevote recorded");
        ctx.emit(OracleEvent::Prevote {
            voter: validator,
            feeder,
        });
        Ok(())
    }

    /// Reveals the rates committed to in the previous vote period.
    pub fn aggregate_exchange_rate_vote(
        &self,
        ctx: &mut Context,
        msg: &MsgAggregateExchangeRateVote,
    ) -> Result<(), OracleError> {
        msg.validate_basic()?;
        let validator = msg.validator_address()?;
        let feeder = msg.feeder_address()?;

        self.keeper.validate_feeder(&feeder, &validator)?;

        let params = self.keeper.params()?;
        let prevote = self.keeper.prevote(&validator)?;

        // The reveal must land in the period right after the commit.
        let height = ctx.height();
        if height / params.vote_period != prevote.submit_block / params.vote_period + 1 {
            return Err(OracleError::RevealPeriodMismatch {
                submit_block: prevote.submit_block,
                height,
            });
        }

        let tuples = parse_exchange_rate_tuples(&msg.exchange_rates)?;
        for tuple in &tuples {
            if !self.keeper.is_vote_target(&tuple.denom)? {
                return Err(OracleError::UnknownDenom(tuple.denom.clone()));
            }
        }

        let hash = aggregate_vote_hash(&msg.salt, &msg.exchange_rates, &validator);
        if hash != prevote.hash {
            return Err(OracleError::VerificationFailed {
                expected: prevote.hash.to_string(),
                actual: hash.to_string(),
            });
        }

        self.keeper
            .set_vote(&ExchangeRateVote::new(tuples, validator))?;
        self.keeper.delete_prevote(&validator)?;

        tracing::debug!(%validator, height, "vote revealed");
        ctx.emit(OracleEvent::Vote {
            voter: validator,
            exchange_rates: msg.exchange_rates.clone(),
            feeder,
        });
        Ok(())
    }

    /// Lets an operator hand its voting right to another account.
    pub fn delegate_feed_consent(
        &self,
        ctx: &mut Context,
        msg: &MsgDelegateFeedConsent,
    ) -> Result<(), OracleError> {
        msg.validate_basic()?;
        let operator = msg.operator_address()?;
        let delegate = msg.delegate_address()?;

        if self.keeper.staking().validator(&operator).is_none() {
            return Err(OracleError::ValidatorNotFound(operator.to_string()));
        }

        self.keeper.set_feeder_delegation(&operator, &delegate)?;

        tracing::info!(%operator, %delegate, "feeder delegated");
        ctx.emit(OracleEvent::FeedDelegate {
            operator,
            feeder: delegate,
        });
        Ok(())
    }
}

/// Routes a message to its handler.
pub fn handle_msg(keeper: &Keeper, ctx: &mut Context, msg: &OracleMsg) -> Result<(), OracleError> {
    let server = MsgServer::new(keeper);
    match msg {
        OracleMsg::Prevote(msg) => server.aggregate_exchange_rate_prevote(ctx, msg),
        OracleMsg::Vote(msg) => server.aggregate_exchange_rate_vote(ctx, msg),
        OracleMsg::DelegateFeedConsent(msg) => server.delegate_feed_consent(ctx, msg),
    }
}
