//! The oracle node: wires the keeper to its collaborators and drives it
//! block by block.

use std::sync::Arc;

use tracing::{debug, info};

use oracle_keeper::{
    end_blocker, handle_msg, handle_query, Context, EndBlockReport, Keeper, OracleEvent,
    OracleMsg, OracleQuery, QueryResponse,
};
use oracle_nullables::{NullBank, NullDistribution, NullKvStore, NullStaking};
use oracle_store::{BankKeeper, DistributionKeeper, KvStore, StakingKeeper};
use oracle_utils::{OracleStat, StatsCounter};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::tracing_spans::{deliver_span, end_block_span, query_span};

/// Outcome of closing one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockResult {
    pub height: u64,
    pub report: EndBlockReport,
    /// Events from delivered messages followed by those of the end-blocker.
    pub events: Vec<OracleEvent>,
}

/// Handles to the in-memory collaborators behind [`OracleNode::in_memory`].
#[derive(Clone)]
pub struct InMemoryBackends {
    pub store: Arc<NullKvStore>,
    pub staking: Arc<NullStaking>,
    pub bank: Arc<NullBank>,
    pub distribution: Arc<NullDistribution>,
}

impl InMemoryBackends {
    pub fn new(config: &NodeConfig) -> Self {
        let staking = NullStaking::new()
            .with_max_validators(config.max_validators)
            .with_power_reduction(u128::from(config.power_reduction));
        Self {
            store: Arc::new(NullKvStore::new()),
            staking: Arc::new(staking),
            bank: Arc::new(NullBank::new()),
            distribution: Arc::new(NullDistribution::new()),
        }
    }
}

pub struct OracleNode {
    keeper: Keeper,
    stats: StatsCounter,
    height: u64,
    pending_events: Vec<OracleEvent>,
}

impl OracleNode {
    /// Create a node over the given collaborators and install the genesis
    /// params and vote targets from `config`.
    pub fn new(
        config: &NodeConfig,
        store: Arc<dyn KvStore + Send + Sync>,
        staking: Arc<dyn StakingKeeper + Send + Sync>,
        bank: Arc<dyn BankKeeper + Send + Sync>,
        distribution: Arc<dyn DistributionKeeper + Send + Sync>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let keeper = Keeper::new(store, staking, bank, distribution);
        init_genesis(&keeper, config)?;

        info!(
            height = config.initial_height,
            vote_period = config.oracle.vote_period,
            whitelist = config.oracle.whitelist.len(),
            "oracle node initialised"
        );

        Ok(Self {
            keeper,
            stats: StatsCounter::oracle(),
            height: config.initial_height,
            pending_events: Vec::new(),
        })
    }

    /// Node backed entirely by in-memory collaborators.
    pub fn in_memory(config: &NodeConfig) -> Result<(Self, InMemoryBackends), NodeError> {
        let backends = InMemoryBackends::new(config);
        let node = Self::new(
            config,
            backends.store.clone(),
            backends.staking.clone(),
            backends.bank.clone(),
            backends.distribution.clone(),
        )?;
        Ok((node, backends))
    }

    /// Height of the block currently being built.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn keeper(&self) -> &Keeper {
        &self.keeper
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Deliver a message into the current block. A rejected message leaves
    /// state untouched and the block open.
    pub fn deliver(&mut self, msg: &OracleMsg) -> Result<(), NodeError> {
        let span = deliver_span(self.height, msg.kind());
        let _enter = span.enter();

        let mut ctx = Context::new(self.height);
        match handle_msg(&self.keeper, &mut ctx, msg) {
            Ok(()) => {
                self.stats.record(OracleStat::MessagesDelivered, 1);
                self.pending_events.extend(ctx.take_events());
                Ok(())
            }
            Err(e) => {
                self.stats.record(OracleStat::MessagesRejected, 1);
                debug!(error = %e, "message rejected");
                Err(e.into())
            }
        }
    }

    /// Run the end-blocker for the current height and advance to the next
    /// block. On error the height is not advanced.
    pub fn end_block(&mut self) -> Result<BlockResult, NodeError> {
        let height = self.height;
        let span = end_block_span(height);
        let _enter = span.enter();

        let mut ctx = Context::new(height);
        let report = end_blocker(&self.keeper, &mut ctx)?;

        if report.vote_period_ended {
            self.stats.record(OracleStat::PeriodsTallied, 1);
            self.stats
                .record(OracleStat::RatesPublished, report.published.len() as u64);
            self.stats.record(OracleStat::Misses, report.missed.len() as u64);
            info!(
                reference = report.reference_denom.as_deref().unwrap_or("none"),
                published = report.published.len(),
                missed = report.missed.len(),
                "vote period tallied"
            );
        }
        if report.slash_window_ended {
            self.stats.record(OracleStat::SlashWindows, 1);
            self.stats.record(OracleStat::Slashes, report.slashed.len() as u64);
            info!(slashed = report.slashed.len(), "slash window closed");
        }

        let mut events = std::mem::take(&mut self.pending_events);
        events.extend(ctx.take_events());
        self.height += 1;

        Ok(BlockResult {
            height,
            report,
            events,
        })
    }

    pub fn query(&self, query: &OracleQuery) -> Result<QueryResponse, NodeError> {
        let span = query_span(query.kind());
        let _enter = span.enter();
        Ok(handle_query(&self.keeper, query)?)
    }
}

/// Store genesis params and install the whitelist as the initial vote targets.
fn init_genesis(keeper: &Keeper, config: &NodeConfig) -> Result<(), NodeError> {
    keeper.set_params(&config.oracle)?;
    keeper.clear_vote_targets()?;
    for denom in &config.oracle.whitelist {
        keeper.set_vote_target(&denom.name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_types::params::Denom;
    use oracle_types::{Dec, Params};

    fn config() -> NodeConfig {
        NodeConfig {
            oracle: Params {
                vote_period: 2,
                reward_distribution_window: 10,
                slash_window: 10,
                whitelist: vec![Denom::new("ukrw", Dec::ZERO), Denom::new("uusd", Dec::ZERO)],
                ..Params::default()
            },
            ..NodeConfig::default()
        }
    }

    #[test]
    fn genesis_installs_params_and_targets() {
        let (node, _) = OracleNode::in_memory(&config()).unwrap();
        assert_eq!(node.keeper().params().unwrap(), config().oracle);
        let targets = node.keeper().vote_targets().unwrap();
        assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec!["ukrw", "uusd"]);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = config();
        config.oracle.vote_period = 0;
        assert!(matches!(
            OracleNode::in_memory(&config),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn end_block_advances_height() {
        let mut config = config();
        config.initial_height = 7;
        let (mut node, _) = OracleNode::in_memory(&config).unwrap();
        let result = node.end_block().unwrap();
        assert_eq!(result.height, 7);
        assert!(result.report.vote_period_ended);
        assert_eq!(node.height(), 8);
        assert!(!node.end_block().unwrap().report.vote_period_ended);
    }

    #[test]
    fn rejected_message_is_counted() {
        let (mut node, _) = OracleNode::in_memory(&config()).unwrap();
        let msg = OracleMsg::DelegateFeedConsent(oracle_keeper::MsgDelegateFeedConsent {
            operator: String::new(),
            delegate: String::new(),
        });
        assert!(node.deliver(&msg).is_err());
        assert_eq!(node.stats().stat(OracleStat::MessagesRejected), 1);
        assert_eq!(node.stats().stat(OracleStat::MessagesDelivered), 0);
    }

    #[test]
    fn params_query_served() {
        let (node, _) = OracleNode::in_memory(&config()).unwrap();
        let response = node.query(&OracleQuery::Params).unwrap();
        assert_eq!(response, QueryResponse::Params(config().oracle));
    }
}
