//! Price oracle node.
//!
//! Loads a [`NodeConfig`], initialises logging and drives the oracle keeper
//! one block at a time: messages are delivered into the open block and
//! [`OracleNode::end_block`] runs the end-of-block tally and slash checks.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::{BlockResult, InMemoryBackends, OracleNode};
