//! Pre-built [`tracing::Span`] constructors for node operations.
//!
//! Consistent span names and field sets keep per-block traces easy to filter.

use tracing::{info_span, Span};

/// Span covering the delivery of one oracle message.
pub fn deliver_span(height: u64, msg_type: &str) -> Span {
    info_span!("deliver", height, msg_type = %msg_type)
}

/// Span covering the end-of-block hook.
pub fn end_block_span(height: u64) -> Span {
    info_span!("end_block", height)
}

/// Span covering a read-only query.
pub fn query_span(query_type: &str) -> Span {
    info_span!("query", query_type = %query_type)
}
