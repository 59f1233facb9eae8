//! Per-block execution context.

use crate::events::OracleEvent;

/// Height of the block being executed and the events it emitted so far.
#[derive(Debug, Default)]
pub struct Context {
    height: u64,
    events: Vec<OracleEvent>,
}

impl Context {
    pub fn new(height: u64) -> Self {
        Self {
            height,
            events: Vec::new(),
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn emit(&mut self, event: OracleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[OracleEvent] {
        &self.events
    }

    /// Drain the emitted events, leaving the context empty.
    pub fn take_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.events)
    }
}
