//! Statistics collection and reporting utilities.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters the oracle node keeps while driving vote periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OracleStat {
    MessagesDelivered,
    MessagesRejected,
    PeriodsTallied,
    RatesPublished,
    Misses,
    SlashWindows,
    Slashes,
}

impl OracleStat {
    pub const ALL: [OracleStat; 7] = [
        OracleStat::MessagesDelivered,
        OracleStat::MessagesRejected,
        OracleStat::PeriodsTallied,
        OracleStat::RatesPublished,
        OracleStat::Misses,
        OracleStat::SlashWindows,
        OracleStat::Slashes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OracleStat::MessagesDelivered => "messages_delivered",
            OracleStat::MessagesRejected => "messages_rejected",
            OracleStat::PeriodsTallied => "periods_tallied",
            OracleStat::RatesPublished => "rates_published",
            OracleStat::Misses => "misses",
            OracleStat::SlashWindows => "slash_windows",
            OracleStat::Slashes => "slashes",
        }
    }
}

/// Point-in-time copy of every counter, keyed by name.
pub type StatsSnapshot = BTreeMap<&'static str, u64>;

/// A thread-safe counter collection for oracle statistics.
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names
            .iter()
            .map(|&name| (name, AtomicU64::new(0)))
            .collect();
        Self { counters }
    }

    /// Counter set covering every [`OracleStat`].
    pub fn oracle() -> Self {
        let names: Vec<&'static str> = OracleStat::ALL.iter().map(|s| s.name()).collect();
        Self::new(&names)
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn record(&self, stat: OracleStat, value: u64) {
        self.add(stat.name(), value);
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn stat(&self, stat: OracleStat) -> u64 {
        self.get(stat.name())
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::oracle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_ignored() {
        let stats = StatsCounter::new(&["a"]);
        stats.increment("a");
        stats.increment("b");
        assert_eq!(stats.get("a"), 1);
        assert_eq!(stats.get("b"), 0);
        assert_eq!(stats.snapshot().len(), 1);
    }

    #[test]
    fn oracle_counters_start_at_zero() {
        let stats = StatsCounter::oracle();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.len(), OracleStat::ALL.len());
        assert!(snapshot.values().all(|&v| v == 0));
    }

    #[test]
    fn record_accumulates() {
        let stats = StatsCounter::default();
        stats.record(OracleStat::RatesPublished, 3);
        stats.record(OracleStat::RatesPublished, 2);
        stats.record(OracleStat::Slashes, 1);
        assert_eq!(stats.stat(OracleStat::RatesPublished), 5);
        assert_eq!(stats.get("slashes"), 1);
    }

    #[test]
    fn snapshot_serializes_in_name_order() {
        let stats = StatsCounter::new(&["zeta", "alpha"]);
        stats.increment("zeta");
        let json = serde_json::to_string(&stats.snapshot()).unwrap();
        assert_eq!(json, r#"{"alpha":0,"zeta":1}"#);
    }
}
