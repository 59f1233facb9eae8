//! `denom:rate` tuples as revealed in a vote.

use crate::dec::Dec;
use crate::denom::validate_denom;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One exchange-rate claim of a vote. A non-positive rate is an abstention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateTuple {
    pub denom: String,
    pub exchange_rate: Dec,
}

impl ExchangeRateTuple {
    pub fn new(denom: impl Into<String>, exchange_rate: Dec) -> Self {
        Self {
            denom: denom.into(),
            exchange_rate,
        }
    }
}

impl fmt::Display for ExchangeRateTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.denom, self.exchange_rate)
    }
}

/// Parses a comma-separated `denom:rate` list. An empty or blank input is an
/// empty list.
pub fn parse_exchange_rate_tuples(input: &str) -> Result<Vec<ExchangeRateTuple>, TypesError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = BTreeSet::new();
    let mut tuples = Vec::new();
    for part in input.split(',') {
        let mut splits = part.trim().split(':');
        let (denom, rate) = match (splits.next(), splits.next(), splits.next()) {
            (Some(denom), Some(rate), None) => (denom.trim(), rate.trim()),
            _ => return Err(TypesError::InvalidTuple(part.to_string())),
        };

        validate_denom(denom)?;
        let exchange_rate: Dec = rate.parse()?;

        if !seen.insert(denom) {
            return Err(TypesError::DuplicateDenom(denom.to_string()));
        }
        tuples.push(ExchangeRateTuple::new(denom, exchange_rate));
    }
    Ok(tuples)
}

/// Canonical comma-separated rendering, parseable by [`parse_exchange_rate_tuples`].
pub fn format_exchange_rate_tuples(tuples: &[ExchangeRateTuple]) -> String {
    tuples
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
