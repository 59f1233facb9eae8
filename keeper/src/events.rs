//! Events emitted by message handlers and the end-blocker.

use oracle_types::{AccAddress, Dec, ValAddress};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleEvent {
    /// A consensus rate was published for `denom`.
    ExchangeRateUpdate { denom: String, exchange_rate: Dec },
    Prevote { voter: ValAddress, feeder: AccAddress },
    Vote {
        voter: ValAddress,
        exchange_rates: String,
        feeder: AccAddress,
    },
    FeedDelegate { operator: ValAddress, feeder: AccAddress },
    Slash {
        validator: ValAddress,
        power: i64,
        infraction_height: u64,
        fraction: Dec,
    },
}

impl OracleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            OracleEvent::ExchangeRateUpdate { .. } => "exchange_rate_update",
            OracleEvent::Prevote { .. } => "prevote",
            OracleEvent::Vote { .. } => "vote",
            OracleEvent::FeedDelegate { .. } => "feed_delegate",
            OracleEvent::Slash { .. } => "slash",
        }
    }

    /// Attribute key/value pairs in emission order.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            OracleEvent::ExchangeRateUpdate {
                denom,
                exchange_rate,
            } => vec![
                ("denom", denom.clone()),
                ("exchange_rate", exchange_rate.to_string()),
            ],
            OracleEvent::Prevote { voter, feeder } => vec![
                ("voter", voter.to_string()),
                ("feeder", feeder.to_string()),
            ],
            OracleEvent::Vote {
                voter,
                exchange_rates,
                feeder,
            } => vec![
                ("voter", voter.to_string()),
                ("exchange_rates", exchange_rates.clone()),
                ("feeder", feeder.to_string()),
            ],
            OracleEvent::FeedDelegate { operator, feeder } => vec![
                ("operator", operator.to_string()),
                ("feeder", feeder.to_string()),
            ],
            OracleEvent::Slash {
                validator,
                power,
                infraction_height,
                fraction,
            } => vec![
                ("validator", validator.to_string()),
                ("power", power.to_string()),
                ("infraction_height", infraction_height.to_string()),
                ("fraction", fraction.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_rate_update_renders_as_json() {
        let event = OracleEvent::ExchangeRateUpdate {
            denom: "uusd".to_string(),
            exchange_rate: Dec::with_prec(15, 1),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "exchange_rate_update");
        assert_eq!(json["denom"], "uusd");
        assert_eq!(json["exchange_rate"], "1.500000000000000000");
        assert_eq!(event.kind(), "exchange_rate_update");
    }

    #[test]
    fn attributes_follow_field_order() {
        let event = OracleEvent::FeedDelegate {
            operator: ValAddress::new([1u8; 20]),
            feeder: AccAddress::new([2u8; 20]),
        };
        let keys: Vec<_> = event.attributes().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["operator", "feeder"]);
    }
}
