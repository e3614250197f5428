//! Decoded depth record as delivered by the market-data feed
//!
//! The feed client (outside this crate) turns raw exchange messages into
//! [`FeedUpdate`]s. Prices and quantities stay strings here; they are parsed
//! into decimals when the record is converted into a snapshot.

use costscope_core::{Error, OrderBookSnapshot, PriceLevel, Result};
use serde::{Deserialize, Serialize};

/// Full-depth update for one symbol on one exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedUpdate {
    pub timestamp: String,
    pub exchange: String,
    pub symbol: String,
    pub asks: Vec<[String; 2]>, // [price, quantity]
    pub bids: Vec<[String; 2]>,
}

impl FeedUpdate {
    /// Decode a JSON record. Missing or mistyped fields are `InvalidInput`.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::invalid_input(format!("malformed feed record: {e}")))
    }

    /// Decode an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::invalid_input(format!("malformed feed record: {e}")))
    }

    /// Parse every level into decimals.
    ///
    /// Level order is kept as received.
    pub fn to_snapshot(&self) -> Result<OrderBookSnapshot> {
        Ok(OrderBookSnapshot {
            asks: parse_levels("ask", &self.asks)?,
            bids: parse_levels("bid", &self.bids)?,
            timestamp: self.timestamp.clone(),
            exchange: self.exchange.clone(),
            symbol: self.symbol.clone(),
        })
    }
}

impl From<&OrderBookSnapshot> for FeedUpdate {
    fn from(snapshot: &OrderBookSnapshot) -> Self {
        let encode = |levels: &[PriceLevel]| {
            levels
                .iter()
                .map(|l| [l.price.to_string(), l.quantity.to_string()])
                .collect()
        };
        FeedUpdate {
            timestamp: snapshot.timestamp.clone(),
            exchange: snapshot.exchange.clone(),
            symbol: snapshot.symbol.clone(),
            asks: encode(&snapshot.asks),
            bids: encode(&snapshot.bids),
        }
    }
}

fn parse_levels(side: &str, raw: &[[String; 2]]) -> Result<Vec<PriceLevel>> {
    raw.iter()
        .enumerate()
        .map(|(i, [price, qty])| {
            PriceLevel::parse(price, qty).map_err(|e| match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("{side} level {i}: {msg}")),
                other => other,
            })
        })
        .collect()
}
