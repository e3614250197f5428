use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PriceLevel, Side};
use crate::values::Symbol;

/// Full depth snapshot of one book at one point in time
///
/// Asks are expected in ascending price order and bids in descending price
/// order. The ordering is a contract of whoever builds the snapshot; nothing
/// here re-sorts levels. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    pub timestamp: String,
    pub exchange: String,
    pub symbol: Symbol,
}

impl OrderBookSnapshot {
    pub fn new(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            asks: Vec::new(),
            bids: Vec::new(),
            timestamp: timestamp.into(),
            exchange: exchange.into(),
            symbol: symbol.into(),
        }
    }

    /// Builder: set ask levels (ascending price)
    pub fn with_asks(mut self, asks: impl IntoIterator<Item = (Decimal, Decimal)>) -> Self {
        self.asks = asks.into_iter().map(PriceLevel::from).collect();
        self
    }

    /// Builder: set bid levels (descending price)
    pub fn with_bids(mut self, bids: impl IntoIterator<Item = (Decimal, Decimal)>) -> Self {
        self.bids = bids.into_iter().map(PriceLevel::from).collect();
        self
    }

    /// Levels an order on `side` would consume: asks for a buy, bids for a sell
    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Total visible quantity on the side an order on `side` would consume
    pub fn depth(&self, side: Side) -> Decimal {
        self.levels(side).iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_levels_by_side() {
        let book = OrderBookSnapshot::new("OKX", "BTC-USDT", "2025-01-01T00:00:00Z")
            .with_asks([(dec!(50001), dec!(1)), (dec!(50002), dec!(2))])
            .with_bids([(dec!(49999), dec!(3))]);

        assert_eq!(book.levels(Side::Buy).len(), 2);
        assert_eq!(book.levels(Side::Sell).len(), 1);
        assert_eq!(book.best_ask().unwrap().price, dec!(50001));
        assert_eq!(book.best_bid().unwrap().price, dec!(49999));
        assert_eq!(book.depth(Side::Buy), dec!(3));
        assert_eq!(book.depth(Side::Sell), dec!(3));
    }

    #[test]
    fn test_default_is_empty() {
        let book = OrderBookSnapshot::default();
        assert!(book.is_empty());
        assert_eq!(book.depth(Side::Buy), Decimal::ZERO);
        assert!(book.best_ask().is_none());
    }
}
