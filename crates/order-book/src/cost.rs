//! Pre-trade cost summary combining book analytics with the fee ladder

use std::fmt;

use costscope_core::{Error, FeeSchedule, Quantity, Result, Side};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::analytics;
use crate::processor::OrderBookProcessor;

/// Hypothetical order to cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRequest {
    pub quantity: Quantity,
    pub side: Side,
    /// 30-day traded volume used to pick the fee tier
    pub trailing_volume: Decimal,
}

impl CostRequest {
    pub fn new(quantity: Quantity, side: Side) -> Self {
        CostRequest {
            quantity,
            side,
            trailing_volume: Decimal::ZERO,
        }
    }

    pub fn with_trailing_volume(mut self, volume: Decimal) -> Self {
        self.trailing_volume = volume;
        self
    }
}

// ============================================================================
// Estimate
// ============================================================================

/// Expected cost of executing a [`CostRequest`] against the current book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCostEstimate {
    pub quantity: Quantity,
    pub side: Side,
    /// Best price on the side the order consumes
    pub reference_price: Decimal,
    pub notional: Decimal,
    pub slippage: f64,
    pub market_impact: f64,
    pub maker_ratio: f64,
    pub fee_tier: String,
    pub fees: Decimal,
    /// `slippage·notional + market_impact·notional + fees`, in quote currency
    pub net_cost: f64,
}

impl TradeCostEstimate {
    /// Cost `request` against one consistent view of `processor`: the book and
    /// the maker/taker ratio are read under a single lock.
    ///
    /// Fails with `InvalidInput` on a non-positive quantity or when the side
    /// the order would consume is empty.
    pub fn compute(
        processor: &OrderBookProcessor,
        fee_schedule: &FeeSchedule,
        request: CostRequest,
    ) -> Result<Self> {
        if request.quantity <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "quantity must be positive, got {}",
                request.quantity
            )));
        }

        let (snapshot, maker_ratio) = processor.snapshot_with_ratio();
        let reference_price = snapshot
            .levels(request.side)
            .first()
            .map(|level| level.price)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "no liquidity to price a {:?} order on {}/{}",
                    request.side, snapshot.exchange, snapshot.symbol
                ))
            })?;
        let notional = request
            .quantity
            .checked_mul(reference_price)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "notional of {} @ {} exceeds the decimal range",
                    request.quantity, reference_price
                ))
            })?;

        let slippage = analytics::slippage(&snapshot, request.quantity, request.side);
        let market_impact = analytics::market_impact(&snapshot, request.quantity, request.side);

        let mut schedule = fee_schedule.clone();
        let fee_tier = schedule.select_tier(request.trailing_volume).name.clone();
        let blend = Decimal::from_f64(maker_ratio).ok_or_else(|| {
            Error::invalid_input(format!("maker ratio is not representable: {maker_ratio}"))
        })?;
        let fees = schedule.blended_fee(notional, blend)?;

        let notional_f = notional.to_f64().unwrap_or(f64::INFINITY);
        let fees_f = fees.to_f64().unwrap_or(f64::INFINITY);
        let net_cost = slippage * notional_f + market_impact * notional_f + fees_f;

        Ok(TradeCostEstimate {
            quantity: request.quantity,
            side: request.side,
            reference_price,
            notional,
            slippage,
            market_impact,
            maker_ratio,
            fee_tier,
            fees,
            net_cost,
        })
    }

    /// False when the visible book cannot fill the full quantity
    pub fn is_fillable(&self) -> bool {
        self.slippage.is_finite()
    }
}

impl fmt::Display for TradeCostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trade Cost Estimate")?;
        writeln!(f, "  Order:          {:?} {} @ {}", self.side, self.quantity, self.reference_price)?;
        writeln!(f, "  Notional:       {}", self.notional)?;
        writeln!(f, "  Slippage:       {:.6}%", self.slippage * 100.0)?;
        writeln!(f, "  Market Impact:  {:.6}%", self.market_impact * 100.0)?;
        writeln!(f, "  Maker Ratio:    {:.2}", self.maker_ratio)?;
        writeln!(f, "  Fees ({}):  {}", self.fee_tier, self.fees)?;
        write!(f, "  Net Cost:       {:.4}", self.net_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costscope_core::OrderBookSnapshot;
    use rust_decimal_macros::dec;

    fn processor() -> OrderBookProcessor {
        let processor = OrderBookProcessor::new();
        processor
            .update(
                OrderBookSnapshot::new("OKX", "BTC-USDT-SWAP", "t0")
                    .with_asks([
                        (dec!(50000), dec!(1.5)),
                        (dec!(50001), dec!(2.0)),
                        (dec!(50002), dec!(1.0)),
                    ])
                    .with_bids([(dec!(49999), dec!(3.0))]),
            )
            .unwrap();
        processor
    }

    #[test]
    fn test_cost_at_touch() {
        let estimate = TradeCostEstimate::compute(
            &processor(),
            &FeeSchedule::okx(),
            CostRequest::new(dec!(1), Side::Buy),
        )
        .unwrap();

        assert_eq!(estimate.reference_price, dec!(50000));
        assert_eq!(estimate.notional, dec!(50000));
        assert_eq!(estimate.slippage, 0.0);
        assert_eq!(estimate.market_impact, 0.0);
        assert_eq!(estimate.maker_ratio, 0.5);
        assert_eq!(estimate.fee_tier, "Regular");
        // 50000 · (0.0008 · 0.5 + 0.0010 · 0.5)
        assert_eq!(estimate.fees, dec!(45));
        assert!((estimate.net_cost - 45.0).abs() < 1e-9);
        assert!(estimate.is_fillable());
    }

    #[test]
    fn test_tier_from_trailing_volume() {
        let request = CostRequest::new(dec!(1), Side::Buy).with_trailing_volume(dec!(60000));
        let estimate =
            TradeCostEstimate::compute(&processor(), &FeeSchedule::okx(), request).unwrap();

        assert_eq!(estimate.fee_tier, "VIP1");
        assert_eq!(estimate.fees, dec!(40));
    }

    #[test]
    fn test_walk_cost_included() {
        let estimate = TradeCostEstimate::compute(
            &processor(),
            &FeeSchedule::okx(),
            CostRequest::new(dec!(2), Side::Buy),
        )
        .unwrap();

        // avg 50000.25 against 50000 on a 100000 notional: 0.5 each for slippage and impact
        assert!((estimate.slippage * 100000.0 - 0.5).abs() < 1e-6);
        assert!((estimate.net_cost - (1.0 + 90.0)).abs() < 1e-6);
    }

    #[test]
    fn test_unfillable_order_has_infinite_cost() {
        let estimate = TradeCostEstimate::compute(
            &processor(),
            &FeeSchedule::okx(),
            CostRequest::new(dec!(10), Side::Buy),
        )
        .unwrap();
        assert!(!estimate.is_fillable());
        assert_eq!(estimate.net_cost, f64::INFINITY);
    }

    #[test]
    fn test_rejects_empty_side_and_bad_quantity() {
        let empty = OrderBookProcessor::new();
        let err = TradeCostEstimate::compute(
            &empty,
            &FeeSchedule::okx(),
            CostRequest::new(dec!(1), Side::Sell),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = TradeCostEstimate::compute(
            &processor(),
            &FeeSchedule::okx(),
            CostRequest::new(dec!(0), Side::Buy),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let err = TradeCostEstimate::compute(
            &processor(),
            &FeeSchedule::okx(),
            CostRequest::new(dec!(10000000000000000000000000), Side::Buy),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("decimal range")));
    }
}
