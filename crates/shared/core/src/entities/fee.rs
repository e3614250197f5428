use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One rung of an exchange's volume-tiered fee ladder
///
/// Rates are fractions of notional (0.001 = 10 bps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub name: String,

    /// Fee for maker orders (adds liquidity)
    pub maker_fee: Decimal,

    /// Fee for taker orders (removes liquidity)
    pub taker_fee: Decimal,

    /// Minimum trailing 30-day volume (quote currency) to qualify
    pub min_volume: Decimal,
}

impl FeeTier {
    pub fn new(
        name: impl Into<String>,
        maker_fee: Decimal,
        taker_fee: Decimal,
        min_volume: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            maker_fee,
            taker_fee,
            min_volume,
        }
    }

    pub fn rate(&self, is_maker: bool) -> Decimal {
        if is_maker {
            self.maker_fee
        } else {
            self.taker_fee
        }
    }
}

/// Volume-tiered fee schedule for a single exchange
///
/// Tiers are kept in ascending `min_volume` order. The active tier starts at
/// the base tier and moves with [`FeeSchedule::select_tier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    exchange: String,
    tiers: Vec<FeeTier>,
    current: usize,
}

impl FeeSchedule {
    /// Create a schedule from an explicit tier ladder
    pub fn new(exchange: impl Into<String>, mut tiers: Vec<FeeTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(Error::invalid_configuration(
                "fee schedule needs at least one tier",
            ));
        }
        if let Some(bad) = tiers
            .iter()
            .find(|t| t.min_volume.is_sign_negative() && !t.min_volume.is_zero())
        {
            return Err(Error::invalid_configuration(format!(
                "tier {} has negative minimum volume",
                bad.name
            )));
        }
        tiers.sort_by(|a, b| a.min_volume.cmp(&b.min_volume));
        Ok(Self {
            exchange: exchange.into(),
            tiers,
            current: 0,
        })
    }

    /// OKX spot ladder, Regular through VIP6
    pub fn okx() -> Self {
        let tiers = vec![
            FeeTier::new("Regular", dec!(0.0008), dec!(0.0010), dec!(0)),
            FeeTier::new("VIP1", dec!(0.0007), dec!(0.0009), dec!(50000)),
            FeeTier::new("VIP2", dec!(0.0006), dec!(0.0008), dec!(100000)),
            FeeTier::new("VIP3", dec!(0.0005), dec!(0.0007), dec!(500000)),
            FeeTier::new("VIP4", dec!(0.0004), dec!(0.0006), dec!(1000000)),
            FeeTier::new("VIP5", dec!(0.0003), dec!(0.0005), dec!(5000000)),
            FeeTier::new("VIP6", dec!(0.0002), dec!(0.0004), dec!(10000000)),
        ];
        Self {
            exchange: "OKX".to_string(),
            tiers,
            current: 0,
        }
    }

    /// Look up the built-in schedule for an exchange
    pub fn for_exchange(exchange: &str) -> Result<Self> {
        match exchange.to_ascii_lowercase().as_str() {
            "okx" => Ok(Self::okx()),
            _ => Err(Error::invalid_input(format!(
                "unsupported exchange: {exchange}"
            ))),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    pub fn current_tier(&self) -> &FeeTier {
        &self.tiers[self.current]
    }

    /// Activate the highest tier whose minimum volume is met.
    ///
    /// Volumes below every threshold fall back to the base tier.
    pub fn select_tier(&mut self, trailing_volume: Decimal) -> &FeeTier {
        self.current = self
            .tiers
            .iter()
            .rposition(|tier| trailing_volume >= tier.min_volume)
            .unwrap_or(0);
        self.current_tier()
    }

    /// Fee for a trade of `notional` at the active tier
    pub fn calculate_fee(&self, notional: Decimal, is_maker: bool) -> Result<Decimal> {
        if notional <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "notional must be positive, got {notional}"
            )));
        }
        Ok(notional * self.current_tier().rate(is_maker))
    }

    /// Fee for a trade expected to fill `maker_ratio` as maker and the rest as taker
    pub fn blended_fee(&self, notional: Decimal, maker_ratio: Decimal) -> Result<Decimal> {
        if !(Decimal::ZERO..=Decimal::ONE).contains(&maker_ratio) {
            return Err(Error::invalid_input(format!(
                "maker ratio must be within [0, 1], got {maker_ratio}"
            )));
        }
        let maker = self.calculate_fee(notional, true)?;
        let taker = self.calculate_fee(notional, false)?;
        Ok(maker * maker_ratio + taker * (Decimal::ONE - maker_ratio))
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::okx()
    }
}
