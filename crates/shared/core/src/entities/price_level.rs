use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::values::{Price, Quantity};

/// A single price level in the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        PriceLevel { price, quantity }
    }

    /// Parse a `[price, quantity]` string pair as carried by depth feeds.
    ///
    /// Both fields must parse as non-negative decimals.
    pub fn parse(price: &str, quantity: &str) -> Result<Self> {
        let price = parse_non_negative("price", price)?;
        let quantity = parse_non_negative("quantity", quantity)?;
        Ok(PriceLevel { price, quantity })
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Notional value of the full level
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}

impl From<(Price, Quantity)> for PriceLevel {
    fn from((price, quantity): (Price, Quantity)) -> Self {
        PriceLevel { price, quantity }
    }
}

fn parse_non_negative(field: &str, raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::invalid_input(format!("{field} is not a decimal: {raw:?}")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::invalid_input(format!(
            "{field} must be non-negative: {raw:?}"
        )));
    }
    Ok(value)
}
