//! Book-walk analytics over a single snapshot
//!
//! Everything here is pure: the processor calls these under its lock, and the
//! cost summary calls them on a cloned snapshot. Prices stay in `Decimal`
//! through the walk and are converted to `f64` only for the final ratio.

use costscope_core::{OrderBookSnapshot, PriceLevel, Quantity, Side};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Ratio returned by [`maker_taker_ratio`] when history carries no signal
pub const NEUTRAL_MAKER_RATIO: f64 = 0.5;

/// Result of greedily consuming levels in order until the quantity is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookWalk {
    pub filled: Quantity,
    pub notional: Decimal,
    /// Quantity the visible depth could not absorb
    pub remaining: Quantity,
}

impl BookWalk {
    pub fn is_complete(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }
}

/// Walk `levels` in order, or `None` if a running total leaves the decimal range
pub fn walk(levels: &[PriceLevel], quantity: Quantity) -> Option<BookWalk> {
    let mut filled = Decimal::ZERO;
    let mut notional = Decimal::ZERO;
    let mut remaining = quantity;

    for level in levels {
        if remaining <= Decimal::ZERO {
            break;
        }
        let executed = remaining.min(level.quantity);
        notional = notional.checked_add(level.price.checked_mul(executed)?)?;
        filled = filled.checked_add(executed)?;
        remaining = remaining.checked_sub(executed)?;
    }

    Some(BookWalk {
        filled,
        notional,
        remaining,
    })
}

/// Total notional of `levels`, or `None` if any walk over them could overflow.
///
/// A side that passes this check can be walked for any quantity, and its
/// best price can be doubled by [`single_side_mid_proxy`].
pub fn checked_depth_notional(levels: &[PriceLevel]) -> Option<Decimal> {
    if let Some(best) = levels.first() {
        best.price.checked_add(best.price)?;
    }
    let mut quantity = Decimal::ZERO;
    let mut notional = Decimal::ZERO;
    for level in levels {
        quantity = quantity.checked_add(level.quantity)?;
        notional = notional.checked_add(level.price.checked_mul(level.quantity)?)?;
    }
    Some(notional)
}

/// Single-side best-price proxy for mid.
///
/// Averages the best level of the queried side with itself, so the result is
/// that side's best price; the opposite side is never consulted. Impact and
/// slippage are therefore measured against the touch, not the true mid.
///
/// `None` for an empty side or a best price too large to double.
pub fn single_side_mid_proxy(levels: &[PriceLevel]) -> Option<Decimal> {
    let best = levels.first()?;
    best.price
        .checked_add(best.price)
        .map(|sum| sum / Decimal::TWO)
}

/// `|avg − mid| / mid` for the filled part of a walk.
///
/// 0 when the side is empty, the quantity is non-positive or nothing fills.
/// A book whose totals leave the decimal range also yields 0.
pub fn market_impact(snapshot: &OrderBookSnapshot, quantity: Quantity, side: Side) -> f64 {
    let levels = snapshot.levels(side);
    if levels.is_empty() || quantity <= Decimal::ZERO {
        return 0.0;
    }
    let Some(mid) = single_side_mid_proxy(levels) else {
        return 0.0;
    };
    let Some(walk) = walk(levels, quantity) else {
        return 0.0;
    };
    if walk.filled.is_zero() {
        return 0.0;
    }
    match walk.notional.checked_div(walk.filled) {
        Some(average) => relative_distance(average, mid),
        None => 0.0,
    }
}

/// Like [`market_impact`] but averages over the full requested quantity, and
/// returns `+∞` when visible depth cannot fill it.
///
/// 0 when the side is empty or the quantity is non-positive. A book whose
/// totals leave the decimal range cannot be priced and also yields `+∞`.
pub fn slippage(snapshot: &OrderBookSnapshot, quantity: Quantity, side: Side) -> f64 {
    let levels = snapshot.levels(side);
    if levels.is_empty() || quantity <= Decimal::ZERO {
        return 0.0;
    }
    let Some(mid) = single_side_mid_proxy(levels) else {
        return f64::INFINITY;
    };
    let Some(walk) = walk(levels, quantity) else {
        return f64::INFINITY;
    };
    if !walk.is_complete() {
        return f64::INFINITY;
    }
    match walk.notional.checked_div(quantity) {
        Some(average) => relative_distance(average, mid),
        None => f64::INFINITY,
    }
}

/// Share of level price changes that look like passive liquidity.
///
/// Consecutive snapshots are compared level by level up to the shorter side.
/// An ask moving up or a bid moving down counts as maker; any other change
/// counts as taker.
pub fn maker_taker_ratio<'a, I>(history: I) -> f64
where
    I: IntoIterator<Item = &'a OrderBookSnapshot>,
{
    let mut maker = 0usize;
    let mut total = 0usize;
    let mut prev: Option<&OrderBookSnapshot> = None;

    for curr in history {
        if let Some(prev) = prev {
            for (p, c) in prev.asks.iter().zip(&curr.asks) {
                if p.price != c.price {
                    total += 1;
                    if c.price > p.price {
                        maker += 1;
                    }
                }
            }
            for (p, c) in prev.bids.iter().zip(&curr.bids) {
                if p.price != c.price {
                    total += 1;
                    if c.price < p.price {
                        maker += 1;
                    }
                }
            }
        }
        prev = Some(curr);
    }

    if total == 0 {
        NEUTRAL_MAKER_RATIO
    } else {
        maker as f64 / total as f64
    }
}

fn relative_distance(average: Decimal, mid: Decimal) -> f64 {
    if mid.is_zero() {
        return 0.0;
    }
    let exact = average
        .checked_sub(mid)
        .and_then(|diff| diff.abs().checked_div(mid))
        .and_then(|ratio| ratio.to_f64());
    // Ratios beyond the decimal range fall back to float division
    exact.unwrap_or_else(|| {
        let average = average.to_f64().unwrap_or(0.0);
        let mid = mid.to_f64().unwrap_or(0.0);
        if mid == 0.0 {
            0.0
        } else {
            (average - mid).abs() / mid
        }
    })
}
