mod fee;
mod price_level;
mod side;
mod snapshot;

pub use fee::{FeeSchedule, FeeTier};
pub use price_level::PriceLevel;
pub use side::Side;
pub use snapshot::OrderBookSnapshot;
