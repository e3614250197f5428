//! costscope Core Domain
//!
//! Pure domain types shared by the costscope analytics crates: order book
//! snapshots, the bounded history buffer, the fee ladder and the error
//! taxonomy. This crate contains no locking, no I/O and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod history;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{FeeSchedule, FeeTier, OrderBookSnapshot, PriceLevel, Side};
pub use error::{Error, Result};
pub use history::{BoundedHistory, HISTORY_SIZE};
pub use values::{Price, Quantity, Symbol};
