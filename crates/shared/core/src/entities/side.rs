use serde::{Deserialize, Serialize};

/// Side of a hypothetical order
///
/// A buy walks the ask side of the book, a sell walks the bid side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}
