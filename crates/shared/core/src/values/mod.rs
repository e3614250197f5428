use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
/// Non-negativity is enforced where levels are built from feed strings
pub type Quantity = Decimal;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;
