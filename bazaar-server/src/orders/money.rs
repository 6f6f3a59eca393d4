//! Money calculation using rust_decimal
//!
//! Prices are stored as `f64`; every calculation converts to `Decimal`,
//! works there, and rounds back to 2 decimal places.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_default()
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price after a percentage discount: `price - price * discount / 100`
///
/// Discounts are clamped to 0..=100 so the result is never negative.
pub fn unit_price(price: f64, discount_percent: f64) -> Decimal {
    let price = to_decimal(price).max(Decimal::ZERO);
    let discount = to_decimal(discount_percent).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    round(price - price * discount / Decimal::ONE_HUNDRED)
}

/// Line subtotal: rounded unit price times quantity
pub fn line_subtotal(unit_price: Decimal, quantity: i64) -> Decimal {
    round(unit_price * Decimal::from(quantity))
}

/// Sum of already-rounded subtotals
pub fn sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    round(values.into_iter().sum())
}
