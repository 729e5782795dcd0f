//! Money and rating calculation using rust_decimal
//!
//! Calculations run on `Decimal`, then convert to `f64` for storage and
//! serialization.

use rust_decimal::prelude::*;

use crate::utils::{AppError, ErrorCode};

/// Money: 2 decimal places, half-up
const MONEY_DECIMAL_PLACES: u32 = 2;

/// Ratings: 1 decimal place, half-up
const RATING_DECIMAL_PLACES: u32 = 1;

/// Maximum allowed price per menu item
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i32 = 9999;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Σ quantity × unit price, rounded to 2 decimal places
pub fn order_total(lines: &[(i32, f64)]) -> f64 {
    let total = lines
        .iter()
        .map(|(quantity, price)| to_decimal(*price) * Decimal::from(*quantity))
        .sum::<Decimal>();
    to_f64(total)
}

/// Mean of the ratings rounded to one fractional digit, 0 without ratings
pub fn average_rating(mean: Option<f64>) -> f64 {
    match mean {
        Some(avg) => to_decimal(avg)
            .round_dp_with_strategy(RATING_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default(),
        None => 0.0,
    }
}

/// Validate and normalize a menu price to 2 decimal places
pub fn normalize_price(price: f64) -> Result<f64, AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("price must be a non-negative number, got {price}"),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("price exceeds maximum allowed ({MAX_PRICE}), got {price}"),
        ));
    }
    Ok(to_f64(to_decimal(price)))
}

pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("quantity must be between 1 and {MAX_QUANTITY}, got {quantity}"),
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: f64) -> Result<(), AppError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::with_message(
            ErrorCode::InvalidRating,
            format!("rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_total_avoids_float_drift() {
        // 3 × 0.1 + 1 × 0.2 would be 0.5000000000000001 in f64
        assert_eq!(order_total(&[(3, 0.1), (1, 0.2)]), 0.5);
        assert_eq!(order_total(&[(2, 12.99), (1, 4.5)]), 30.48);
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn test_average_rating_rounding() {
        assert_eq!(average_rating(Some(4.5)), 4.5);
        assert_eq!(average_rating(Some(13.0 / 3.0)), 4.3);
        assert_eq!(average_rating(Some(4.25)), 4.3);
        assert_eq!(average_rating(None), 0.0);
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price(9.999).unwrap(), 10.0);
        assert_eq!(normalize_price(0.0).unwrap(), 0.0);
        assert_eq!(normalize_price(-1.0).unwrap_err().code, ErrorCode::InvalidPrice);
        assert!(normalize_price(f64::NAN).is_err());
        assert!(normalize_price(MAX_PRICE + 1.0).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(validate_quantity(0).unwrap_err().code, ErrorCode::InvalidQuantity);
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1.0).is_ok());
        assert!(validate_rating(3.5).is_ok());
        assert!(validate_rating(5.0).is_ok());
        assert_eq!(validate_rating(0.5).unwrap_err().code, ErrorCode::InvalidRating);
        assert!(validate_rating(5.1).is_err());
    }
}
