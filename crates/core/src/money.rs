//! Monetary amounts.
//!
//! Balances, amounts and fees are `rust_decimal::Decimal` values kept at
//! currency precision (two fractional digits). Floating point is never used
//! for money.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Number of fractional digits carried by every stored amount.
pub const CURRENCY_SCALE: u32 = 2;

/// Largest amount a single posting may carry.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Round to currency precision, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` has no more fractional digits than the currency allows.
pub fn is_currency_precise(value: Decimal) -> bool {
    value.normalize().scale() <= CURRENCY_SCALE
}

/// Check that `value` is a postable amount: positive, at most [`MAX_AMOUNT`]
/// and at currency precision.
pub fn validate_amount(value: Decimal) -> DomainResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(DomainError::invalid_amount("amount must be positive"));
    }
    if value > MAX_AMOUNT {
        return Err(DomainError::invalid_amount(format!("amount exceeds {MAX_AMOUNT}")));
    }
    if !is_currency_precise(value) {
        return Err(DomainError::invalid_amount(format!(
            "amount has more than {CURRENCY_SCALE} fractional digits"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_currency(d("1.005")), d("1.01"));
        assert_eq!(round_currency(d("1.004")), d("1.00"));
        assert_eq!(round_currency(d("1.85")), d("1.85"));
    }

    #[test]
    fn validate_amount_accepts_currency_values() {
        assert_eq!(validate_amount(d("150")).unwrap(), d("150"));
        assert_eq!(validate_amount(d("99.50")).unwrap(), d("99.5"));
        assert_eq!(validate_amount(d("0.01")).unwrap(), d("0.01"));
    }

    #[test]
    fn validate_amount_rejects_bad_input() {
        assert!(matches!(validate_amount(d("0")), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(validate_amount(d("-3")), Err(DomainError::InvalidAmount(_))));
        assert!(matches!(validate_amount(d("1.001")), Err(DomainError::InvalidAmount(_))));
    }

    #[test]
    fn validate_amount_caps_single_postings() {
        assert_eq!(validate_amount(MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(matches!(
            validate_amount(MAX_AMOUNT + d("0.01")),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(matches!(validate_amount(Decimal::MAX), Err(DomainError::InvalidAmount(_))));
    }

    proptest! {
        #[test]
        fn rounding_is_idempotent_and_precise(cents in 0i64..10_000_000i64, extra in 0u32..1000u32) {
            let value = Decimal::new(cents * 1000 + i64::from(extra), 5);
            let rounded = round_currency(value);
            prop_assert!(is_currency_precise(rounded));
            prop_assert_eq!(round_currency(rounded), rounded);
        }
    }
}
