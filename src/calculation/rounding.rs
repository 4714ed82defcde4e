//! Rupee rounding.

use rust_decimal::Decimal;

/// Rounds to a whole rupee, halves toward positive infinity.
///
/// # Examples
///
/// ```
/// use hospital_payroll::calculation::round_rupees;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_rupees(Decimal::from_str("341.5").unwrap()), Decimal::from(342));
/// assert_eq!(round_rupees(Decimal::from_str("341.49").unwrap()), Decimal::from(341));
/// assert_eq!(round_rupees(Decimal::from_str("-2.5").unwrap()), Decimal::from(-2));
/// ```
pub fn round_rupees(value: Decimal) -> Decimal {
    (value + Decimal::new(5, 1)).floor()
}
