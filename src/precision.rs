//! Precision settings for exact decimal conversions

use rust_decimal::{Decimal, RoundingStrategy};

/// How many significant digits a decimal result keeps and how it is rounded
///
/// This only affects [`Number::Decimal`](crate::Number::Decimal) values.
/// [`Precision::UNLIMITED`] keeps everything the 96 bit decimal mantissa can
/// hold (28 digits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    digits: u32,
    rounding: RoundingStrategy,
}

impl Precision {
    /// Maximum number of significant digits of a decimal
    pub const MAX_DIGITS: u32 = 28;

    /// No rounding other than the decimal representation limit
    pub const UNLIMITED: Self = Self {
        digits: 0,
        rounding: RoundingStrategy::MidpointNearestEven,
    };
    /// 7 digits, half even
    pub const DECIMAL32: Self = Self::new(7);
    /// 16 digits, half even
    pub const DECIMAL64: Self = Self::new(16);

    /// Round to `digits` significant digits, ties to even
    ///
    /// `0` means unlimited.
    pub const fn new(digits: u32) -> Self {
        Self {
            digits,
            rounding: RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Change the rounding strategy
    pub const fn with_rounding(self, rounding: RoundingStrategy) -> Self {
        Self { rounding, ..self }
    }

    pub const fn digits(&self) -> u32 {
        self.digits
    }

    pub const fn rounding(&self) -> RoundingStrategy {
        self.rounding
    }

    pub const fn is_unlimited(&self) -> bool {
        self.digits == 0 || self.digits >= Self::MAX_DIGITS
    }

    /// Rounds a value to this precision
    ///
    /// Trailing zeros of the input are kept when no rounding is needed, so
    /// `1.10` stays `1.10`.
    pub fn round(&self, value: Decimal) -> Decimal {
        if self.is_unlimited() {
            return value;
        }
        value
            .round_sf_with_strategy(self.digits, self.rounding)
            .unwrap_or(value)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_significant_digits() {
        assert_eq!(Precision::new(3).round(dec!(1.23456)), dec!(1.23));
        assert_eq!(Precision::new(2).round(dec!(12345)), dec!(12000));
        assert_eq!(Precision::new(3).round(dec!(0.0012345)), dec!(0.00123));
    }

    #[test]
    fn unlimited_keeps_value() {
        let v = dec!(1.2345678901234567890123456789);
        assert_eq!(Precision::UNLIMITED.round(v), v);
        assert_eq!(Precision::new(40).round(v), v);
    }

    #[test]
    fn does_not_drop_requested_digits() {
        let v = dec!(1.10);
        let r = Precision::new(10).round(v);
        assert_eq!(r, v);
    }

    #[test]
    fn strategy() {
        let p = Precision::new(1).with_rounding(RoundingStrategy::ToZero);
        assert_eq!(p.round(dec!(1.9)), dec!(1));
        assert_eq!(Precision::new(1).round(dec!(2.5)), dec!(2));
    }
}
