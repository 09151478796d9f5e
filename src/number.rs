//! Numeric representations of quantity values

use std::{cmp::Ordering, fmt::Display};

use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{converter::Converter, precision::Precision};

/// A numeric value in one of the supported representations
///
/// The representation is chosen by the type of the raw value ([`From`]
/// implementations) and preserved by arithmetic where no information would
/// be lost. Mixing representations promotes to the more general one:
/// - integers (`Int` < `Long`) overflow into [`Number::Decimal`]
/// - integers mixed with floats become [`Number::Double`]
/// - anything mixed with a decimal becomes [`Number::Decimal`]
///
/// Equality is strict: `Int(1) != Long(1)`. Use [`Number::compare`] to
/// compare across representations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Number {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
}

/// Representation of a [`Number`], ordered from narrow to general
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NumberKind {
    Int,
    Long,
    Float,
    Double,
    Decimal,
}

impl NumberKind {
    /// `Int` or `Long`
    pub fn is_integral(self) -> bool {
        matches!(self, Self::Int | Self::Long)
    }

    /// Exact representations: integers and decimals
    pub fn is_exact(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }

    /// Representation of the result of combining two numbers
    fn common(self, other: Self) -> Self {
        use NumberKind::*;
        match (self, other) {
            (Decimal, _) | (_, Decimal) => Decimal,
            (Int, Int) => Int,
            (Int | Long, Int | Long) => Long,
            (Float, Float) => Float,
            _ => Double,
        }
    }
}

/// A value does not fit in the requested representation
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Arithmetic overflow: {value} does not fit in {target}")]
pub struct ArithmeticOverflow {
    pub value: String,
    pub target: NumberKind,
}

impl ArithmeticOverflow {
    pub(crate) fn new(value: impl Display, target: NumberKind) -> Self {
        Self {
            value: value.to_string(),
            target,
        }
    }
}

/// Errors from [`Number`] arithmetic
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error(transparent)]
    Overflow(#[from] ArithmeticOverflow),

    #[error("Division by zero")]
    DivisionByZero,
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
        }
    }
}

impl Number {
    /// The representation of this number
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Int(_) => NumberKind::Int,
            Number::Long(_) => NumberKind::Long,
            Number::Float(_) => NumberKind::Float,
            Number::Double(_) => NumberKind::Double,
            Number::Decimal(_) => NumberKind::Decimal,
        }
    }

    /// Value as a float, may lose precision
    pub fn to_f64(&self) -> f64 {
        match *self {
            Number::Int(n) => f64::from(n),
            Number::Long(n) => n as f64,
            Number::Float(n) => f64::from(n),
            Number::Double(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Value as a decimal
    ///
    /// Fails for non finite floats or floats out of the decimal range.
    pub fn to_decimal(&self) -> Result<Decimal, ArithmeticOverflow> {
        match *self {
            Number::Int(n) => Ok(Decimal::from(n)),
            Number::Long(n) => Ok(Decimal::from(n)),
            Number::Float(n) => Decimal::from_f32(n)
                .ok_or_else(|| ArithmeticOverflow::new(n, NumberKind::Decimal)),
            Number::Double(n) => Decimal::from_f64(n)
                .ok_or_else(|| ArithmeticOverflow::new(n, NumberKind::Decimal)),
            Number::Decimal(d) => Ok(d),
        }
    }

    /// Value as a 64 bit integer
    ///
    /// The fractional part is discarded. Values out of range are an error,
    /// never wrapped or saturated.
    pub fn to_i64(&self) -> Result<i64, ArithmeticOverflow> {
        let overflow = || ArithmeticOverflow::new(self, NumberKind::Long);
        match *self {
            Number::Int(n) => Ok(i64::from(n)),
            Number::Long(n) => Ok(n),
            Number::Float(_) | Number::Double(_) => {
                let v = self.to_f64().trunc();
                // i64::MAX is not representable, 2^63 is the first value out
                const LIMIT: f64 = 9_223_372_036_854_775_808.0;
                if v.is_finite() && (-LIMIT..LIMIT).contains(&v) {
                    Ok(v as i64)
                } else {
                    Err(overflow())
                }
            }
            Number::Decimal(d) => d.trunc().to_i64().ok_or_else(overflow),
        }
    }

    /// Value as a 32 bit integer
    ///
    /// Same rules as [`Number::to_i64`].
    pub fn to_i32(&self) -> Result<i32, ArithmeticOverflow> {
        let n = self
            .to_i64()
            .map_err(|_| ArithmeticOverflow::new(self, NumberKind::Int))?;
        i32::try_from(n).map_err(|_| ArithmeticOverflow::new(self, NumberKind::Int))
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Int(n) => n == 0,
            Number::Long(n) => n == 0,
            Number::Float(n) => n == 0.0,
            Number::Double(n) => n == 0.0,
            Number::Decimal(d) => d.is_zero(),
        }
    }

    pub fn is_sign_negative(&self) -> bool {
        match *self {
            Number::Int(n) => n < 0,
            Number::Long(n) => n < 0,
            Number::Float(n) => n < 0.0,
            Number::Double(n) => n < 0.0,
            Number::Decimal(d) => d.is_sign_negative() && !d.is_zero(),
        }
    }

    /// Converts to another representation
    pub fn to_kind(&self, kind: NumberKind) -> Result<Number, ArithmeticOverflow> {
        let n = match kind {
            NumberKind::Int => Number::Int(self.to_i32()?),
            NumberKind::Long => Number::Long(self.to_i64()?),
            NumberKind::Float => Number::Float(self.to_f64() as f32),
            NumberKind::Double => Number::Double(self.to_f64()),
            NumberKind::Decimal => Number::Decimal(self.to_decimal()?),
        };
        Ok(n)
    }

    /// `-self`, integers at the bottom of their range are promoted
    pub fn negate(&self) -> Number {
        match *self {
            Number::Int(n) => n
                .checked_neg()
                .map_or_else(|| Number::Long(-i64::from(n)), Number::Int),
            Number::Long(n) => match n.checked_neg() {
                Some(n) => Number::Long(n),
                None => Number::Decimal(-Decimal::from(n)),
            },
            Number::Float(n) => Number::Float(-n),
            Number::Double(n) => Number::Double(-n),
            Number::Decimal(d) => Number::Decimal(-d),
        }
    }

    pub fn abs(&self) -> Number {
        if self.is_sign_negative() {
            self.negate()
        } else {
            *self
        }
    }

    pub fn add(&self, rhs: &Number) -> Result<Number, ArithmeticOverflow> {
        self.binary(rhs, Op::Add)
    }

    pub fn sub(&self, rhs: &Number) -> Result<Number, ArithmeticOverflow> {
        self.binary(rhs, Op::Sub)
    }

    pub fn mul(&self, rhs: &Number) -> Result<Number, ArithmeticOverflow> {
        self.binary(rhs, Op::Mul)
    }

    /// Division
    ///
    /// Integer division that is not exact produces a decimal. Exact
    /// representations fail on a zero divisor, floats follow IEEE 754.
    pub fn div(&self, rhs: &Number) -> Result<Number, ArithmeticError> {
        let kind = self.kind().common(rhs.kind());
        let kind = self.float_fallback(rhs, kind);
        let n = match kind {
            NumberKind::Int | NumberKind::Long => {
                let (a, b) = (self.to_i64()?, rhs.to_i64()?);
                if b == 0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                match (a.checked_rem(b), a.checked_div(b)) {
                    (Some(0), Some(q)) => Self::integral(q, kind),
                    _ => Self::decimal_div(Decimal::from(a), Decimal::from(b))?,
                }
            }
            NumberKind::Decimal => Self::decimal_div(self.to_decimal()?, rhs.to_decimal()?)?,
            NumberKind::Float => Number::Float(self.to_f64() as f32 / rhs.to_f64() as f32),
            NumberKind::Double => Number::Double(self.to_f64() / rhs.to_f64()),
        };
        Ok(n)
    }

    /// `1 / self`
    ///
    /// Exact for decimals, a float for every other representation.
    pub fn inverse(&self) -> Result<Number, ArithmeticError> {
        match *self {
            Number::Decimal(d) => Self::decimal_div(Decimal::ONE, d),
            Number::Float(n) => Ok(Number::Float(1.0 / n)),
            _ => Ok(Number::Double(1.0 / self.to_f64())),
        }
    }

    /// Compares the numeric values regardless of representation
    ///
    /// Returns [`None`] when one of the values is NaN.
    pub fn compare(&self, rhs: &Number) -> Option<Ordering> {
        let kind = self.kind().common(rhs.kind());
        match self.float_fallback(rhs, kind) {
            NumberKind::Int | NumberKind::Long => {
                Some(self.to_i64().ok()?.cmp(&rhs.to_i64().ok()?))
            }
            NumberKind::Decimal => Some(self.to_decimal().ok()?.cmp(&rhs.to_decimal().ok()?)),
            NumberKind::Float | NumberKind::Double => self.to_f64().partial_cmp(&rhs.to_f64()),
        }
    }

    /// Applies a converter keeping the representation family when possible
    ///
    /// - Decimals use the exact decimal path of the converter and are
    ///   rounded to `precision`.
    /// - Integers stay integers under exact rational converters when the
    ///   result is integral, otherwise they become decimals. Other converters
    ///   produce a [`Number::Double`].
    /// - Floats stay in the same float type.
    pub fn convert(
        &self,
        converter: &Converter,
        precision: Precision,
    ) -> Result<Number, ArithmeticOverflow> {
        if converter.is_identity() {
            return Ok(*self);
        }
        let n = match *self {
            Number::Decimal(d) => Number::Decimal(converter.convert_decimal(d, precision)?),
            Number::Int(_) | Number::Long(_) => {
                let v = self.to_i64()?;
                // an integer has no scale to keep
                let exact = || {
                    converter
                        .convert_decimal(Decimal::from(v), precision)
                        .map(|d| Number::Decimal(d.normalize()))
                };
                match converter.as_rational() {
                    Some((dividend, divisor)) => {
                        let scaled = i128::from(v) * i128::from(dividend);
                        let divisor = i128::from(divisor);
                        if scaled % divisor == 0 {
                            match i64::try_from(scaled / divisor) {
                                Ok(q) => Self::integral(q, self.kind()),
                                Err(_) => exact()?,
                            }
                        } else {
                            exact()?
                        }
                    }
                    None => Number::Double(converter.convert(v as f64)),
                }
            }
            Number::Float(n) => Number::Float(converter.convert(f64::from(n)) as f32),
            Number::Double(n) => Number::Double(converter.convert(n)),
        };
        Ok(n)
    }

    fn binary(&self, rhs: &Number, op: Op) -> Result<Number, ArithmeticOverflow> {
        let kind = self.kind().common(rhs.kind());
        let kind = self.float_fallback(rhs, kind);
        let n = match kind {
            NumberKind::Int | NumberKind::Long => {
                let (a, b) = (self.to_i64()?, rhs.to_i64()?);
                let r = match op {
                    Op::Add => a.checked_add(b),
                    Op::Sub => a.checked_sub(b),
                    Op::Mul => a.checked_mul(b),
                };
                match r {
                    Some(r) => Self::integral(r, kind),
                    None => Self::decimal_op(Decimal::from(a), Decimal::from(b), op)?,
                }
            }
            NumberKind::Decimal => Self::decimal_op(self.to_decimal()?, rhs.to_decimal()?, op)?,
            NumberKind::Float => {
                let (a, b) = (self.to_f64() as f32, rhs.to_f64() as f32);
                Number::Float(match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                })
            }
            NumberKind::Double => {
                let (a, b) = (self.to_f64(), rhs.to_f64());
                Number::Double(match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                })
            }
        };
        Ok(n)
    }

    /// Decimals can't hold NaN, infinities or floats beyond their range,
    /// keep operating on floats then
    fn float_fallback(&self, rhs: &Number, kind: NumberKind) -> NumberKind {
        let not_decimal = |n: &Number| {
            matches!(n, Number::Float(_) | Number::Double(_)) && n.to_decimal().is_err()
        };
        if kind == NumberKind::Decimal && (not_decimal(self) || not_decimal(rhs)) {
            NumberKind::Double
        } else {
            kind
        }
    }

    /// Narrowest integral representation not smaller than `kind`
    fn integral(n: i64, kind: NumberKind) -> Number {
        match (kind, i32::try_from(n)) {
            (NumberKind::Int, Ok(n)) => Number::Int(n),
            _ => Number::Long(n),
        }
    }

    fn decimal_op(a: Decimal, b: Decimal, op: Op) -> Result<Number, ArithmeticOverflow> {
        let r = match op {
            Op::Add => a.checked_add(b),
            Op::Sub => a.checked_sub(b),
            Op::Mul => a.checked_mul(b),
        };
        r.map(Number::Decimal)
            .ok_or_else(|| {
                ArithmeticOverflow::new(
                    format_args!("{a} {} {b}", op.symbol()),
                    NumberKind::Decimal,
                )
            })
    }

    fn decimal_div(a: Decimal, b: Decimal) -> Result<Number, ArithmeticError> {
        if b.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        a.checked_div(b)
            .map(|d| Number::Decimal(d.normalize()))
            .ok_or_else(|| ArithmeticOverflow::new(format_args!("{a} / {b}"), NumberKind::Decimal).into())
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Long(a), Number::Long(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Double(a), Number::Double(b)) => a == b,
            (Number::Decimal(a), Number::Decimal(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(n) => n.fmt(f),
            Number::Long(n) => n.fmt(f),
            Number::Float(n) => n.fmt(f),
            Number::Double(n) => n.fmt(f),
            Number::Decimal(n) => n.fmt(f),
        }
    }
}

macro_rules! from_primitive {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

from_primitive! {
    i8 => Int,
    i16 => Int,
    i32 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Long,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(Number::Int(1), Number::Int(2) => Number::Int(3) ; "int")]
    #[test_case(Number::Int(i32::MAX), Number::Int(1) => Number::Long(i64::from(i32::MAX) + 1) ; "int overflow promotes")]
    #[test_case(Number::Long(i64::MAX), Number::Int(1) => Number::Decimal(Decimal::from(i64::MAX) + Decimal::ONE) ; "long overflow promotes")]
    #[test_case(Number::Int(1), Number::Decimal(dec!(0.5)) => Number::Decimal(dec!(1.5)) ; "int decimal")]
    #[test_case(Number::Int(1), Number::Float(0.5) => Number::Double(1.5) ; "int float")]
    #[test_case(Number::Float(1.0), Number::Float(0.5) => Number::Float(1.5) ; "float")]
    #[test_case(Number::Double(1.0), Number::Float(0.5) => Number::Double(1.5) ; "double float")]
    #[test_case(Number::Double(f64::INFINITY), Number::Decimal(dec!(1)) => Number::Double(f64::INFINITY) ; "infinite decimal")]
    #[test_case(Number::Double(1e30), Number::Decimal(dec!(1)) => Number::Double(1e30) ; "double beyond decimal range")]
    fn add(a: Number, b: Number) -> Number {
        a.add(&b).unwrap()
    }

    #[test_case(Number::Int(6), Number::Int(3) => Number::Int(2) ; "exact")]
    #[test_case(Number::Int(1), Number::Int(4) => Number::Decimal(dec!(0.25)) ; "inexact int")]
    #[test_case(Number::Long(1), Number::Double(4.0) => Number::Double(0.25) ; "double")]
    #[test_case(Number::Decimal(dec!(1)), Number::Int(8) => Number::Decimal(dec!(0.125)) ; "decimal")]
    fn div(a: Number, b: Number) -> Number {
        a.div(&b).unwrap()
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            Number::Int(1).div(&Number::Int(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            Number::Decimal(dec!(0)).inverse(),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            Number::Decimal(dec!(1)).div(&Number::Long(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        let Number::Double(inf) = Number::Double(1.0).div(&Number::Int(0)).unwrap() else {
            panic!("expected a double");
        };
        assert!(inf.is_infinite());
    }

    #[test]
    fn decimal_overflow() {
        let max = Number::Decimal(Decimal::MAX);
        assert!(matches!(
            max.add(&max),
            Err(ArithmeticOverflow {
                target: NumberKind::Decimal,
                ..
            })
        ));
    }

    #[test]
    fn inverse() {
        assert_eq!(Number::Int(4).inverse().unwrap(), Number::Double(0.25));
        assert_eq!(
            Number::Decimal(dec!(4)).inverse().unwrap(),
            Number::Decimal(dec!(0.25))
        );
        assert_eq!(Number::Float(2.0).inverse().unwrap(), Number::Float(0.5));
    }

    #[test]
    fn narrowing() {
        assert_eq!(Number::Long(5).to_i32(), Ok(5));
        assert_eq!(Number::Double(-3.9).to_i64(), Ok(-3));
        assert!(Number::Long(i64::from(i32::MAX) + 1).to_i32().is_err());
        assert!(Number::Double(1e19).to_i64().is_err());
        assert!(Number::Double(f64::NAN).to_i64().is_err());
        assert!(Number::Decimal(dec!(100000000000000000000)).to_i64().is_err());
        let err = Number::Double(3e9).to_i32().unwrap_err();
        assert_eq!(err.target, NumberKind::Int);
    }

    #[test]
    fn strict_equality() {
        assert_eq!(Number::Int(1), Number::Int(1));
        assert_ne!(Number::Int(1), Number::Long(1));
        assert_ne!(Number::Double(1.0), Number::Decimal(dec!(1)));
        assert_eq!(
            Number::Int(1).compare(&Number::Decimal(dec!(1.0))),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Number::Long(2).compare(&Number::Double(1.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(Number::Double(f64::NAN).compare(&Number::Int(1)), None);
    }

    #[test]
    fn compare_beyond_decimal_range() {
        assert_eq!(
            Number::Double(1e30).compare(&Number::Decimal(dec!(1))),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::Decimal(Decimal::MAX).compare(&Number::Float(-1e30)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn negate() {
        assert_eq!(
            Number::Int(i32::MIN).negate(),
            Number::Long(-i64::from(i32::MIN))
        );
        assert_eq!(Number::Int(-2).abs(), Number::Int(2));
    }

    #[test]
    fn from_primitive() {
        assert_eq!(Number::from(1_u8).kind(), NumberKind::Int);
        assert_eq!(Number::from(1_i64).kind(), NumberKind::Long);
        assert_eq!(Number::from(1.0_f32).kind(), NumberKind::Float);
        assert_eq!(Number::from(dec!(1)).kind(), NumberKind::Decimal);
        assert_eq!("decimal".parse::<NumberKind>(), Ok(NumberKind::Decimal));
    }

    #[test]
    fn serde() {
        let n = Number::Decimal(dec!(1.10));
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"type":"decimal","value":"1.10"}"#);
        assert_eq!(serde_json::from_str::<Number>(&json).unwrap(), n);
    }
}
