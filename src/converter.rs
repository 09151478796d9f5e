//! Converter algebra
//!
//! A [`Converter`] is a function that rescales a value from one unit to
//! another. Converters form a small closed set that can be composed with
//! [`Converter::concatenate`] and inverted with [`Converter::inverse`].
//! Composition simplifies eagerly so chains stay short and exact factors stay
//! exact.

use std::{
    f64::consts::E,
    fmt::Display,
    hash::{Hash, Hasher},
    sync::Arc,
};

use rust_decimal::{prelude::FromPrimitive, Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::{
    error::{InvalidConstruction, NonLinearConverter},
    exponent::{gcd_u128, Exponent},
    number::{ArithmeticOverflow, NumberKind},
    precision::Precision,
};

/// A numeric rescaling function with composition and inversion
///
/// Build them with the constructor functions ([`Converter::add`],
/// [`Converter::rational`], ...) instead of the variants directly, those
/// normalize the parameters (an offset of 0 is [`Converter::Identity`],
/// rationals are reduced...).
///
/// Equality compares parameters, not behaviour: `x * 2` as
/// [`Converter::Multiply`] is not equal to `x * 2/1` as
/// [`Converter::Rational`].
///
/// Deserializing goes through the same constructors, so invalid factors are
/// rejected and the result is normalized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Converter {
    /// `x`
    Identity,
    /// `x + offset`
    Add { offset: f64 },
    /// `x * factor` with a float factor
    Multiply { factor: f64 },
    /// `x * dividend / divisor`, exact
    Rational { dividend: i64, divisor: i64 },
    /// `log_base(x)`
    Log { base: f64 },
    /// `base^x`
    Exp { base: f64 },
    /// `then(first(x))`
    Pair {
        first: Arc<Converter>,
        then: Arc<Converter>,
    },
}

impl Converter {
    /// The identity converter
    pub const IDENTITY: Converter = Converter::Identity;

    /// `x + offset`
    pub fn add(offset: f64) -> Self {
        if offset == 0.0 {
            Self::Identity
        } else {
            Self::Add { offset }
        }
    }

    /// `x * factor`
    ///
    /// Integral factors become an exact [`Converter::Rational`]. Fails with
    /// [`InvalidConstruction::ZeroFactor`] for 0 and with
    /// [`InvalidConstruction::FactorOutOfRange`] for NaN or infinities, none
    /// of them can be inverted.
    pub fn multiply(factor: f64) -> Result<Self, InvalidConstruction> {
        if factor == 0.0 {
            return Err(InvalidConstruction::ZeroFactor);
        }
        if !factor.is_finite() {
            return Err(InvalidConstruction::FactorOutOfRange);
        }
        Ok(Self::scaled(factor))
    }

    /// [`Converter::multiply`] for factors derived from valid ones
    fn scaled(factor: f64) -> Self {
        // 2^53, every integer below is exact in a f64
        const EXACT: f64 = 9_007_199_254_740_992.0;
        if factor == 1.0 {
            Self::Identity
        } else if factor.fract() == 0.0 && factor.abs() < EXACT && factor != 0.0 {
            Self::Rational {
                dividend: factor as i64,
                divisor: 1,
            }
        } else {
            Self::Multiply { factor }
        }
    }

    /// `x * dividend / divisor`
    ///
    /// Fails if any of the two is 0, a zero factor can't be inverted, or if
    /// the reduced fraction does not fit, like `i64::MIN / -1`.
    pub fn rational(dividend: i64, divisor: i64) -> Result<Self, InvalidConstruction> {
        if dividend == 0 || divisor == 0 {
            return Err(InvalidConstruction::ZeroFactor);
        }
        Self::rational_reduced(i128::from(dividend), i128::from(divisor))
            .ok_or(InvalidConstruction::FactorOutOfRange)
    }

    /// `x * 10^exponent` as an exact rational
    ///
    /// Fails if the power does not fit in 64 bit integers.
    pub fn power_of_ten(exponent: i32) -> Result<Self, InvalidConstruction> {
        let p = 10_i64
            .checked_pow(exponent.unsigned_abs())
            .ok_or(InvalidConstruction::FactorOutOfRange)?;
        if exponent >= 0 {
            Self::rational(p, 1)
        } else {
            Self::rational(1, p)
        }
    }

    /// `log_base(x)`
    pub fn log(base: f64) -> Self {
        Self::Log { base }
    }

    /// `base^x`
    pub fn exp(base: f64) -> Self {
        Self::Exp { base }
    }

    /// Applies `first` and then `then`, without simplifying
    ///
    /// Identity on any side is removed. Prefer [`Converter::concatenate`].
    pub fn pair(first: Converter, then: Converter) -> Self {
        if first.is_identity() {
            then
        } else if then.is_identity() {
            first
        } else {
            Self::Pair {
                first: Arc::new(first),
                then: Arc::new(then),
            }
        }
    }

    /// Reduced rational or `None` if the reduced value does not fit. `1/1` is
    /// the identity.
    fn rational_reduced(dividend: i128, divisor: i128) -> Option<Self> {
        let g = gcd_u128(dividend.unsigned_abs(), divisor.unsigned_abs()).max(1) as i128;
        let (mut dividend, mut divisor) = (dividend / g, divisor / g);
        if divisor < 0 {
            dividend = -dividend;
            divisor = -divisor;
        }
        if dividend == divisor {
            return Some(Self::Identity);
        }
        Some(Self::Rational {
            dividend: i64::try_from(dividend).ok()?,
            divisor: i64::try_from(divisor).ok()?,
        })
    }

    /// Checks if this converter does nothing
    pub fn is_identity(&self) -> bool {
        match *self {
            Converter::Identity => true,
            Converter::Add { offset } => offset == 0.0,
            Converter::Multiply { factor } => factor == 1.0,
            Converter::Rational { dividend, divisor } => dividend == divisor,
            Converter::Log { .. } | Converter::Exp { .. } => false,
            Converter::Pair { ref first, ref then } => first.is_identity() && then.is_identity(),
        }
    }

    /// Checks if `convert(a + b) == convert(a) + convert(b)` and
    /// `convert(k * a) == k * convert(a)`
    pub fn is_linear(&self) -> bool {
        match self {
            Converter::Identity | Converter::Multiply { .. } | Converter::Rational { .. } => true,
            Converter::Add { .. } | Converter::Log { .. } | Converter::Exp { .. } => {
                self.is_identity()
            }
            Converter::Pair { first, then } => first.is_linear() && then.is_linear(),
        }
    }

    /// The exact `(dividend, divisor)` of this converter, if it is an exact
    /// scale
    pub fn as_rational(&self) -> Option<(i64, i64)> {
        match *self {
            _ if self.is_identity() => Some((1, 1)),
            Converter::Rational { dividend, divisor } => Some((dividend, divisor)),
            _ => None,
        }
    }

    /// The inverse converter
    pub fn inverse(&self) -> Converter {
        match *self {
            Converter::Identity => Converter::Identity,
            Converter::Add { offset } => Converter::add(-offset),
            Converter::Multiply { factor } => Converter::scaled(1.0 / factor),
            Converter::Rational { dividend, divisor } => {
                Self::rational_reduced(i128::from(divisor), i128::from(dividend))
                    .unwrap_or_else(|| Converter::scaled(divisor as f64 / dividend as f64))
            }
            Converter::Log { base } => Converter::Exp { base },
            Converter::Exp { base } => Converter::Log { base },
            Converter::Pair {
                ref first,
                ref then,
            } => Converter::pair(then.inverse(), first.inverse()),
        }
    }

    /// Applies this converter and then `next`
    ///
    /// The result is simplified where possible:
    /// - identity is neutral
    /// - two rationals give a reduced rational
    /// - offsets and float factors are accumulated
    /// - `log_b` followed by `b^x` (and the other way around) cancels
    /// - chains are kept right leaning, merging adjacent converters
    pub fn concatenate(&self, next: &Converter) -> Converter {
        if self.is_identity() {
            return next.clone();
        }
        if next.is_identity() {
            return self.clone();
        }
        if let Some(merged) = self.merge(next) {
            return merged;
        }
        match (self, next) {
            (Converter::Pair { first, then }, _) => first.concatenate(&then.concatenate(next)),
            (_, Converter::Pair { first, then }) => match self.merge(first) {
                Some(merged) => merged.concatenate(then),
                None => Converter::pair(self.clone(), next.clone()),
            },
            _ => Converter::pair(self.clone(), next.clone()),
        }
    }

    /// Simplification of two adjacent non pair converters
    fn merge(&self, next: &Converter) -> Option<Converter> {
        use Converter::*;
        let merged = match (self, next) {
            (Add { offset: a }, Add { offset: b }) => Converter::add(a + b),
            (Multiply { factor: a }, Multiply { factor: b }) => Converter::scaled(a * b),
            (
                Rational {
                    dividend: a,
                    divisor: b,
                },
                Rational {
                    dividend: c,
                    divisor: d,
                },
            ) => {
                let dividend = i128::from(*a) * i128::from(*c);
                let divisor = i128::from(*b) * i128::from(*d);
                Self::rational_reduced(dividend, divisor).unwrap_or_else(|| {
                    Converter::scaled((*a as f64 / *b as f64) * (*c as f64 / *d as f64))
                })
            }
            (Rational { dividend, divisor }, Multiply { factor })
            | (Multiply { factor }, Rational { dividend, divisor }) => {
                Converter::scaled(factor * (*dividend as f64) / (*divisor as f64))
            }
            (Log { base: a }, Exp { base: b }) | (Exp { base: a }, Log { base: b }) if a == b => {
                Identity
            }
            _ => return None,
        };
        Some(merged)
    }

    /// Raises a linear converter to a rational power
    ///
    /// Rationals stay exact when the roots are exact integers.
    pub fn pow(&self, exp: Exponent) -> Result<Converter, NonLinearConverter> {
        if !self.is_linear() {
            return Err(NonLinearConverter {
                converter: self.clone(),
                context: "can't be raised to a power",
            });
        }
        if exp.is_zero() || self.is_identity() {
            return Ok(Converter::Identity);
        }
        if exp.is_one() {
            return Ok(self.clone());
        }
        let c = match *self {
            Converter::Multiply { factor } => Converter::scaled(factor.powf(exp.as_f64())),
            Converter::Rational { dividend, divisor } => {
                let exact = || {
                    let (mut a, mut b) = (dividend, divisor);
                    if exp.pow() < 0 {
                        (a, b) = (b, a);
                    }
                    let n = exp.pow().unsigned_abs();
                    let a = exact_root(a.checked_pow(n)?, exp.root())?;
                    let b = exact_root(b.checked_pow(n)?, exp.root())?;
                    Converter::rational(a, b).ok()
                };
                exact().unwrap_or_else(|| {
                    Converter::scaled((dividend as f64 / divisor as f64).powf(exp.as_f64()))
                })
            }
            Converter::Pair {
                ref first,
                ref then,
            } => first.pow(exp)?.concatenate(&then.pow(exp)?),
            // identity and non linear are handled above
            _ => self.clone(),
        };
        Ok(c)
    }

    /// The sequence of primitive converters applied by this one, in order
    pub fn conversion_steps(&self) -> Vec<&Converter> {
        match self {
            Converter::Pair { first, then } => {
                let mut steps = first.conversion_steps();
                steps.extend(then.conversion_steps());
                steps
            }
            _ => vec![self],
        }
    }

    /// Converts a float value
    pub fn convert(&self, value: f64) -> f64 {
        match *self {
            Converter::Identity => value,
            Converter::Add { offset } => value + offset,
            Converter::Multiply { factor } => value * factor,
            Converter::Rational { dividend, divisor } => {
                value * dividend as f64 / divisor as f64
            }
            Converter::Log { base } => {
                if base == 10.0 {
                    value.log10()
                } else if base == 2.0 {
                    value.log2()
                } else if base == E {
                    value.ln()
                } else {
                    value.log(base)
                }
            }
            Converter::Exp { base } => {
                if base == E {
                    value.exp()
                } else {
                    base.powf(value)
                }
            }
            Converter::Pair {
                ref first,
                ref then,
            } => then.convert(first.convert(value)),
        }
    }

    /// Converts a decimal value rounding the result to `precision`
    ///
    /// Intermediate steps are not rounded. Rationals multiply before
    /// dividing, so exact results stay exact.
    pub fn convert_decimal(
        &self,
        value: Decimal,
        precision: Precision,
    ) -> Result<Decimal, ArithmeticOverflow> {
        Ok(precision.round(self.apply_decimal(value)?))
    }

    fn apply_decimal(&self, value: Decimal) -> Result<Decimal, ArithmeticOverflow> {
        let overflow = || {
            ArithmeticOverflow::new(format_args!("{self} at x = {value}"), NumberKind::Decimal)
        };
        let to_decimal = |f: f64| Decimal::from_f64(f).ok_or_else(overflow);
        let r = match *self {
            Converter::Identity => Some(value),
            Converter::Add { offset } => value.checked_add(to_decimal(offset)?),
            Converter::Multiply { factor } => value.checked_mul(to_decimal(factor)?),
            Converter::Rational { dividend, divisor } => value
                .checked_mul(Decimal::from(dividend))
                .and_then(|v| v.checked_div(Decimal::from(divisor))),
            Converter::Log { base } => {
                if base == 10.0 {
                    value.checked_log10()
                } else if base == E {
                    value.checked_ln()
                } else {
                    let base = to_decimal(base)?;
                    value
                        .checked_ln()
                        .zip(base.checked_ln())
                        .and_then(|(v, b)| v.checked_div(b))
                }
            }
            Converter::Exp { base } => {
                if base == E {
                    value.checked_exp()
                } else {
                    to_decimal(base)?.checked_powd(value)
                }
            }
            Converter::Pair {
                ref first,
                ref then,
            } => Some(then.apply_decimal(first.apply_decimal(value)?)?),
        };
        r.ok_or_else(overflow)
    }

    fn fmt_with(&self, arg: &str) -> String {
        match *self {
            Converter::Identity => arg.to_string(),
            Converter::Add { offset } if offset < 0.0 => format!("{arg} - {}", -offset),
            Converter::Add { offset } => format!("{arg} + {offset}"),
            Converter::Multiply { factor } => format!("{arg} * {factor}"),
            Converter::Rational {
                dividend,
                divisor: 1,
            } => format!("{arg} * {dividend}"),
            Converter::Rational { dividend, divisor } => format!("{arg} * {dividend}/{divisor}"),
            Converter::Log { base } if base == E => format!("ln({arg})"),
            Converter::Log { base } => format!("log{base}({arg})"),
            Converter::Exp { base } if base == E => format!("exp({arg})"),
            Converter::Exp { base } => format!("{base}^{arg}"),
            Converter::Pair {
                ref first,
                ref then,
            } => {
                let inner = first.fmt_with(arg);
                // function call notation doesn't need parentheses
                let call = match **first {
                    Converter::Log { .. } => true,
                    Converter::Exp { base } => base == E,
                    _ => false,
                };
                if call {
                    then.fmt_with(&inner)
                } else {
                    then.fmt_with(&format!("({inner})"))
                }
            }
        }
    }
}

/// Wire form of a [`Converter`], validated through the constructors
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawConverter {
    Identity,
    Add { offset: f64 },
    Multiply { factor: f64 },
    Rational { dividend: i64, divisor: i64 },
    Log { base: f64 },
    Exp { base: f64 },
    Pair { first: Converter, then: Converter },
}

impl TryFrom<RawConverter> for Converter {
    type Error = InvalidConstruction;

    fn try_from(value: RawConverter) -> Result<Self, Self::Error> {
        // log and exp bases must be positive and not 1
        let valid_base = |base: f64| {
            if base.is_finite() && base > 0.0 && base != 1.0 {
                Ok(base)
            } else {
                Err(InvalidConstruction::FactorOutOfRange)
            }
        };
        let c = match value {
            RawConverter::Identity => Converter::Identity,
            RawConverter::Add { offset } if !offset.is_finite() => {
                return Err(InvalidConstruction::FactorOutOfRange)
            }
            RawConverter::Add { offset } => Converter::add(offset),
            RawConverter::Multiply { factor } => Converter::multiply(factor)?,
            RawConverter::Rational { dividend, divisor } => Converter::rational(dividend, divisor)?,
            RawConverter::Log { base } => Converter::log(valid_base(base)?),
            RawConverter::Exp { base } => Converter::exp(valid_base(base)?),
            RawConverter::Pair { first, then } => Converter::pair(first, then),
        };
        Ok(c)
    }
}

impl<'de> Deserialize<'de> for Converter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawConverter::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Exact integer `n`th root
fn exact_root(value: i64, n: u32) -> Option<i64> {
    if n == 1 {
        return Some(value);
    }
    if value < 0 {
        return if n % 2 == 1 {
            exact_root(value.checked_neg()?, n).map(|r| -r)
        } else {
            None
        };
    }
    let guess = (value as f64).powf(1.0 / f64::from(n)).round() as i64;
    (guess.saturating_sub(1)..=guess.saturating_add(1))
        .find(|r| *r >= 0 && r.checked_pow(n) == Some(value))
}

impl Default for Converter {
    fn default() -> Self {
        Self::Identity
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        use Converter::*;
        match (self, other) {
            (Identity, Identity) => true,
            (Add { offset: a }, Add { offset: b }) => a.to_bits() == b.to_bits(),
            (Multiply { factor: a }, Multiply { factor: b }) => a.to_bits() == b.to_bits(),
            (
                Rational {
                    dividend: a,
                    divisor: b,
                },
                Rational {
                    dividend: c,
                    divisor: d,
                },
            ) => i128::from(*a) * i128::from(*d) == i128::from(*c) * i128::from(*b),
            (Log { base: a }, Log { base: b }) | (Exp { base: a }, Exp { base: b }) => {
                a.to_bits() == b.to_bits()
            }
            (
                Pair {
                    first: f1,
                    then: t1,
                },
                Pair {
                    first: f2,
                    then: t2,
                },
            ) => f1 == f2 && t1 == t2,
            _ => false,
        }
    }
}

impl Eq for Converter {}

impl Hash for Converter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match *self {
            Converter::Identity => {}
            Converter::Add { offset: v }
            | Converter::Multiply { factor: v }
            | Converter::Log { base: v }
            | Converter::Exp { base: v } => v.to_bits().hash(state),
            Converter::Rational { dividend, divisor } => {
                // equal rationals may not be reduced the same way
                let g = gcd_u128(
                    u128::from(dividend.unsigned_abs()),
                    u128::from(divisor.unsigned_abs()),
                )
                .max(1) as i128;
                let sign = if divisor < 0 { -1 } else { 1 };
                (sign * i128::from(dividend) / g).hash(state);
                (sign * i128::from(divisor) / g).hash(state);
            }
            Converter::Pair {
                ref first,
                ref then,
            } => {
                first.hash(state);
                then.hash(state);
            }
        }
    }
}

impl Display for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fmt_with("x"))
    }
}
