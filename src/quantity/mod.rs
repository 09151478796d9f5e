//! Quantities: a [`Number`] in a [`Unit`], tagged with a [`Kind`]
//!
//! The kind is a zero sized marker. Operations that keep the kind, like
//! adding two lengths, are checked at compile time. Operations that change
//! it, like dividing a length by a time, return a [`Dynamic`] quantity that
//! can be re-tagged with [`Quantity::as_kind`], checking the dimension at
//! runtime.
//!
//! ```
//! # use measures::{Dimension, Quantity, Unit, quantity::kinds::{Length, Speed}};
//! let metre = Unit::base("m", Dimension::fundamental("L"));
//! let second = Unit::base("s", Dimension::fundamental("T"));
//! let km = metre.scale_rational(1000, 1)?;
//!
//! let a = Quantity::<Length>::of(2, km.clone())?;
//! let b = Quantity::<Length>::of(500, metre.clone())?;
//! let total = a.try_add(&b)?;
//! assert_eq!(total.to_string(), "2.5 m*1000");
//!
//! let t = Quantity::new(10, second);
//! let speed = b.divide(&t)?.as_kind::<Speed>()?;
//! assert_eq!(speed.f64_value(&metre.divide(&Unit::base("s", Dimension::fundamental("T"))))?, 50.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Display},
    marker::PhantomData,
};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    dimension::Dimension,
    error::UnconvertibleUnits,
    model::{DimensionalModel, StandardModel},
    number::{ArithmeticError, ArithmeticOverflow, Number},
    precision::Precision,
    unit::Unit,
};

pub mod kinds;

/// Compile time tag of a [`Quantity`]
///
/// Use [`quantity_kind!`](crate::quantity_kind) to declare new kinds.
pub trait Kind: 'static {
    /// Name used in error messages
    const NAME: &'static str;

    /// Dimension every quantity of this kind has, [`None`] for any
    fn dimension() -> Option<Dimension>;
}

/// The kind of quantities whose kind is not statically known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dynamic;

impl Kind for Dynamic {
    const NAME: &'static str = "dynamic";

    fn dimension() -> Option<Dimension> {
        None
    }
}

/// Declares a new [`Kind`] with its dimension
///
/// ```
/// # use measures::{quantity_kind, Dimension, Quantity, Unit};
/// quantity_kind!(
///     /// Amount of information
///     pub Information => Dimension::fundamental("B")
/// );
/// let bit = Unit::base("bit", Dimension::fundamental("B"));
/// assert!(Quantity::<Information>::of(8, bit).is_ok());
/// ```
#[macro_export]
macro_rules! quantity_kind {
    ($(#[$meta:meta])* $vis:vis $name:ident => $dimension:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::quantity::Kind for $name {
            const NAME: &'static str = stringify!($name);

            fn dimension() -> Option<$crate::Dimension> {
                Some($dimension)
            }
        }
    };
}

/// Errors from [`Quantity`] operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantityError {
    #[error(transparent)]
    Unconvertible(#[from] UnconvertibleUnits),

    #[error(transparent)]
    Overflow(#[from] ArithmeticOverflow),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Expected a {expected} quantity, but '{unit}' has dimension {found}")]
    KindMismatch {
        expected: &'static str,
        unit: Unit,
        found: Dimension,
    },

    #[error("Values can't be compared: {0} and {1}")]
    Incomparable(Number, Number),
}

impl From<ArithmeticError> for QuantityError {
    fn from(value: ArithmeticError) -> Self {
        match value {
            ArithmeticError::Overflow(e) => Self::Overflow(e),
            ArithmeticError::DivisionByZero => Self::DivisionByZero,
        }
    }
}

/// An immutable value in a unit
///
/// Equality is strict: the unit, the numeric representation and the value
/// must be the same. `1 km` is not equal to `1000 m` and `1` is not equal to
/// `1.0`. Use [`Quantity::try_cmp`], [`Quantity::is_equivalent_to`] or
/// [`Quantity::is_close`] to compare what the quantities mean.
pub struct Quantity<K: Kind = Dynamic> {
    value: Number,
    unit: Unit,
    kind: PhantomData<fn() -> K>,
}

impl Quantity<Dynamic> {
    /// New quantity of any kind
    pub fn new(value: impl Into<Number>, unit: Unit) -> Self {
        Self::with_unit(value.into(), unit)
    }
}

impl<K: Kind> Quantity<K> {
    /// New quantity checking that `unit` has the dimension of `K`
    pub fn of(value: impl Into<Number>, unit: Unit) -> Result<Self, QuantityError> {
        check_kind::<K>(&unit)?;
        Ok(Self::with_unit(value.into(), unit))
    }

    fn with_unit(value: Number, unit: Unit) -> Self {
        Self {
            value,
            unit,
            kind: PhantomData,
        }
    }

    pub fn value(&self) -> &Number {
        &self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn into_parts(self) -> (Number, Unit) {
        (self.value, self.unit)
    }

    /// Converts to another unit
    ///
    /// Decimals are not rounded, see [`Self::to_with`].
    pub fn to(&self, unit: &Unit) -> Result<Self, QuantityError> {
        self.convert(unit, Precision::UNLIMITED, &StandardModel)
    }

    /// Converts to another unit rounding decimal values to `precision`
    pub fn to_with(&self, unit: &Unit, precision: Precision) -> Result<Self, QuantityError> {
        self.convert(unit, precision, &StandardModel)
    }

    /// Converts to another unit under a dimensional model
    pub fn to_in(
        &self,
        unit: &Unit,
        model: &dyn DimensionalModel,
    ) -> Result<Self, QuantityError> {
        self.convert(unit, Precision::UNLIMITED, model)
    }

    /// Same as [`Self::to`] but consuming, the quantity is returned as is if
    /// the unit does not change
    pub fn into_unit(self, unit: &Unit) -> Result<Self, QuantityError> {
        if self.unit == *unit {
            return Ok(self);
        }
        self.to(unit)
    }

    #[tracing::instrument(level = "trace", name = "convert", skip_all, fields(from = %self.unit, to = %unit))]
    fn convert(
        &self,
        unit: &Unit,
        precision: Precision,
        model: &dyn DimensionalModel,
    ) -> Result<Self, QuantityError> {
        if self.unit == *unit {
            return Ok(self.clone());
        }
        let converter = self.unit.converter_to_in(unit, model)?;
        let value = self.value.convert(&converter, precision)?;
        Ok(Self::with_unit(value, unit.clone()))
    }

    /// Adds two quantities, the result is in the unit of `self`
    pub fn try_add(&self, rhs: &Self) -> Result<Self, QuantityError> {
        let rhs = rhs.to(&self.unit)?;
        Ok(Self::with_unit(self.value.add(&rhs.value)?, self.unit.clone()))
    }

    /// Subtracts two quantities, the result is in the unit of `self`
    pub fn try_sub(&self, rhs: &Self) -> Result<Self, QuantityError> {
        let rhs = rhs.to(&self.unit)?;
        Ok(Self::with_unit(self.value.sub(&rhs.value)?, self.unit.clone()))
    }

    /// Product of two quantities
    ///
    /// The values are multiplied as they are, no unit is converted.
    pub fn multiply<K2: Kind>(&self, rhs: &Quantity<K2>) -> Result<Quantity, QuantityError> {
        Ok(Quantity::with_unit(
            self.value.mul(&rhs.value)?,
            self.unit.multiply(&rhs.unit),
        ))
    }

    /// Quotient of two quantities
    ///
    /// The values are divided as they are, no unit is converted.
    pub fn divide<K2: Kind>(&self, rhs: &Quantity<K2>) -> Result<Quantity, QuantityError> {
        Ok(Quantity::with_unit(
            self.value.div(&rhs.value)?,
            self.unit.divide(&rhs.unit),
        ))
    }

    /// Scales the value, the unit does not change
    pub fn multiply_by(&self, n: impl Into<Number>) -> Result<Self, QuantityError> {
        Ok(Self::with_unit(
            self.value.mul(&n.into())?,
            self.unit.clone(),
        ))
    }

    /// Scales the value, the unit does not change
    pub fn divide_by(&self, n: impl Into<Number>) -> Result<Self, QuantityError> {
        Ok(Self::with_unit(
            self.value.div(&n.into())?,
            self.unit.clone(),
        ))
    }

    /// `1 / self`, both the value and the unit are inverted
    pub fn inverse(&self) -> Result<Quantity, QuantityError> {
        Ok(Quantity::with_unit(self.value.inverse()?, self.unit.inverse()))
    }

    pub fn negate(&self) -> Self {
        Self::with_unit(self.value.negate(), self.unit.clone())
    }

    pub fn abs(&self) -> Self {
        Self::with_unit(self.value.abs(), self.unit.clone())
    }

    /// Re-tags the quantity checking the dimension of its unit
    pub fn as_kind<K2: Kind>(self) -> Result<Quantity<K2>, QuantityError> {
        check_kind::<K2>(&self.unit)?;
        Ok(Quantity::with_unit(self.value, self.unit))
    }

    /// Drops the static kind
    pub fn into_dynamic(self) -> Quantity {
        Quantity::with_unit(self.value, self.unit)
    }

    /// Compares the values after converting `rhs` to the unit of `self`
    ///
    /// The numeric representations don't need to be the same.
    pub fn try_cmp(&self, rhs: &Self) -> Result<Ordering, QuantityError> {
        let rhs = rhs.to(&self.unit)?;
        self.value
            .compare(&rhs.value)
            .ok_or(QuantityError::Incomparable(self.value, rhs.value))
    }

    /// Whether both quantities are the same amount, maybe in different units
    /// or representations
    pub fn is_equivalent_to(&self, rhs: &Self) -> bool {
        matches!(self.try_cmp(rhs), Ok(Ordering::Equal))
    }

    /// Whether the difference is at most `tolerance`, in the unit of `self`
    pub fn is_close(&self, rhs: &Self, tolerance: f64) -> Result<bool, QuantityError> {
        let rhs = rhs.to(&self.unit)?;
        Ok((self.value.to_f64() - rhs.value.to_f64()).abs() <= tolerance)
    }

    /// Value in `unit` as an `i32`, failing if it does not fit
    pub fn i32_value(&self, unit: &Unit) -> Result<i32, QuantityError> {
        Ok(self.to(unit)?.value.to_i32()?)
    }

    /// Value in `unit` as an `i64`, failing if it does not fit
    pub fn i64_value(&self, unit: &Unit) -> Result<i64, QuantityError> {
        Ok(self.to(unit)?.value.to_i64()?)
    }

    /// Value in `unit` as an `f64`, may lose precision
    pub fn f64_value(&self, unit: &Unit) -> Result<f64, QuantityError> {
        Ok(self.to(unit)?.value.to_f64())
    }

    /// Value in `unit` as a decimal, failing for values a decimal can't hold
    pub fn decimal_value(&self, unit: &Unit) -> Result<Decimal, QuantityError> {
        Ok(self.to(unit)?.value.to_decimal()?)
    }
}

fn check_kind<K: Kind>(unit: &Unit) -> Result<(), QuantityError> {
    match K::dimension() {
        Some(expected) => {
            let found = unit.dimension();
            if found == expected {
                Ok(())
            } else {
                Err(QuantityError::KindMismatch {
                    expected: K::NAME,
                    unit: unit.clone(),
                    found,
                })
            }
        }
        None => Ok(()),
    }
}

impl<K: Kind> Clone for Quantity<K> {
    fn clone(&self) -> Self {
        Self::with_unit(self.value, self.unit.clone())
    }
}

impl<K: Kind> PartialEq for Quantity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value == other.value
    }
}

impl<K: Kind> Debug for Quantity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("value", &self.value)
            .field("unit", &self.unit)
            .field("kind", &K::NAME)
            .finish()
    }
}

impl<K: Kind> Display for Quantity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_one() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
