//! Errors shared by the unit, converter and model layers.
//!
//! Quantity specific errors live in [`crate::quantity`] and numeric ones in
//! [`crate::number`].

use thiserror::Error;

use crate::{converter::Converter, dimension::Dimension, unit::Unit};

/// Programmer errors when building units, dimensions or exponents
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidConstruction {
    #[error("'{unit}' is not a system unit")]
    NotASystemUnit { unit: Unit },

    #[error("Root or exponent of order zero")]
    ZeroOrder,

    #[error("Zero conversion factor")]
    ZeroFactor,

    #[error("Conversion factor out of range")]
    FactorOutOfRange,

    #[error("Exponent out of range")]
    ExponentOutOfRange,
}

/// A converter that had to be linear but is not
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Non-linear converter '{converter}' {context}")]
pub struct NonLinearConverter {
    pub converter: Converter,
    pub context: &'static str,
}

/// Why two units can't be reconciled
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IncommensurableReason {
    #[error("dimension {from} does not match {to}")]
    DimensionMismatch { from: Dimension, to: Dimension },

    #[error(transparent)]
    NonLinear(#[from] NonLinearConverter),
}

/// Error from [`Unit::converter_to_any`] with diagnostic detail
#[derive(Debug, Error, Clone, PartialEq)]
#[error("'{from}' is incommensurable with '{to}': {reason}")]
pub struct IncommensurableUnits {
    pub from: Unit,
    pub to: Unit,
    pub reason: IncommensurableReason,
}

/// Error from [`Unit::converter_to`]
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unconvertible units: '{}' to '{}'", .0.from, .0.to)]
pub struct UnconvertibleUnits(#[source] pub IncommensurableUnits);

impl From<IncommensurableUnits> for UnconvertibleUnits {
    fn from(value: IncommensurableUnits) -> Self {
        Self(value)
    }
}

impl UnconvertibleUnits {
    /// Unit that was being converted
    pub fn from_unit(&self) -> &Unit {
        &self.0.from
    }

    /// Target unit of the conversion
    pub fn to_unit(&self) -> &Unit {
        &self.0.to
    }
}
