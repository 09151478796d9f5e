//! Dimensional models
//!
//! A [`DimensionalModel`] decides when two different dimensions still
//! describe the same physical thing. The [`StandardModel`] never does that,
//! every dimension is only compatible with itself. A [`MappedModel`] can
//! rewrite fundamental dimensions into others, for example the
//! [relativistic](MappedModel::relativistic) model measures lengths in
//! seconds.
//!
//! There is no process wide model. Conversions that need one take it as an
//! argument, like [`Unit::converter_to_in`](crate::Unit::converter_to_in),
//! and the rest use [`StandardModel`].

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{converter::Converter, dimension::Dimension, error::NonLinearConverter};

mod builder;
pub mod model_file;

pub use builder::{ModelBuilder, ModelBuilderError};
pub use model_file::ModelFile;

/// Strategy to reduce dimensions to fundamental ones
///
/// Implementors only need to say what a single fundamental symbol maps to.
/// The provided methods handle products of symbols.
pub trait DimensionalModel: Debug + Send + Sync {
    /// Dimension a fundamental symbol is rewritten into
    ///
    /// `None` means the symbol is already fundamental in this model.
    fn fundamental_of(&self, symbol: &str) -> Option<Dimension> {
        let _ = symbol;
        None
    }

    /// Converter from the system unit of `symbol` to the system unit of
    /// [`Self::fundamental_of`]
    fn transform_of(&self, symbol: &str) -> Converter {
        let _ = symbol;
        Converter::Identity
    }

    /// Rewrites `dimension` as a product of fundamental dimensions
    fn fundamental_dimension(&self, dimension: &Dimension) -> Dimension {
        dimension
            .factors()
            .fold(Dimension::NONE, |acc, (symbol, exp)| {
                let fundamental = match self.fundamental_of(symbol) {
                    Some(d) => self.fundamental_dimension(&d),
                    None => Dimension::fundamental(symbol),
                };
                acc.multiply(&fundamental.raise(exp))
            })
    }

    /// Converter from the system unit of `dimension` to the system unit of
    /// its fundamental dimension
    ///
    /// Every transform in the chain must be linear.
    #[tracing::instrument(level = "trace", skip_all, fields(dimension = %dimension), ret)]
    fn dimensional_transform(&self, dimension: &Dimension) -> Result<Converter, NonLinearConverter> {
        let mut converter = Converter::Identity;
        for (symbol, exp) in dimension.factors() {
            let transform = match self.fundamental_of(symbol) {
                Some(d) => self
                    .transform_of(symbol)
                    .concatenate(&self.dimensional_transform(&d)?),
                None => self.transform_of(symbol),
            };
            if !transform.is_linear() {
                return Err(NonLinearConverter {
                    converter: transform,
                    context: "in a dimensional transform",
                });
            }
            converter = converter.concatenate(&transform.pow(exp)?);
        }
        Ok(converter)
    }
}

/// Every dimension is its own fundamental dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardModel;

impl DimensionalModel for StandardModel {}

/// Where a fundamental symbol goes in a [`MappedModel`]
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub dimension: Dimension,
    /// Linear converter from the mapped symbol's system unit
    pub converter: Converter,
}

/// A model that rewrites some fundamental symbols into other dimensions
///
/// Build it with a [`ModelBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedModel {
    mappings: HashMap<Arc<str>, Mapping>,
}

impl MappedModel {
    /// Speed of light in m/s
    pub const SPEED_OF_LIGHT: i64 = 299_792_458;

    pub(crate) fn new(mappings: HashMap<Arc<str>, Mapping>) -> Self {
        Self { mappings }
    }

    /// `[L]` is rewritten as `[T]`, one metre is `1/299792458` seconds
    pub fn relativistic() -> Self {
        let mut mappings = HashMap::new();
        mappings.insert(
            Arc::from("L"),
            Mapping {
                dimension: Dimension::fundamental("T"),
                converter: Converter::Rational {
                    dividend: 1,
                    divisor: Self::SPEED_OF_LIGHT,
                },
            },
        );
        Self { mappings }
    }

    /// Mapping of a symbol, if any
    pub fn mapping(&self, symbol: &str) -> Option<&Mapping> {
        self.mappings.get(symbol)
    }

    /// Mapped symbols
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.mappings.keys().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl DimensionalModel for MappedModel {
    fn fundamental_of(&self, symbol: &str) -> Option<Dimension> {
        self.mappings.get(symbol).map(|m| m.dimension.clone())
    }

    fn transform_of(&self, symbol: &str) -> Converter {
        self.mappings
            .get(symbol)
            .map(|m| m.converter.clone())
            .unwrap_or(Converter::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exponent::Exponent;

    fn speed() -> Dimension {
        Dimension::from_factors([("L", 1), ("T", -1)])
    }

    #[test]
    fn standard_is_identity() {
        let d = speed();
        assert_eq!(StandardModel.fundamental_dimension(&d), d);
        assert_eq!(
            StandardModel.dimensional_transform(&d).unwrap(),
            Converter::Identity
        );
    }

    #[test]
    fn relativistic_speed_is_dimensionless() {
        let model = MappedModel::relativistic();
        assert_eq!(model.fundamental_dimension(&speed()), Dimension::NONE);
        let area = Dimension::fundamental("L").pow(2).unwrap();
        assert_eq!(
            model.fundamental_dimension(&area),
            Dimension::from_factors([("T", Exponent::integer(2))])
        );
    }

    #[test]
    fn transform_raises_to_exponent() {
        let model = MappedModel::relativistic();
        let c = model.dimensional_transform(&speed()).unwrap();
        assert_eq!(c.as_rational(), Some((1, MappedModel::SPEED_OF_LIGHT)));

        let inverse_length = Dimension::fundamental("L").inverse();
        let c = model.dimensional_transform(&inverse_length).unwrap();
        assert_eq!(c.as_rational(), Some((MappedModel::SPEED_OF_LIGHT, 1)));
    }

    #[test]
    fn non_linear_transform_fails() {
        let mut mappings = HashMap::new();
        mappings.insert(
            Arc::from("Θ"),
            Mapping {
                dimension: Dimension::fundamental("E"),
                converter: Converter::add(1.0),
            },
        );
        let model = MappedModel::new(mappings);
        let err = model
            .dimensional_transform(&Dimension::fundamental("Θ"))
            .unwrap_err();
        assert_eq!(err.converter, Converter::add(1.0));
    }
}
