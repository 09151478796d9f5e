//! Units of measurement and quantities.
//!
//! The core is an algebra of [`Unit`]s: base units with a [`Dimension`],
//! units transformed with a [`Converter`], alternate names for system units,
//! products in canonical form and annotated units. On top of it, a
//! [`Quantity`] pairs a [`Number`] with a unit and a compile time [`Kind`].
//!
//! Also includes:
//! - Exact conversions with rational converters and decimal values.
//! - Checked narrowing of converted values.
//! - Pluggable [dimensional models](model) to relate different dimensions.
//!
//! # Basic usage
//! Define base units and derive the rest with the combinators:
//!
//! ```rust
//! # use measures::{Converter, Dimension, Quantity, Unit};
//! let metre = Unit::base("m", Dimension::fundamental("L"));
//! let second = Unit::base("s", Dimension::fundamental("T"));
//!
//! let km = metre.transform_as(&Converter::rational(1000, 1)?, "km");
//! let hour = second.transform_as(&Converter::rational(3600, 1)?, "h");
//! let kph = km.divide(&hour);
//!
//! let speed = Quantity::new(36, kph).to(&metre.divide(&second))?;
//! assert_eq!(speed.to_string(), "10 m·s^-1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Units that can't be reconciled fail to convert:
//!
//! ```rust
//! # use measures::{Dimension, Unit};
//! let metre = Unit::base("m", Dimension::fundamental("L"));
//! let second = Unit::base("s", Dimension::fundamental("T"));
//! assert!(metre.converter_to(&second).is_err());
//! ```
//!
//! Everything is immutable and can be shared between threads.

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

pub mod converter;
pub mod dimension;
pub mod error;
pub mod exponent;
pub mod model;
pub mod number;
pub mod precision;
pub mod quantity;
pub mod unit;

pub use converter::Converter;
pub use dimension::Dimension;
pub use exponent::Exponent;
pub use model::{DimensionalModel, MappedModel, ModelBuilder, StandardModel};
pub use number::{Number, NumberKind};
pub use precision::Precision;
pub use quantity::{Dynamic, Kind, Quantity, QuantityError};
pub use unit::{Element, Unit, UnitKind};
