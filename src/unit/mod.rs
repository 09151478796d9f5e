//! Units of measurement
//!
//! A [`Unit`] is a cheap to clone handle to an immutable [`UnitKind`]. Units
//! are built from [base units](Unit::base) with the combinators in this
//! module and compared structurally.
//!
//! ```
//! # use measures::{Dimension, Unit};
//! let metre = Unit::base("m", Dimension::fundamental("L"));
//! let second = Unit::base("s", Dimension::fundamental("T"));
//! let kilometre = metre.scale_rational(1000, 1).unwrap();
//! let hour = second.scale_rational(3600, 1).unwrap();
//!
//! let kmh = kilometre.divide(&hour);
//! let ms = metre.divide(&second);
//! let c = kmh.converter_to(&ms).unwrap();
//! assert_eq!(c.as_rational(), Some((5, 18)));
//! ```

use std::{
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{
    converter::Converter,
    dimension::Dimension,
    error::{
        IncommensurableReason, IncommensurableUnits, InvalidConstruction, NonLinearConverter,
        UnconvertibleUnits,
    },
    exponent::Exponent,
    model::{DimensionalModel, StandardModel},
};

mod product;

pub use product::{Element, ProductUnit};
use product::{checked_raise, from_elements, merge, new_product, raise, Elements};

/// A unit of measurement
///
/// Equality and hashing are structural:
/// - base units by symbol and dimension
/// - alternate units by symbol and parent
/// - transformed units by parent and converter, the display symbol is ignored
/// - products as multisets of `(unit, exponent)`
/// - annotated units by the wrapped unit and the annotation
#[derive(Clone)]
pub struct Unit(Arc<UnitKind>);

/// The different kinds of [`Unit`]
#[derive(Debug)]
pub enum UnitKind {
    Base(BaseUnit),
    Alternate(AlternateUnit),
    Transformed(TransformedUnit),
    Product(ProductUnit),
    Annotated(AnnotatedUnit),
}

/// A system unit of a dimension, like `m` for `[L]`
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BaseUnit {
    symbol: Arc<str>,
    dimension: Dimension,
}

impl BaseUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dimension(&self) -> &Dimension {
        &self.dimension
    }
}

/// A system unit that is a new name for another system unit, like `N` for
/// `kg·m·s^-2`
///
/// It has the same dimension as its parent but is a different unit.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AlternateUnit {
    symbol: Arc<str>,
    parent: Unit,
}

impl AlternateUnit {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn parent(&self) -> &Unit {
        &self.parent
    }
}

/// A unit derived from another one with a converter, like `km` or `°C`
///
/// The converter goes from this unit to the parent.
#[derive(Debug)]
pub struct TransformedUnit {
    parent: Unit,
    converter: Converter,
    symbol: Option<Arc<str>>,
}

impl TransformedUnit {
    pub fn parent(&self) -> &Unit {
        &self.parent
    }

    /// Converter from this unit to [`Self::parent`]
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }
}

impl PartialEq for TransformedUnit {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.converter == other.converter
    }
}

impl Eq for TransformedUnit {}

impl Hash for TransformedUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
        self.converter.hash(state);
    }
}

/// A unit with a free text annotation, like `m{road}`
///
/// Behaves like the wrapped unit everywhere except in equality and display.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AnnotatedUnit {
    actual: Unit,
    annotation: Arc<str>,
}

impl AnnotatedUnit {
    pub fn actual(&self) -> &Unit {
        &self.actual
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }
}

static ONE: Lazy<Unit> = Lazy::new(|| new_product(Elements::new()));

impl Unit {
    pub(crate) fn from_kind(kind: UnitKind) -> Self {
        Self(Arc::new(kind))
    }

    /// The dimensionless unit
    pub fn one() -> Unit {
        ONE.clone()
    }

    /// Creates a new base unit
    pub fn base(symbol: impl Into<Arc<str>>, dimension: Dimension) -> Unit {
        Self::from_kind(UnitKind::Base(BaseUnit {
            symbol: symbol.into(),
            dimension,
        }))
    }

    /// Gives this system unit a new name
    ///
    /// Fails if `self` is not a system unit.
    pub fn alternate(&self, symbol: impl Into<Arc<str>>) -> Result<Unit, InvalidConstruction> {
        if !self.is_system_unit() {
            return Err(InvalidConstruction::NotASystemUnit { unit: self.clone() });
        }
        Ok(Self::from_kind(UnitKind::Alternate(AlternateUnit {
            symbol: symbol.into(),
            parent: self.clone(),
        })))
    }

    /// Creates a unit from a system unit and a converter to it
    ///
    /// Fails if `parent` is not a system unit. An identity converter gives
    /// back `parent`.
    pub fn transformed(
        parent: &Unit,
        converter: Converter,
    ) -> Result<Unit, InvalidConstruction> {
        if !parent.is_system_unit() {
            return Err(InvalidConstruction::NotASystemUnit {
                unit: parent.clone(),
            });
        }
        if converter.is_identity() {
            return Ok(parent.clone());
        }
        Ok(Self::from_kind(UnitKind::Transformed(TransformedUnit {
            parent: parent.clone(),
            converter,
            symbol: None,
        })))
    }

    /// Derives a new unit whose values go through `converter` to reach `self`
    ///
    /// The result is always expressed against the system unit. If the total
    /// converter is the identity, the system unit itself is returned.
    pub fn transform(&self, converter: &Converter) -> Unit {
        self.transform_impl(converter, None)
    }

    /// Same as [`Self::transform`] with a display symbol for the new unit
    pub fn transform_as(&self, converter: &Converter, symbol: impl Into<Arc<str>>) -> Unit {
        self.transform_impl(converter, Some(symbol.into()))
    }

    fn transform_impl(&self, converter: &Converter, symbol: Option<Arc<str>>) -> Unit {
        let (parent, converter) = match self.system_converter() {
            Ok(sys) => (self.system_unit(), converter.concatenate(&sys)),
            // keep the chain, converting from this unit will fail later
            Err(_) => (self.clone(), converter.clone()),
        };
        if converter.is_identity() {
            return parent;
        }
        Self::from_kind(UnitKind::Transformed(TransformedUnit {
            parent,
            converter,
            symbol,
        }))
    }

    /// `value_in_self + offset = value_in_result`, like `K.shift(273.15)` for
    /// `°C`
    pub fn shift(&self, offset: f64) -> Unit {
        self.transform(&Converter::add(offset))
    }

    /// A unit `factor` times bigger, like `m.scale(0.3048)` for a foot
    ///
    /// Fails for a zero or non finite factor, see [`Converter::multiply`].
    pub fn scale(&self, factor: f64) -> Result<Unit, InvalidConstruction> {
        Ok(self.transform(&Converter::multiply(factor)?))
    }

    /// Exact version of [`Self::scale`]
    pub fn scale_rational(&self, dividend: i64, divisor: i64) -> Result<Unit, InvalidConstruction> {
        Ok(self.transform(&Converter::rational(dividend, divisor)?))
    }

    /// Product of two units
    pub fn multiply(&self, rhs: &Unit) -> Unit {
        from_elements(merge(&self.elements(), &rhs.elements()))
    }

    /// Quotient of two units
    pub fn divide(&self, rhs: &Unit) -> Unit {
        from_elements(merge(
            &self.elements(),
            &raise(&rhs.elements(), Exponent::integer(-1)),
        ))
    }

    /// `one / self`
    pub fn inverse(&self) -> Unit {
        self.pow(-1)
    }

    /// Raises to an integer power, `pow(0)` is [`Unit::one`]
    pub fn pow(&self, n: i32) -> Unit {
        self.raise(Exponent::integer(n))
    }

    /// `n`-th root, `root(0)` or an exponent out of range is an error
    pub fn root(&self, n: u32) -> Result<Unit, InvalidConstruction> {
        let exp = Exponent::ONE.div_root(n)?;
        Ok(from_elements(checked_raise(&self.elements(), exp)?))
    }

    /// Raises to a rational exponent
    pub fn raise(&self, exp: Exponent) -> Unit {
        if exp.is_one() {
            return self.clone();
        }
        from_elements(raise(&self.elements(), exp))
    }

    /// Wraps this unit with an annotation
    ///
    /// Annotating an annotated unit replaces the annotation.
    pub fn annotate(&self, annotation: impl Into<Arc<str>>) -> Unit {
        let actual = match self.kind() {
            UnitKind::Annotated(a) => a.actual.clone(),
            _ => self.clone(),
        };
        Self::from_kind(UnitKind::Annotated(AnnotatedUnit {
            actual,
            annotation: annotation.into(),
        }))
    }

    pub fn kind(&self) -> &UnitKind {
        &self.0
    }

    /// Symbol of the unit, if it has one
    ///
    /// Products have no symbol, their display is built from the elements.
    pub fn symbol(&self) -> Option<&str> {
        match self.kind() {
            UnitKind::Base(b) => Some(&b.symbol),
            UnitKind::Alternate(a) => Some(&a.symbol),
            UnitKind::Transformed(t) => t.symbol(),
            UnitKind::Product(_) => None,
            UnitKind::Annotated(a) => a.actual.symbol(),
        }
    }

    /// Whether this is the dimensionless [`Unit::one`]
    pub fn is_one(&self) -> bool {
        matches!(self.kind(), UnitKind::Product(p) if p.elements().is_empty())
    }

    /// Whether both handles point to the same unit instance
    pub fn ptr_eq(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The `(unit, exponent)` decomposition of this unit
    ///
    /// For anything other than a product this is `[(self, 1)]`.
    pub fn elements(&self) -> Vec<Element> {
        match self.kind() {
            UnitKind::Product(p) => p.elements().to_vec(),
            UnitKind::Annotated(a) => a.actual.elements(),
            _ => vec![Element::new(self.clone(), Exponent::ONE)],
        }
    }

    /// Decomposition of the system unit
    pub fn base_units(&self) -> Vec<Element> {
        self.system_unit().elements()
    }

    /// The dimension of the unit
    pub fn dimension(&self) -> Dimension {
        match self.kind() {
            UnitKind::Base(b) => b.dimension.clone(),
            UnitKind::Alternate(a) => a.parent.dimension(),
            UnitKind::Transformed(t) => t.parent.dimension(),
            UnitKind::Product(p) => p.elements().iter().fold(Dimension::NONE, |acc, e| {
                acc.multiply(&e.unit.dimension().raise(e.exponent))
            }),
            UnitKind::Annotated(a) => a.actual.dimension(),
        }
    }

    /// The unscaled unit of the same system this unit derives from
    pub fn system_unit(&self) -> Unit {
        match self.kind() {
            UnitKind::Base(_) | UnitKind::Alternate(_) => self.clone(),
            UnitKind::Transformed(t) => t.parent.system_unit(),
            UnitKind::Product(p) => p.system_unit().clone(),
            UnitKind::Annotated(a) => a.actual.system_unit(),
        }
    }

    /// Whether the unit equals its own system unit
    pub fn is_system_unit(&self) -> bool {
        match self.kind() {
            UnitKind::Base(_) | UnitKind::Alternate(_) => true,
            UnitKind::Transformed(_) | UnitKind::Annotated(_) => false,
            UnitKind::Product(p) => p.system_unit() == self,
        }
    }

    /// Converter from this unit to [`Self::system_unit`]
    ///
    /// Fails for products with a non-linear element, like `°C·m`.
    pub fn system_converter(&self) -> Result<Converter, NonLinearConverter> {
        match self.kind() {
            UnitKind::Base(_) | UnitKind::Alternate(_) => Ok(Converter::Identity),
            UnitKind::Transformed(t) => Ok(t.converter.concatenate(&t.parent.system_converter()?)),
            UnitKind::Product(p) => {
                p.elements()
                    .iter()
                    .try_fold(Converter::Identity, |acc, e| {
                        let c = e.unit.system_converter()?;
                        if !c.is_linear() {
                            return Err(NonLinearConverter {
                                converter: c,
                                context: "in a product unit",
                            });
                        }
                        Ok(acc.concatenate(&c.pow(e.exponent)?))
                    })
            }
            UnitKind::Annotated(a) => a.actual.system_converter(),
        }
    }

    /// Whether a value in this unit can be converted to `that` without a
    /// dimensional model
    pub fn is_compatible(&self, that: &Unit) -> bool {
        self.is_compatible_in(that, &StandardModel)
    }

    /// Whether a value in this unit can be converted to `that` under `model`
    pub fn is_compatible_in(&self, that: &Unit, model: &dyn DimensionalModel) -> bool {
        if self == that {
            return true;
        }
        if self.system_unit() == that.system_unit() {
            return true;
        }
        let (d1, d2) = (self.dimension(), that.dimension());
        d1 == d2 || model.fundamental_dimension(&d1) == model.fundamental_dimension(&d2)
    }

    /// Converter from this unit to `that`
    ///
    /// Uses the [`StandardModel`], see [`Self::converter_to_in`].
    pub fn converter_to(&self, that: &Unit) -> Result<Converter, UnconvertibleUnits> {
        self.converter_to_in(that, &StandardModel)
    }

    /// Converter from this unit to `that`
    ///
    /// Units with the same system unit are converted through it. Otherwise the
    /// dimensional model decides (see [`Self::converter_to_any`]).
    pub fn converter_to_in(
        &self,
        that: &Unit,
        model: &dyn DimensionalModel,
    ) -> Result<Converter, UnconvertibleUnits> {
        if self == that {
            return Ok(Converter::Identity);
        }
        if self.system_unit() == that.system_unit() {
            return Ok(self.converter_via_system(that)?);
        }
        Ok(self.converter_to_any(that, model)?)
    }

    /// Converter from this unit to `that` through the dimensional model
    ///
    /// Both units are taken to the system unit of their fundamental dimension
    /// and the second path is inverted.
    #[tracing::instrument(level = "trace", skip_all, fields(from = %self, to = %that))]
    pub fn converter_to_any(
        &self,
        that: &Unit,
        model: &dyn DimensionalModel,
    ) -> Result<Converter, IncommensurableUnits> {
        if !self.is_compatible_in(that, model) {
            return Err(self.incommensurable(
                that,
                IncommensurableReason::DimensionMismatch {
                    from: model.fundamental_dimension(&self.dimension()),
                    to: model.fundamental_dimension(&that.dimension()),
                },
            ));
        }
        let this_system = self.system_unit();
        let that_system = that.system_unit();
        if this_system == that_system {
            return self.converter_via_system(that);
        }
        debug!(?model, "converting through the dimensional model");
        let to_fundamental = |unit: &Unit, system: &Unit| -> Result<Converter, NonLinearConverter> {
            let c = unit.system_converter()?;
            Ok(c.concatenate(&model.dimensional_transform(&system.dimension())?))
        };
        let this_transform = to_fundamental(self, &this_system)
            .map_err(|e| self.incommensurable(that, e.into()))?;
        let that_transform = to_fundamental(that, &that_system)
            .map_err(|e| self.incommensurable(that, e.into()))?;
        Ok(this_transform.concatenate(&that_transform.inverse()))
    }

    fn converter_via_system(&self, that: &Unit) -> Result<Converter, IncommensurableUnits> {
        let this_conv = self
            .system_converter()
            .map_err(|e| self.incommensurable(that, e.into()))?;
        let that_conv = that
            .system_converter()
            .map_err(|e| self.incommensurable(that, e.into()))?;
        Ok(this_conv.concatenate(&that_conv.inverse()))
    }

    fn incommensurable(&self, that: &Unit, reason: IncommensurableReason) -> IncommensurableUnits {
        IncommensurableUnits {
            from: self.clone(),
            to: that.clone(),
            reason,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (UnitKind::Base(a), UnitKind::Base(b)) => a == b,
            (UnitKind::Alternate(a), UnitKind::Alternate(b)) => a == b,
            (UnitKind::Transformed(a), UnitKind::Transformed(b)) => a == b,
            (UnitKind::Product(a), UnitKind::Product(b)) => a == b,
            (UnitKind::Annotated(a), UnitKind::Annotated(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self.kind()).hash(state);
        match self.kind() {
            UnitKind::Base(u) => u.hash(state),
            UnitKind::Alternate(u) => u.hash(state),
            UnitKind::Transformed(u) => u.hash(state),
            UnitKind::Product(u) => state.write_u64(u.structural_hash()),
            UnitKind::Annotated(u) => u.hash(state),
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            UnitKind::Base(b) => f.write_str(&b.symbol),
            UnitKind::Alternate(a) => f.write_str(&a.symbol),
            UnitKind::Transformed(t) => match &t.symbol {
                Some(s) => f.write_str(s),
                None => fmt_transformed(t, f),
            },
            UnitKind::Product(p) => {
                if p.elements().is_empty() {
                    return f.write_str("one");
                }
                for (i, e) in p.elements().iter().enumerate() {
                    if i > 0 {
                        f.write_str("·")?;
                    }
                    if matches!(e.unit.kind(), UnitKind::Transformed(t) if t.symbol.is_none()) {
                        write!(f, "({})", e.unit)?;
                    } else {
                        write!(f, "{}", e.unit)?;
                    }
                    if !e.exponent.is_one() {
                        write!(f, "^{}", e.exponent)?;
                    }
                }
                Ok(())
            }
            UnitKind::Annotated(a) => write!(f, "{}{{{}}}", a.actual, a.annotation),
        }
    }
}

fn fmt_transformed(t: &TransformedUnit, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match t.converter {
        Converter::Rational {
            dividend,
            divisor: 1,
        } => write!(f, "{}*{dividend}", t.parent),
        Converter::Rational { dividend, divisor } => {
            write!(f, "{}*{dividend}/{divisor}", t.parent)
        }
        Converter::Multiply { factor } => write!(f, "{}*{factor}", t.parent),
        Converter::Add { offset } => write!(f, "{}+{offset}", t.parent),
        ref other => write!(f, "{}[{other}]", t.parent),
    }
}

impl Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({self})")
    }
}
