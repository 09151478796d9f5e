//! Dimensions: formal products of fundamental symbols

use std::{collections::BTreeMap, fmt::Display, ops, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{error::InvalidConstruction, exponent::Exponent};

/// The "shape" of a physical quantity
///
/// A dimension is a product of fundamental symbols like `[L]`, `[M]` or `[T]`
/// raised to [`Exponent`]s. A fundamental dimension is just one symbol with
/// exponent 1.
///
/// Dimensions are always reduced, so equality does not depend on how they
/// were built:
/// ```
/// # use measures::Dimension;
/// let l = Dimension::fundamental("L");
/// let t = Dimension::fundamental("T");
/// assert_eq!(&(&l * &t) / &t, l);
/// assert_eq!(&l * &t, &t * &l);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Arc<str>, Exponent>", into = "BTreeMap<Arc<str>, Exponent>")]
pub struct Dimension {
    factors: BTreeMap<Arc<str>, Exponent>,
}

impl Dimension {
    /// The dimension of pure numbers
    pub const NONE: Dimension = Dimension {
        factors: BTreeMap::new(),
    };

    /// A fundamental dimension identified by `symbol`
    pub fn fundamental(symbol: impl Into<Arc<str>>) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(symbol.into(), Exponent::ONE);
        Self { factors }
    }

    /// Builds a dimension from symbols and exponents, zero exponents are
    /// dropped and repeated symbols are accumulated
    pub fn from_factors<S, E>(factors: impl IntoIterator<Item = (S, E)>) -> Self
    where
        S: Into<Arc<str>>,
        E: Into<Exponent>,
    {
        let mut dim = Self::NONE;
        for (symbol, exp) in factors {
            dim.accumulate(symbol.into(), exp.into());
        }
        dim
    }

    /// Checks if this is [`Dimension::NONE`]
    pub fn is_dimensionless(&self) -> bool {
        self.factors.is_empty()
    }

    /// Checks if this is a single symbol with exponent 1
    pub fn is_fundamental(&self) -> bool {
        self.factors.len() == 1 && self.factors.values().all(Exponent::is_one)
    }

    /// The symbol of a fundamental dimension
    pub fn symbol(&self) -> Option<&str> {
        if self.is_fundamental() {
            self.factors.keys().next().map(|s| s.as_ref())
        } else {
            None
        }
    }

    /// Iterator over the `(symbol, exponent)` pairs, ordered by symbol
    pub fn factors(&self) -> impl Iterator<Item = (&str, Exponent)> + '_ {
        self.factors.iter().map(|(s, e)| (s.as_ref(), *e))
    }

    /// Exponent of a symbol, [`Exponent::ZERO`] if not present
    pub fn exponent_of(&self, symbol: &str) -> Exponent {
        self.factors.get(symbol).copied().unwrap_or(Exponent::ZERO)
    }

    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut dim = self.clone();
        for (symbol, exp) in &rhs.factors {
            dim.accumulate(Arc::clone(symbol), *exp);
        }
        dim
    }

    pub fn divide(&self, rhs: &Self) -> Self {
        let mut dim = self.clone();
        for (symbol, exp) in &rhs.factors {
            dim.accumulate(Arc::clone(symbol), exp.neg());
        }
        dim
    }

    /// Inverse dimension, `1 / self`
    pub fn inverse(&self) -> Self {
        Self::NONE.divide(self)
    }

    /// Raise to an integer power
    ///
    /// Fails with [`InvalidConstruction::ZeroOrder`] if `n` is 0 and with
    /// [`InvalidConstruction::ExponentOutOfRange`] if an exponent overflows.
    pub fn pow(&self, n: i32) -> Result<Self, InvalidConstruction> {
        if n == 0 {
            return Err(InvalidConstruction::ZeroOrder);
        }
        self.checked_raise(Exponent::integer(n))
    }

    /// The `n`th root
    ///
    /// Same errors as [`Dimension::pow`].
    pub fn root(&self, n: u32) -> Result<Self, InvalidConstruction> {
        self.checked_raise(Exponent::new(1, n)?)
    }

    /// Raise to a rational exponent
    pub fn raise(&self, exp: Exponent) -> Self {
        let factors = self
            .factors
            .iter()
            .map(|(s, e)| (Arc::clone(s), e.mul(exp)))
            .filter(|(_, e)| !e.is_zero())
            .collect();
        Self { factors }
    }

    fn checked_raise(&self, exp: Exponent) -> Result<Self, InvalidConstruction> {
        let mut factors = BTreeMap::new();
        for (s, e) in &self.factors {
            let e = e.checked_mul(exp)?;
            if !e.is_zero() {
                factors.insert(Arc::clone(s), e);
            }
        }
        Ok(Self { factors })
    }

    fn accumulate(&mut self, symbol: Arc<str>, exp: Exponent) {
        if exp.is_zero() {
            return;
        }
        let entry = self.factors.entry(symbol).or_insert(Exponent::ZERO);
        *entry = entry.add(exp);
        if entry.is_zero() {
            self.factors.retain(|_, e| !e.is_zero());
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<BTreeMap<Arc<str>, Exponent>> for Dimension {
    fn from(value: BTreeMap<Arc<str>, Exponent>) -> Self {
        Self::from_factors(value)
    }
}

impl From<Dimension> for BTreeMap<Arc<str>, Exponent> {
    fn from(value: Dimension) -> Self {
        value.factors
    }
}

impl ops::Mul for &Dimension {
    type Output = Dimension;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl ops::Div for &Dimension {
    type Output = Dimension;

    fn div(self, rhs: Self) -> Self::Output {
        self.divide(rhs)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "[1]");
        }
        for (i, (symbol, exp)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, "·")?;
            }
            write!(f, "[{symbol}]")?;
            if !exp.is_one() {
                write!(f, "^{exp}")?;
            }
        }
        Ok(())
    }
}
