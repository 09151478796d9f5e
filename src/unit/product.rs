//! Canonical product form of compound units

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use once_cell::sync::OnceCell;
use smallvec::SmallVec;

use super::{Unit, UnitKind};
use crate::{error::InvalidConstruction, exponent::Exponent};

pub(crate) type Elements = SmallVec<[Element; 4]>;

/// A unit raised to a rational exponent inside a product
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    pub unit: Unit,
    pub exponent: Exponent,
}

impl Element {
    pub fn new(unit: Unit, exponent: Exponent) -> Self {
        Self { unit, exponent }
    }
}

/// A product of units in canonical form
///
/// There is never more than one element for the same unit, no element has
/// a zero exponent and exponents are reduced. Equality is multiset equality,
/// the order in which the product was built does not matter.
///
/// The structural hash and the system unit are computed once on first use.
#[derive(Debug)]
pub struct ProductUnit {
    elements: Elements,
    hash: OnceCell<u64>,
    system_unit: OnceCell<Unit>,
}

impl ProductUnit {
    /// Elements of the product, in construction order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub(super) fn system_unit(&self) -> &Unit {
        self.system_unit.get_or_init(|| {
            let elements = self
                .elements
                .iter()
                .map(|e| {
                    let system = e.unit.system_unit();
                    raise(&system.elements(), e.exponent)
                })
                .fold(Elements::new(), |acc, e| merge(&acc, &e));
            from_elements(elements)
        })
    }

    pub(super) fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            // order independent
            self.elements
                .iter()
                .map(|e| {
                    let mut h = DefaultHasher::new();
                    e.hash(&mut h);
                    h.finish()
                })
                .fold(0u64, u64::wrapping_add)
        })
    }
}

impl PartialEq for ProductUnit {
    fn eq(&self, other: &Self) -> bool {
        self.elements.len() == other.elements.len()
            && self.structural_hash() == other.structural_hash()
            && self.elements.iter().all(|e| other.elements.contains(e))
    }
}

impl Eq for ProductUnit {}

/// Builds the canonical unit for a list of elements
///
/// - no elements is [`Unit::one`]
/// - a single element with exponent 1 is that unit
/// - anything else is a [`ProductUnit`]
pub(crate) fn from_elements(elements: Elements) -> Unit {
    match elements.as_slice() {
        [] => Unit::one(),
        [single] if single.exponent.is_one() => single.unit.clone(),
        _ => new_product(elements),
    }
}

pub(super) fn new_product(elements: Elements) -> Unit {
    Unit::from_kind(UnitKind::Product(ProductUnit {
        elements,
        hash: OnceCell::new(),
        system_unit: OnceCell::new(),
    }))
}

/// Merges two element lists adding the exponents of the same units
pub(crate) fn merge(left: &[Element], right: &[Element]) -> Elements {
    let mut result: Elements = left.iter().cloned().collect();
    for r in right {
        match result.iter().position(|e| e.unit == r.unit) {
            Some(pos) => {
                let exp = result[pos].exponent.add(r.exponent);
                if exp.is_zero() {
                    result.remove(pos);
                } else {
                    result[pos].exponent = exp;
                }
            }
            None => {
                if !r.exponent.is_zero() {
                    result.push(r.clone());
                }
            }
        }
    }
    result
}

/// Like [`raise`], failing if an exponent goes out of range
pub(crate) fn checked_raise(
    elements: &[Element],
    exp: Exponent,
) -> Result<Elements, InvalidConstruction> {
    let mut raised = Elements::new();
    for e in elements {
        let exponent = e.exponent.checked_mul(exp)?;
        if !exponent.is_zero() {
            raised.push(Element::new(e.unit.clone(), exponent));
        }
    }
    Ok(raised)
}

/// Multiplies every exponent by `exp`
pub(crate) fn raise(elements: &[Element], exp: Exponent) -> Elements {
    elements
        .iter()
        .map(|e| Element::new(e.unit.clone(), e.exponent.mul(exp)))
        .filter(|e| !e.exponent.is_zero())
        .collect()
}
