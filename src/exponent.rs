//! Rational exponents used by product units and dimensions

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::InvalidConstruction;

/// A reduced rational exponent `pow/root`
///
/// `root` is always positive and `gcd(|pow|, root) == 1`, so two exponents
/// are equal iff they represent the same rational number.
///
/// The plain arithmetic methods saturate at the bounds of `i32`/`u32`, the
/// `checked_*` ones fail with [`InvalidConstruction::ExponentOutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawExponent", into = "RawExponent")]
pub struct Exponent {
    pow: i32,
    root: u32,
}

#[derive(Serialize, Deserialize)]
struct RawExponent {
    pow: i32,
    #[serde(default = "one")]
    root: u32,
}

fn one() -> u32 {
    1
}

impl TryFrom<RawExponent> for Exponent {
    type Error = InvalidConstruction;

    fn try_from(value: RawExponent) -> Result<Self, Self::Error> {
        Self::new(value.pow, value.root)
    }
}

impl From<Exponent> for RawExponent {
    fn from(value: Exponent) -> Self {
        Self {
            pow: value.pow,
            root: value.root,
        }
    }
}

impl Exponent {
    /// The exponent `1`
    pub const ONE: Self = Self { pow: 1, root: 1 };
    /// The exponent `0`
    pub const ZERO: Self = Self { pow: 0, root: 1 };

    /// Creates a new reduced exponent
    ///
    /// Fails with [`InvalidConstruction::ZeroOrder`] if `root` is 0.
    pub fn new(pow: i32, root: u32) -> Result<Self, InvalidConstruction> {
        if root == 0 {
            return Err(InvalidConstruction::ZeroOrder);
        }
        Self::reduced(i128::from(pow), i128::from(root))
    }

    /// Integer exponent
    pub const fn integer(pow: i32) -> Self {
        Self { pow, root: 1 }
    }

    /// Numerator
    pub const fn pow(&self) -> i32 {
        self.pow
    }

    /// Denominator, always > 0
    pub const fn root(&self) -> u32 {
        self.root
    }

    pub const fn is_zero(&self) -> bool {
        self.pow == 0
    }

    pub const fn is_one(&self) -> bool {
        self.pow == 1 && self.root == 1
    }

    pub const fn is_integer(&self) -> bool {
        self.root == 1
    }

    /// Sum of two exponents over a common root
    pub fn add(self, rhs: Self) -> Self {
        let (pow, root) = self.sum_parts(rhs);
        Self::saturated(pow, root)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, InvalidConstruction> {
        let (pow, root) = self.sum_parts(rhs);
        Self::reduced(pow, root)
    }

    pub fn neg(self) -> Self {
        Self::saturated(-i128::from(self.pow), i128::from(self.root))
    }

    pub fn checked_neg(self) -> Result<Self, InvalidConstruction> {
        Self::reduced(-i128::from(self.pow), i128::from(self.root))
    }

    /// Product of two exponents
    pub fn mul(self, rhs: Self) -> Self {
        let (pow, root) = self.product_parts(rhs);
        Self::saturated(pow, root)
    }

    pub fn checked_mul(self, rhs: Self) -> Result<Self, InvalidConstruction> {
        let (pow, root) = self.product_parts(rhs);
        Self::reduced(pow, root)
    }

    /// `self * n`
    pub fn mul_pow(self, n: i32) -> Self {
        self.mul(Self::integer(n))
    }

    /// `self / n`
    pub fn div_root(self, n: u32) -> Result<Self, InvalidConstruction> {
        if n == 0 {
            return Err(InvalidConstruction::ZeroOrder);
        }
        Self::reduced(
            i128::from(self.pow),
            i128::from(self.root) * i128::from(n),
        )
    }

    /// Value as a float, used by non exact converters
    pub fn as_f64(&self) -> f64 {
        f64::from(self.pow) / f64::from(self.root)
    }

    fn sum_parts(self, rhs: Self) -> (i128, i128) {
        let pow = i128::from(self.pow) * i128::from(rhs.root)
            + i128::from(rhs.pow) * i128::from(self.root);
        (pow, i128::from(self.root) * i128::from(rhs.root))
    }

    fn product_parts(self, rhs: Self) -> (i128, i128) {
        (
            i128::from(self.pow) * i128::from(rhs.pow),
            i128::from(self.root) * i128::from(rhs.root),
        )
    }

    /// Reduced `pow / root` with a positive root. `root` must not be 0.
    fn normalized(pow: i128, root: i128) -> (i128, i128) {
        let g = gcd_u128(pow.unsigned_abs(), root.unsigned_abs()).max(1) as i128;
        let (pow, root) = (pow / g, root / g);
        if root < 0 {
            (-pow, -root)
        } else {
            (pow, root)
        }
    }

    fn reduced(pow: i128, root: i128) -> Result<Self, InvalidConstruction> {
        let (pow, root) = Self::normalized(pow, root);
        Ok(Self {
            pow: i32::try_from(pow).map_err(|_| InvalidConstruction::ExponentOutOfRange)?,
            root: u32::try_from(root).map_err(|_| InvalidConstruction::ExponentOutOfRange)?,
        })
    }

    fn saturated(pow: i128, root: i128) -> Self {
        let (pow, root) = Self::normalized(pow, root);
        Self {
            pow: pow.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32,
            root: root.clamp(1, i128::from(u32::MAX)) as u32,
        }
    }
}

impl Default for Exponent {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<i32> for Exponent {
    fn from(value: i32) -> Self {
        Self::integer(value)
    }
}

impl Display for Exponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.root == 1 {
            write!(f, "{}", self.pow)
        } else {
            write!(f, "({}/{})", self.pow, self.root)
        }
    }
}

/// Greatest common divisor of wide integers
pub(crate) fn gcd_u128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(2, 4 => (1, 2) ; "reduces")]
    #[test_case(-6, 3 => (-2, 1) ; "negative")]
    #[test_case(0, 5 => (0, 1) ; "zero")]
    #[test_case(3, 1 => (3, 1) ; "integer")]
    fn reduction(pow: i32, root: u32) -> (i32, u32) {
        let e = Exponent::new(pow, root).unwrap();
        (e.pow(), e.root())
    }

    #[test]
    fn zero_root() {
        assert_eq!(Exponent::new(1, 0), Err(InvalidConstruction::ZeroOrder));
        assert_eq!(
            Exponent::ONE.div_root(0),
            Err(InvalidConstruction::ZeroOrder)
        );
    }

    #[test]
    fn arithmetic() {
        let half = Exponent::new(1, 2).unwrap();
        let third = Exponent::new(1, 3).unwrap();
        assert_eq!(half.add(third), Exponent::new(5, 6).unwrap());
        assert_eq!(half.add(half), Exponent::ONE);
        assert_eq!(half.add(half.neg()), Exponent::ZERO);
        assert_eq!(half.mul_pow(4), Exponent::integer(2));
        assert_eq!(Exponent::integer(2).div_root(2).unwrap(), Exponent::ONE);
    }

    #[test]
    fn out_of_range() {
        let min = Exponent::integer(i32::MIN);
        assert_eq!(min.neg(), Exponent::integer(i32::MAX));
        assert_eq!(min.checked_neg(), Err(InvalidConstruction::ExponentOutOfRange));
        assert_eq!(
            Exponent::integer(i32::MAX).checked_add(Exponent::ONE),
            Err(InvalidConstruction::ExponentOutOfRange)
        );
        assert_eq!(
            Exponent::integer(i32::MAX).checked_mul(Exponent::integer(2)),
            Err(InvalidConstruction::ExponentOutOfRange)
        );
        let tiny = Exponent::new(1, u32::MAX).unwrap();
        assert_eq!(tiny.div_root(2), Err(InvalidConstruction::ExponentOutOfRange));
        assert_eq!(
            Exponent::integer(i32::MAX).checked_add(Exponent::integer(-1)),
            Ok(Exponent::integer(i32::MAX - 1))
        );
    }

    #[test]
    fn serde() {
        let e: Exponent = serde_json::from_str(r#"{"pow": 4, "root": 2}"#).unwrap();
        assert_eq!(e, Exponent::integer(2));
        let e: Exponent = serde_json::from_str(r#"{"pow": -1}"#).unwrap();
        assert_eq!(e, Exponent::integer(-1));
        assert!(serde_json::from_str::<Exponent>(r#"{"pow": 1, "root": 0}"#).is_err());
    }
}
