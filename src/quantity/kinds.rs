//! Common quantity kinds
//!
//! They use the usual symbols for the fundamental dimensions: `L` length,
//! `M` mass, `T` time, `I` electric current, `Θ` temperature, `N` amount of
//! substance and `J` luminous intensity.

use crate::{quantity_kind, Dimension};

quantity_kind!(pub Dimensionless => Dimension::NONE);

quantity_kind!(pub Length => Dimension::fundamental("L"));
quantity_kind!(pub Mass => Dimension::fundamental("M"));
quantity_kind!(pub Time => Dimension::fundamental("T"));
quantity_kind!(pub ElectricCurrent => Dimension::fundamental("I"));
quantity_kind!(pub Temperature => Dimension::fundamental("Θ"));
quantity_kind!(pub AmountOfSubstance => Dimension::fundamental("N"));
quantity_kind!(pub LuminousIntensity => Dimension::fundamental("J"));

quantity_kind!(pub Area => Dimension::from_factors([("L", 2)]));
quantity_kind!(pub Volume => Dimension::from_factors([("L", 3)]));
quantity_kind!(pub Speed => Dimension::from_factors([("L", 1), ("T", -1)]));
quantity_kind!(pub Acceleration => Dimension::from_factors([("L", 1), ("T", -2)]));
quantity_kind!(
    /// `[M]·[L]·[T]^-2`
    pub Force => Dimension::from_factors([("M", 1), ("L", 1), ("T", -2)])
);
quantity_kind!(
    /// `[M]·[L]^2·[T]^-2`
    pub Energy => Dimension::from_factors([("M", 1), ("L", 2), ("T", -2)])
);
quantity_kind!(pub Frequency => Dimension::from_factors([("T", -1)]));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{quantity::Kind, Quantity, Unit};

    #[test]
    fn derived_dimensions() {
        let l = Dimension::fundamental("L");
        let t = Dimension::fundamental("T");
        assert_eq!(Speed::dimension(), Some(&l / &t));
        assert_eq!(Area::dimension(), Some(&l * &l));
        assert_eq!(Frequency::dimension(), Some(t.inverse()));
        assert_eq!(Dimensionless::dimension(), Some(Dimension::NONE));
        assert_eq!(Speed::NAME, "Speed");
    }

    #[test]
    fn dimensionless_quantity() {
        assert!(Quantity::<Dimensionless>::of(0.5, Unit::one()).is_ok());
    }
}
