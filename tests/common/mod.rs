#![allow(dead_code)]

use measures::{Converter, Dimension, Unit};

pub fn metre() -> Unit {
    Unit::base("m", Dimension::fundamental("L"))
}

pub fn second() -> Unit {
    Unit::base("s", Dimension::fundamental("T"))
}

pub fn kilogram() -> Unit {
    Unit::base("kg", Dimension::fundamental("M"))
}

pub fn kelvin() -> Unit {
    Unit::base("K", Dimension::fundamental("Θ"))
}

pub fn kilometre() -> Unit {
    metre().transform_as(&rational(1000, 1), "km")
}

pub fn centimetre() -> Unit {
    metre().transform_as(&rational(1, 100), "cm")
}

pub fn minute() -> Unit {
    second().transform_as(&rational(60, 1), "min")
}

pub fn hour() -> Unit {
    second().transform_as(&rational(3600, 1), "h")
}

pub fn gram() -> Unit {
    kilogram().transform_as(&rational(1, 1000), "g")
}

pub fn foot() -> Unit {
    metre().transform_as(&rational(3048, 10000), "ft")
}

pub fn mile() -> Unit {
    foot().transform_as(&rational(5280, 1), "mi")
}

pub fn celsius() -> Unit {
    kelvin().shift(273.15)
}

pub fn fahrenheit() -> Unit {
    kelvin().scale_rational(5, 9).unwrap().shift(459.67)
}

pub fn newton() -> Unit {
    kilogram()
        .multiply(&metre())
        .divide(&second().pow(2))
        .alternate("N")
        .unwrap()
}

pub fn kph() -> Unit {
    kilometre().divide(&hour())
}

pub fn metre_per_second() -> Unit {
    metre().divide(&second())
}

pub fn rational(dividend: i64, divisor: i64) -> Converter {
    Converter::rational(dividend, divisor).unwrap()
}
