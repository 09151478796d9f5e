mod common;

use common::*;
use measures::{
    error::IncommensurableReason, Converter, Dimension, Number, Quantity, StandardModel, Unit,
};
use rust_decimal_macros::dec;
use test_case::test_case;

#[test]
fn kilometres_per_hour_to_metres_per_second() {
    let q = Quantity::new(36, kph());
    let converted = q.to(&metre_per_second()).unwrap();
    assert_eq!(converted.value(), &Number::Int(10));
    assert_eq!(converted.unit(), &metre_per_second());

    let c = kph().converter_to(&metre_per_second()).unwrap();
    assert_eq!(c, rational(5, 18));
    assert_eq!(c.to_string(), "x * 5/18");
}

#[test]
fn metre_to_second_is_unconvertible() {
    let err = metre().converter_to(&second()).unwrap_err();
    assert_eq!(err.from_unit(), &metre());
    assert_eq!(err.to_unit(), &second());
    assert_eq!(err.to_string(), "Unconvertible units: 'm' to 's'");

    let err = metre()
        .converter_to_any(&second(), &StandardModel)
        .unwrap_err();
    match err.reason {
        IncommensurableReason::DimensionMismatch { from, to } => {
            assert_eq!(from, Dimension::fundamental("L"));
            assert_eq!(to, Dimension::fundamental("T"));
        }
        other => panic!("unexpected reason: {other}"),
    }
}

#[test]
fn same_unit_is_identity() {
    for unit in [metre(), kph(), celsius(), newton(), Unit::one()] {
        assert_eq!(unit.converter_to(&unit).unwrap(), Converter::Identity);
    }
}

#[test_case(minute(), hour() => rational(1, 60) ; "minute to hour")]
#[test_case(mile(), metre() => rational(201_168, 125) ; "mile to metre")]
#[test_case(centimetre().pow(2), metre().pow(2) => rational(1, 10_000) ; "square centimetre")]
#[test_case(metre().pow(3).root(3).unwrap(), kilometre() => rational(1, 1000) ; "cube root")]
#[test_case(gram().divide(&centimetre().pow(3)), kilogram().divide(&metre().pow(3)) => rational(1000, 1) ; "density")]
fn exact_converters(from: Unit, to: Unit) -> Converter {
    from.converter_to(&to).unwrap()
}

#[test]
fn alternate_unit_converts_to_its_definition() {
    let definition = kilogram().multiply(&metre()).divide(&second().pow(2));
    assert_ne!(newton(), definition);
    assert!(newton().is_compatible(&definition));
    assert_eq!(
        newton().converter_to(&definition).unwrap(),
        Converter::Identity
    );

    let kilonewton = newton().scale_rational(1000, 1).unwrap();
    let grams_cm = gram().multiply(&centimetre()).divide(&second().pow(2));
    let c = kilonewton.converter_to(&grams_cm).unwrap();
    assert_eq!(c, rational(100_000_000, 1));
}

#[test]
fn temperatures() {
    let c = celsius().converter_to(&fahrenheit()).unwrap();
    assert!(!c.is_linear());
    for (from, to) in [(0.0, 32.0), (100.0, 212.0), (-40.0, -40.0), (37.0, 98.6)] {
        assert!((c.convert(from) - to).abs() < 1e-9, "{from} -> {}", c.convert(from));
        assert!((c.inverse().convert(to) - from).abs() < 1e-9);
    }
    let q = Quantity::new(dec!(25), celsius()).to(&kelvin()).unwrap();
    let Number::Decimal(k) = *q.value() else {
        panic!("expected a decimal, got {q}");
    };
    assert!((k - dec!(298.15)).abs() < dec!(0.000000001));
}

#[test]
fn temperature_in_a_product_is_not_convertible() {
    let per_celsius = Unit::one().divide(&celsius());
    let err = per_celsius.converter_to(&kelvin().inverse()).unwrap_err();
    assert!(matches!(err.0.reason, IncommensurableReason::NonLinear(_)));
}

#[test]
fn canonical_products() {
    let units = [metre(), second(), kilogram(), kph(), newton(), celsius()];
    for a in &units {
        for b in &units {
            assert_eq!(&a.multiply(b).divide(b), a, "{a} {b}");
            assert_eq!(a.multiply(b), b.multiply(a), "{a} {b}");
        }
    }
}

#[test]
fn system_unit_is_a_fixed_point() {
    for unit in [metre(), kph(), newton(), celsius(), mile().pow(2), Unit::one()] {
        let system = unit.system_unit();
        assert_eq!(system.system_unit(), system, "{unit}");
        assert!(system.is_system_unit());
        assert_eq!(system.dimension(), unit.dimension());
    }
}

#[test]
fn annotated_units_convert_like_the_actual_unit() {
    let road = kilometre().annotate("road");
    assert_eq!(
        road.converter_to(&metre()).unwrap(),
        kilometre().converter_to(&metre()).unwrap()
    );
    assert_eq!(road.to_string(), "km{road}");
    let q = Quantity::new(2, road).to(&metre()).unwrap();
    assert_eq!(q.value(), &Number::Int(2000));
}

#[test]
fn units_are_shared_between_threads() {
    let kph = kph();
    let ms = metre_per_second();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let (kph, ms) = (&kph, &ms);
                s.spawn(move || {
                    Quantity::new(36 * i, kph.clone())
                        .i64_value(ms)
                        .unwrap()
                })
            })
            .collect();
        let values: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(values, vec![0, 10, 20, 30]);
    });
}
