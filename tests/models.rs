mod common;

use common::*;
use indoc::indoc;
use measures::{
    model::{model_file::Factor, ModelBuilderError, ModelFile},
    Converter, Dimension, DimensionalModel, MappedModel, ModelBuilder, Number, Quantity,
    StandardModel, Unit,
};
use rust_decimal_macros::dec;

const RELATIVISTIC: &str = indoc! {r#"
    name = "relativistic"

    [[mapping]]
    symbol = "L"
    to = { T = 1 }
    factor = { dividend = 1, divisor = 299792458 }
"#};

#[test]
fn model_from_toml() {
    let file: ModelFile = toml::from_str(RELATIVISTIC).unwrap();
    assert_eq!(file.name.as_deref(), Some("relativistic"));
    assert_eq!(
        file.mapping[0].factor,
        Some(Factor::Ratio {
            dividend: 1,
            divisor: 299_792_458
        })
    );
    let model = ModelBuilder::new()
        .with_model_file(file)
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(model, MappedModel::relativistic());
}

#[test]
fn model_from_json() {
    let json = r#"{
        "mapping": [
            { "symbol": "M", "to": { "L": 1 }, "factor": 2.5 }
        ]
    }"#;
    let file: ModelFile = serde_json::from_str(json).unwrap();
    let model = ModelBuilder::new()
        .with_model_file(file)
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(
        model.mapping("M").unwrap().converter,
        Converter::multiply(2.5).unwrap()
    );
    assert_eq!(
        model.fundamental_dimension(&Dimension::fundamental("M")),
        Dimension::fundamental("L")
    );
}

#[test]
fn unknown_fields_are_rejected() {
    let toml = indoc! {r#"
        [[mapping]]
        symbol = "L"
        to = { T = 1 }
        offset = 3
    "#};
    assert!(toml::from_str::<ModelFile>(toml).is_err());
}

#[test]
fn layered_files() {
    let base: ModelFile = toml::from_str(indoc! {r#"
        [[mapping]]
        symbol = "L"
        to = { T = 1 }
    "#})
    .unwrap();
    let ext: ModelFile = toml::from_str(indoc! {r#"
        [[extend]]
        symbol = "L"
        to = { T = 1 }
        factor = { dividend = 1, divisor = 299792458 }
    "#})
    .unwrap();
    let model = ModelBuilder::new()
        .with_model_file(base.clone())
        .unwrap()
        .with_model_file(ext)
        .unwrap()
        .finish()
        .unwrap();
    assert_eq!(model, MappedModel::relativistic());

    let err = ModelBuilder::new()
        .with_model_file(base.clone())
        .unwrap()
        .with_model_file(base)
        .unwrap_err();
    assert!(matches!(err, ModelBuilderError::DuplicateMapping { .. }));
}

#[test]
fn relativistic_conversions() {
    let model = MappedModel::relativistic();
    assert!(!metre().is_compatible(&second()));
    assert!(metre().is_compatible_in(&second(), &model));

    let light_second = Quantity::new(299_792_458, metre());
    let t = light_second.to_in(&second(), &model).unwrap();
    assert_eq!(t.value(), &Number::Int(1));

    let beta = Quantity::new(1, metre_per_second())
        .to_in(&Unit::one(), &model)
        .unwrap();
    assert!((beta.value().to_f64() - 1.0 / 299_792_458.0).abs() < 1e-20);

    let light_hour = Quantity::new(1, hour())
        .to_in(&kilometre(), &model)
        .unwrap();
    assert_eq!(light_hour.value(), &Number::Decimal(dec!(1079252848.8)));
}

#[test]
fn standard_model_rejects_different_dimensions() {
    let q = Quantity::new(1, metre());
    assert!(q.to_in(&second(), &StandardModel).is_err());
    assert!(metre()
        .converter_to_any(&second(), &StandardModel)
        .is_err());
}

#[test]
fn custom_model_trait() {
    /// Counts everything in the same fundamental dimension
    #[derive(Debug)]
    struct Collapse;

    impl DimensionalModel for Collapse {
        fn fundamental_of(&self, symbol: &str) -> Option<Dimension> {
            (symbol != "X").then(|| Dimension::fundamental("X"))
        }
    }

    assert!(metre().is_compatible_in(&kilogram(), &Collapse));
    assert!(!metre().is_compatible_in(&metre().pow(2), &Collapse));
    let c = kilometre().converter_to_in(&gram(), &Collapse).unwrap();
    assert_eq!(c, rational(1_000_000, 1));
}
