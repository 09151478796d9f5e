use criterion::{black_box, criterion_group, criterion_main, Criterion};
use measures::{Converter, Dimension, MappedModel, Precision, Quantity, Unit};
use rust_decimal_macros::dec;

struct Units {
    metre: Unit,
    second: Unit,
    kph: Unit,
    mph: Unit,
    celsius: Unit,
    fahrenheit: Unit,
}

fn units() -> Units {
    let metre = Unit::base("m", Dimension::fundamental("L"));
    let second = Unit::base("s", Dimension::fundamental("T"));
    let kelvin = Unit::base("K", Dimension::fundamental("Θ"));
    let r = |a, b| Converter::rational(a, b).unwrap();

    let km = metre.transform_as(&r(1000, 1), "km");
    let mile = metre.transform_as(&r(201_168, 125), "mi");
    let hour = second.transform_as(&r(3600, 1), "h");
    let rankine = kelvin.scale_rational(5, 9).unwrap();
    Units {
        kph: km.divide(&hour),
        mph: mile.divide(&hour),
        celsius: kelvin.shift(273.15),
        fahrenheit: rankine.shift(459.67),
        metre,
        second,
    }
}

fn converters(c: &mut Criterion) {
    let mut group = c.benchmark_group("converter derivation");
    let u = units();

    group.bench_function("kph-to-mph", |b| {
        b.iter(|| black_box(&u.kph).converter_to(black_box(&u.mph)))
    });
    group.bench_function("celsius-to-fahrenheit", |b| {
        b.iter(|| black_box(&u.celsius).converter_to(black_box(&u.fahrenheit)))
    });
    group.bench_function("products", |b| {
        b.iter(|| {
            let speed = black_box(&u.metre).divide(black_box(&u.second));
            speed.multiply(&u.second) == u.metre
        })
    });
}

fn quantities(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantity conversions");
    let u = units();
    let model = MappedModel::relativistic();

    let input = [
        Quantity::new(36, u.kph.clone()),
        Quantity::new(36.5, u.kph.clone()),
        Quantity::new(dec!(36.25), u.kph.clone()),
    ];
    let input = black_box(input);

    group.bench_function("exact", |b| {
        b.iter(|| {
            for q in &input {
                let _ = q.to(&u.mph);
            }
        })
    });
    group.bench_function("decimal-precision", |b| {
        b.iter(|| {
            for q in &input {
                let _ = q.to_with(&u.mph, Precision::DECIMAL64);
            }
        })
    });
    group.bench_function("relativistic", |b| {
        let one = Unit::one();
        b.iter(|| {
            for q in &input {
                let _ = q.to_in(&one, &model);
            }
        })
    });
}

criterion_group!(benches, converters, quantities);
criterion_main!(benches);
