#![no_main]

use libfuzzer_sys::fuzz_target;

use measures::{Converter, Exponent};

fuzz_target!(|input: (i64, i64, i64, i64, i32, u8)| {
    let (a, b, c, d, pow, root) = input;
    let (Ok(first), Ok(second)) = (Converter::rational(a, b), Converter::rational(c, d)) else {
        return;
    };
    let chain = first.concatenate(&second);
    let _ = chain.concatenate(&chain.inverse());
    if let Ok(exp) = Exponent::new(pow % 8, u32::from(root % 4)) {
        let _ = chain.pow(exp);
    }
    let _ = chain.convert(1.0);
    let _ = chain.to_string();
});
