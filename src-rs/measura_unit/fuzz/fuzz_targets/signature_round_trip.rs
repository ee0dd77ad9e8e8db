#![no_main]

use libfuzzer_sys::fuzz_target;
use measura_unit::SIDimensions;

fuzz_target!(|exponents: [i8; SIDimensions::SLOTS]| {
    let dimensions = SIDimensions::new(exponents.map(i32::from));
    let signature = dimensions.signature();

    assert_eq!(
        SIDimensions::parse(&signature),
        Ok(dimensions),
        "signature: {signature}"
    );
});
