#![no_main]
use libfuzzer_sys::fuzz_target;
use zenbmp::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let Ok(decoded) = decode(data, enough::Unstoppable) else {
        return;
    };

    let Ok(reencoded) = EncodeRequest::new(decoded.bit_depth).encode(
        decoded.pixels(),
        decoded.width,
        decoded.height,
        enough::Unstoppable,
    ) else {
        return;
    };
    let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
    assert_eq!(decoded.bit_depth, decoded2.bit_depth);
});
